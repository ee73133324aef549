//! Stand-in pages served when no built front end is configured.

use axum::{
    http::{StatusCode, Uri}, response::{Html, IntoResponse, Response}
};

use crate::guard::RouteGuard;

fn title(path: &str) -> String {
    let section = path.trim_matches('/').split('/').next().unwrap_or_default();
    if section.is_empty() {
        return "HR Desk".to_string();
    }
    let mut chars = section.chars();
    match chars.next() {
        Some(first) => format!("{}{} | HR Desk", first.to_uppercase(), chars.as_str()),
        None => "HR Desk".to_string(),
    }
}

/// Renders a minimal page for `/`, `/login` and every guarded route; 404 otherwise.
pub async fn placeholder(uri: Uri) -> Response {
    let path = uri.path();
    if path != "/" && !RouteGuard::matches(path) {
        return (StatusCode::NOT_FOUND, Html("<h1>Not found</h1>".to_string())).into_response();
    }
    let title = title(path);
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><main><h1>{title}</h1></main></body></html>"
    ))
    .into_response()
}

pub async fn healthz() -> &'static str {
    "ok"
}
