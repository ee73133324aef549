use std::sync::Arc;

use axum::{
    extract::{Request, State}, http::{HeaderMap, header::COOKIE}, middleware::Next, response::{IntoResponse, Redirect, Response}
};
use hr_types::auth::{AUTH_COOKIE, DASHBOARD_ROUTE, LOGIN_ROUTE, PUBLIC_ROOT};
use session_store::cookie::read_cookie;
use tracing::debug;

use crate::SessionVerifier;

/// Route prefixes that require a session; each also covers its sub-paths.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/employees", "/payroll", "/kpi", "/approval", "/attendance"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Pre-navigation check on the auth cookie.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    verifier: SessionVerifier,
}

impl RouteGuard {
    pub fn new(verifier: SessionVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &SessionVerifier {
        &self.verifier
    }

    /// Whether the guard runs for `path` at all.
    pub fn matches(path: &str) -> bool {
        path == LOGIN_ROUTE
            || PROTECTED_PREFIXES
                .iter()
                .any(|prefix| path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest.starts_with('/')))
    }

    pub fn decide(&self, path: &str, cookie: Option<&str>) -> GuardDecision {
        if !Self::matches(path) {
            return GuardDecision::Allow;
        }
        let authenticated = cookie.is_some_and(|token| self.verifier.accepts(token));
        if path == LOGIN_ROUTE && authenticated {
            return GuardDecision::Redirect(DASHBOARD_ROUTE);
        }
        if path != LOGIN_ROUTE && path != PUBLIC_ROOT && !authenticated {
            return GuardDecision::Redirect(LOGIN_ROUTE);
        }
        GuardDecision::Allow
    }
}

/// Auth cookie from any `Cookie` header of the request.
pub fn auth_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| read_cookie(header, AUTH_COOKIE))
}

/// Middleware that redirects with 307 according to [`RouteGuard::decide`].
pub async fn route_guard(State(guard): State<Arc<RouteGuard>>, request: Request, next: Next) -> Response {
    match guard.decide(request.uri().path(), auth_token(request.headers())) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(location) => {
            debug!(path = %request.uri().path(), %location, "route guard redirect");
            Redirect::temporary(location).into_response()
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
