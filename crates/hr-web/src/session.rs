//! Endpoints that own the auth cookie.

use std::sync::Arc;

use axum::{
    Json, extract::State, http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE}, response::{IntoResponse, Response}
};
use chrono::Utc;
use hr_types::{SessionClaims, UserProfile, auth::EstablishSession};
use serde::Serialize;
use session_store::cookie::{auth_cookie, expired_auth_cookie, is_cookie_value};
use tracing::{info, warn};

use crate::{ApiError, RouteGuard, guard::auth_token};

/// Shared state for the session endpoints.
#[derive(Clone)]
pub struct SessionState {
    pub guard: Arc<RouteGuard>,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: Option<UserProfile>,
    /// Unix seconds, when the token carries claims.
    pub expires_at: Option<i64>,
}

impl SessionInfo {
    fn new(claims: Option<SessionClaims>, fallback_user: Option<UserProfile>) -> Self {
        match claims {
            Some(claims) => Self {
                user: Some(claims.user),
                expires_at: Some(claims.expires_at),
            },
            None => Self {
                user: fallback_user,
                expires_at: None,
            },
        }
    }
}

fn with_cookie(status: StatusCode, cookie: &str, body: impl IntoResponse) -> Result<Response, ApiError> {
    let value = HeaderValue::from_str(cookie).map_err(|_| ApiError::bad_request("token contains characters not allowed in a cookie"))?;
    let mut response = (status, body).into_response();
    response.headers_mut().insert(SET_COOKIE, value);
    Ok(response)
}

/// `POST /api/session`: store a login's token in the auth cookie.
///
/// With a signing key configured the token must verify, and the cookie
/// expires with it; otherwise the cookie lasts for the browser session.
pub async fn establish(State(state): State<SessionState>, Json(body): Json<EstablishSession>) -> Result<Response, ApiError> {
    let token = body.token.trim();
    if token.is_empty() {
        return Err(ApiError::bad_request("token must not be empty"));
    }
    if !is_cookie_value(token) {
        return Err(ApiError::bad_request("token contains characters not allowed in a cookie"));
    }

    let claims = state.guard.verifier().verify(token).map_err(|e| {
        warn!(error = %e, "rejected session token");
        ApiError::unauthorized(e.to_string())
    })?;
    let max_age = match (&claims, state.guard.verifier().is_signed()) {
        (Some(claims), true) => Some((claims.expires_at - Utc::now().timestamp()).max(0)),
        _ => None,
    };

    let info = SessionInfo::new(claims, body.user);
    info!(user = info.user.as_ref().map(|u| u.id.as_str()), "session established");
    with_cookie(StatusCode::OK, &auth_cookie(token, max_age, state.secure_cookies), Json(info))
}

/// `POST /api/session/logout`: remove the auth cookie. Always succeeds.
pub async fn logout() -> Result<Response, ApiError> {
    info!("session cleared");
    with_cookie(StatusCode::NO_CONTENT, &expired_auth_cookie(), ())
}

/// `GET /api/session`: the session behind the current cookie, or 401.
pub async fn current(State(state): State<SessionState>, headers: HeaderMap) -> Result<Json<SessionInfo>, ApiError> {
    let token = auth_token(&headers).ok_or_else(|| ApiError::unauthorized("not signed in"))?;
    let claims = state
        .guard
        .verifier()
        .verify(token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;
    Ok(Json(SessionInfo::new(claims, None)))
}
