//! Gateway error type with HTTP status mapping.

use axum::{
    Json, http::StatusCode, response::{IntoResponse, Response}
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the gateway's JSON endpoints. The body is always
/// `{"message": "..."}` so the client reads it like a backend error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("invalid request: {message}")]
    BadRequest { message: String },

    /// 401 Unauthorized
    #[error("{message}")]
    Unauthorized { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}
