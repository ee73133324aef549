use session_store::StoreError;
use thiserror::Error;

/// Errors that can occur while talking to the HR backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered with a non-success status
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Request { status: u16, message: Option<String> },

    /// Connection, TLS or timeout failure before a response arrived
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Invalid base URL or endpoint
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Session store error
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    /// Form input rejected before sending
    #[error("validation failed: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status of a [`ClientError::Request`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `message` field of the backend's error body, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Request { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Text for a failure toast: the backend's own message when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Transport failures and 5xx responses may succeed on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(e) => !e.is_builder() && !e.is_decode(),
            ClientError::Request { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
