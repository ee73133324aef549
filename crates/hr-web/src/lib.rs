//! HR Desk web gateway.
//!
//! Serves the dashboard pages behind the [`RouteGuard`], and owns the auth
//! cookie through the `/api/session` endpoints so the cookie and the
//! client's stored token are always written together.

pub mod config;
pub mod error;
pub mod guard;
pub mod pages;
pub mod server;
pub mod session;

pub use config::{SessionVerifier, WebServerConfig};
pub use error::ApiError;
pub use guard::{GuardDecision, PROTECTED_PREFIXES, RouteGuard};
pub use server::{router, run_web_server, serve};
pub use session::SessionInfo;
