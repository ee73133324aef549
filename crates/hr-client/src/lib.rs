//! HR Desk REST client.
//!
//! [`ApiClient`] implements [`HrApi`] over HTTP with the token from a
//! [`session_store::SessionStore`]. The page controllers in [`pages`] hold
//! each dashboard page's view state and follow one convention: load through a
//! [`Resource`], toast a fixed message on failure, always clear the loading
//! flag, and reload after a successful mutation.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod pages;
pub mod resource;
pub mod retry;

use std::sync::{Mutex, MutexGuard};

pub use api::{ApiClient, HrApi};
pub use config::{ClientSettings, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
pub use notify::{Notifier, Toast, ToastQueue, ToastVariant};
pub use pages::PageContext;
pub use resource::{LoadOutcome, Resource};
pub use retry::RetryPolicy;

/// Page state is only touched in short synchronous sections, so a poisoned
/// lock still holds consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
