//! Session persistence for HR Desk.
//!
//! The [`SessionStore`] keeps the auth token and the cached user profile in a
//! pluggable key/value [`StorageBackend`]. Tokens minted by [`SessionSigner`]
//! carry signed [`hr_types::SessionClaims`], so the web gateway and the client
//! read the same session instead of tracking two unrelated flags.

pub mod backend;
pub mod cookie;
pub mod error;
pub mod store;
pub mod token;

pub use backend::{FileStorage, MemoryStorage, NoopStorage, StorageBackend, StorageType, default_store_path};
pub use error::{StoreError, StoreResult};
pub use store::{Navigator, SessionStore};
pub use token::{SessionSigner, TokenError, decode_unverified};
