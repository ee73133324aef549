use std::sync::Arc;

use hr_types::{
    SessionClaims, UserProfile, auth::{AUTH_TOKEN_KEY, LOGIN_ROUTE, USER_DATA_KEY}
};
use tracing::{debug, info, warn};

use crate::{MemoryStorage, NoopStorage, StorageBackend, StoreError, StoreResult, token::decode_unverified};

/// Performs a full navigation that discards all in-memory view state.
pub trait Navigator: Send + Sync {
    fn navigate_hard(&self, route: &str);
}

/// Persisted auth token and cached user profile.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    /// Store with no backing storage: reads see nothing, writes are dropped.
    pub fn detached() -> Self {
        Self::new(Arc::new(NoopStorage))
    }

    pub fn set_token(&self, token: &str) -> StoreResult<()> {
        self.storage.set(AUTH_TOKEN_KEY, token)
    }

    pub fn token(&self) -> Option<String> {
        self.read(AUTH_TOKEN_KEY)
    }

    /// Remove both the token and the profile. Safe to call repeatedly.
    pub fn clear(&self) -> StoreResult<()> {
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.storage.remove(USER_DATA_KEY)
    }

    pub fn set_profile(&self, user: &UserProfile) -> StoreResult<()> {
        let json = serde_json::to_string(user).map_err(|source| StoreError::Serialize {
            key: USER_DATA_KEY.to_string(),
            source,
        })?;
        self.storage.set(USER_DATA_KEY, &json)
    }

    /// Stored profile, or `None` when unset or unreadable.
    pub fn profile(&self) -> Option<UserProfile> {
        let raw = self.read(USER_DATA_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(key = USER_DATA_KEY, error = %e, "ignoring malformed stored profile");
                None
            }
        }
    }

    /// True iff a token is stored. The token itself is not inspected.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Record a completed login. A missing `user` drops any profile left
    /// over from a previous session.
    pub fn establish(&self, token: &str, user: Option<&UserProfile>) -> StoreResult<()> {
        self.set_token(token)?;
        match user {
            Some(user) => self.set_profile(user)?,
            None => self.storage.remove(USER_DATA_KEY)?,
        }
        debug!(has_profile = user.is_some(), "session established");
        Ok(())
    }

    /// Claims of the stored token when it is a signed session token.
    /// Not verified; use for display only.
    pub fn claims(&self) -> Option<SessionClaims> {
        decode_unverified(&self.token()?).ok()
    }

    /// The stored profile, falling back to the user inside the token claims.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.profile().or_else(|| self.claims().map(|c| c.user))
    }

    /// Clear the session, then hard-navigate to the login route.
    ///
    /// Navigation happens even if clearing failed; the error is still returned.
    pub fn logout(&self, navigator: &dyn Navigator) -> StoreResult<()> {
        let cleared = self.clear();
        if let Err(e) = &cleared {
            warn!(error = %e, "failed to clear session during logout");
        }
        info!(route = LOGIN_ROUTE, "logged out");
        navigator.navigate_hard(LOGIN_ROUTE);
        cleared
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read session store");
                None
            }
        }
    }
}
