use std::{path::PathBuf, sync::Arc};

use hr_types::SessionClaims;
use session_store::{SessionSigner, TokenError, decode_unverified};

/// How the gateway decides whether an auth cookie is acceptable.
#[derive(Debug, Clone)]
pub enum SessionVerifier {
    /// Any non-empty cookie passes. Matches deployments where the backend
    /// issues opaque tokens the gateway cannot check.
    PresenceOnly,
    /// The cookie must be a session token signed with this key and not expired.
    Signed(Arc<SessionSigner>),
}

impl SessionVerifier {
    /// Claims carried by `token` if it is acceptable.
    ///
    /// With [`SessionVerifier::PresenceOnly`] an opaque token is accepted
    /// with no claims; a signed-looking token still has its claims decoded.
    pub fn verify(&self, token: &str) -> Result<Option<SessionClaims>, TokenError> {
        match self {
            SessionVerifier::PresenceOnly => Ok(decode_unverified(token).ok()),
            SessionVerifier::Signed(signer) => signer.verify(token).map(Some),
        }
    }

    pub fn accepts(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, SessionVerifier::Signed(_))
    }
}

/// Top-level configuration for the web gateway.
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    pub bind: String,
    pub port: u16,
    /// Built front-end assets; placeholder pages are served when unset.
    pub static_dir: Option<PathBuf>,
    pub verifier: SessionVerifier,
    /// Adds `Secure` to the auth cookie. Enable behind HTTPS.
    pub secure_cookies: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: None,
            verifier: SessionVerifier::PresenceOnly,
            secure_cookies: false,
        }
    }
}
