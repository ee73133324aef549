//! Signed session tokens.
//!
//! Format: `base64url(claims json) "." base64url(hmac-sha256(first segment))`,
//! both without padding. The gateway verifies the signature and expiry; the
//! client only decodes the claims for display.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use hr_types::{SessionClaims, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed session token: {0}")]
    Malformed(String),

    #[error("session token signature mismatch")]
    BadSignature,

    #[error("session token expired")]
    Expired,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Issues and verifies session tokens with a shared secret.
pub struct SessionSigner {
    secret: SecretString,
    ttl: Duration,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionSigner {
    pub fn new(secret: SecretString, ttl: Duration) -> Result<Self, TokenError> {
        if secret.expose_secret().is_empty() {
            return Err(TokenError::InvalidKey("secret must not be empty".to_string()));
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidKey("session ttl must be positive".to_string()));
        }
        Ok(Self { secret, ttl })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`, valid from now for the configured ttl.
    pub fn issue(&self, user: UserProfile) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user: UserProfile, now: i64) -> Result<String, TokenError> {
        let claims = SessionClaims {
            user,
            issued_at: now,
            expires_at: now + self.ttl.num_seconds(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let json = serde_json::to_vec(claims).map_err(|e| TokenError::Malformed(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Check signature first, then expiry against `now` (unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<SessionClaims, TokenError> {
        let (payload, signature) = split(token)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| TokenError::Malformed(format!("signature: {e}")))?;
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| TokenError::BadSignature)?;

        let claims = decode_payload(payload)?;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes()).map_err(|e| TokenError::InvalidKey(e.to_string()))
    }
}

/// Decode the claims of a token without checking its signature or expiry.
///
/// Only for display on the client; authorization decisions go through
/// [`SessionSigner::verify`].
pub fn decode_unverified(token: &str) -> Result<SessionClaims, TokenError> {
    let (payload, _) = split(token)?;
    decode_payload(payload)
}

fn split(token: &str) -> Result<(&str, &str), TokenError> {
    match token.split_once('.') {
        Some((payload, signature)) if !payload.is_empty() && !signature.is_empty() && !signature.contains('.') => {
            Ok((payload, signature))
        }
        _ => Err(TokenError::Malformed("expected <payload>.<signature>".to_string())),
    }
}

fn decode_payload(payload: &str) -> Result<SessionClaims, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Malformed(format!("payload: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Malformed(format!("claims: {e}")))
}
