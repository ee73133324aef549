use serde::{Deserialize, Serialize};

/// Storage key holding the session token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Storage key holding the serialized [`UserProfile`].
pub const USER_DATA_KEY: &str = "user_data";
/// Cookie carrying the session token; shares its name with the storage key.
pub const AUTH_COOKIE: &str = "auth_token";

pub const LOGIN_ROUTE: &str = "/login";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const PUBLIC_ROOT: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
/// Client-side copy of the signed-in user, written at login and read for display.
pub struct UserProfile {
    /// Backend user identifier.
    pub id: String,
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role label, e.g. `admin` or `hr`.
    pub role: String,
}

impl std::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl UserProfile {
    /// Up to two upper-cased initials, one per space-separated word.
    /// Returns `None` when the name is blank so callers can show an icon instead.
    pub fn initials(&self) -> Option<String> {
        let initials: String = self
            .name
            .split(' ')
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        (!initials.is_empty()).then_some(initials)
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() { "User" } else { &self.name }
    }

    pub fn display_role(&self) -> &str {
        if self.role.trim().is_empty() { "Role" } else { &self.role }
    }
}

/// Top bar greeting for an optional signed-in user.
pub fn greeting(user: Option<&UserProfile>) -> String {
    match user.map(|u| u.name.trim()).filter(|name| !name.is_empty()) {
        Some(name) => format!("Welcome back, {}", name),
        None => "Welcome back".to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Claims carried inside a signed session token.
pub struct SessionClaims {
    pub user: UserProfile,
    /// Unix seconds.
    pub issued_at: i64,
    /// Unix seconds; the token is rejected at or after this instant.
    pub expires_at: i64,
}

impl SessionClaims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Body accepted by the gateway when a login completes.
pub struct EstablishSession {
    /// Token issued by the backend.
    pub token: String,
    /// Profile to mirror alongside the token, if the login response carried one.
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            email: "jane@example.com".to_string(),
            name: name.to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(profile("jane ann doe").initials().as_deref(), Some("JA"));
        assert_eq!(profile("Jane").initials().as_deref(), Some("J"));
        assert_eq!(profile("jane  doe").initials().as_deref(), Some("JD"));
        assert_eq!(profile("").initials(), None);
    }

    #[test]
    fn display_falls_back_to_placeholders() {
        let mut user = profile(" ");
        user.role.clear();
        assert_eq!(user.display_name(), "User");
        assert_eq!(user.display_role(), "Role");
        assert_eq!(greeting(Some(&user)), "Welcome back");
        assert_eq!(greeting(Some(&profile("Jane Doe"))), "Welcome back, Jane Doe");
        assert_eq!(greeting(None), "Welcome back");
    }

    #[test]
    fn claims_expire_at_boundary() {
        let claims = SessionClaims {
            user: profile("Jane"),
            issued_at: 100,
            expires_at: 200,
        };
        assert!(!claims.is_expired_at(199));
        assert!(claims.is_expired_at(200));
    }

    #[test]
    fn claims_use_camel_case() {
        let claims = SessionClaims {
            user: profile("Jane"),
            issued_at: 1,
            expires_at: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["issuedAt"], 1);
        assert_eq!(json["expiresAt"], 2);
    }
}
