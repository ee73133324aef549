//! Minimal `Cookie` / `Set-Cookie` handling for the auth cookie.

use hr_types::auth::AUTH_COOKIE;

/// Value of cookie `name` in a `Cookie` request header.
/// An empty value counts as absent.
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// True when `value` is non-empty and made only of RFC 6265 cookie-octets:
/// visible ASCII other than `"`, `,`, `;` and `\`.
pub fn is_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

/// `Set-Cookie` value storing `token` in the auth cookie.
pub fn auth_cookie(token: &str, max_age_secs: Option<i64>, secure: bool) -> String {
    let mut cookie = format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age_secs {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the auth cookie.
pub fn expired_auth_cookie() -> String {
    format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_cookie() {
        let header = "theme=dark; auth_token=abc.def ; lang=en";
        assert_eq!(read_cookie(header, "auth_token"), Some("abc.def"));
        assert_eq!(read_cookie(header, "lang"), Some("en"));
        assert_eq!(read_cookie(header, "missing"), None);
        assert_eq!(read_cookie("auth_token=", "auth_token"), None);
        assert_eq!(read_cookie("xauth_token=1", "auth_token"), None);
        assert_eq!(read_cookie("auth_token=\"q\"", "auth_token"), Some("q"));
    }

    #[test]
    fn cookie_values_exclude_separators() {
        assert!(is_cookie_value("abc.def-_~+/="));
        assert!(!is_cookie_value(""));
        for bad in ["abc; Domain=evil.example", "a,b", "a b", "a\"b", "a\\b", "tab\there", "caf\u{e9}"] {
            assert!(!is_cookie_value(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn builds_set_cookie_values() {
        assert_eq!(
            auth_cookie("t", Some(60), true),
            "auth_token=t; Path=/; HttpOnly; SameSite=Lax; Max-Age=60; Secure"
        );
        assert_eq!(auth_cookie("t", None, false), "auth_token=t; Path=/; HttpOnly; SameSite=Lax");
        assert!(expired_auth_cookie().ends_with("Max-Age=0"));
    }
}
