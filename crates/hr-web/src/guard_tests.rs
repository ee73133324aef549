use std::sync::Arc;

use chrono::Duration;
use hr_types::UserProfile;
use secrecy::SecretString;
use session_store::SessionSigner;

use super::*;

fn presence() -> RouteGuard {
    RouteGuard::new(SessionVerifier::PresenceOnly)
}

fn signer() -> Arc<SessionSigner> {
    Arc::new(SessionSigner::new(SecretString::from("guard-secret".to_string()), Duration::hours(1)).unwrap())
}

fn user() -> UserProfile {
    UserProfile {
        id: "u-1".to_string(),
        email: "hr@example.com".to_string(),
        name: "Harriet Rowe".to_string(),
        role: "hr".to_string(),
    }
}

#[test]
fn matcher_covers_protected_prefixes_and_exact_login() {
    for path in ["/dashboard", "/employees/42/edit", "/payroll/bulk-generate", "/kpi", "/approval", "/attendance/", "/login"] {
        assert!(RouteGuard::matches(path), "{path} should be guarded");
    }
    for path in ["/", "/login/help", "/dashboards", "/api/session", "/healthz", "/assets/app.js", "/kpis"] {
        assert!(!RouteGuard::matches(path), "{path} should bypass the guard");
    }
}

#[test]
fn presence_only_decision_matrix() {
    let guard = presence();
    for prefix in PROTECTED_PREFIXES {
        let nested = format!("{prefix}/7");
        for path in [*prefix, nested.as_str()] {
            assert_eq!(guard.decide(path, None), GuardDecision::Redirect("/login"), "{path} without a cookie");
            assert_eq!(guard.decide(path, Some("anything")), GuardDecision::Allow, "{path} with a cookie");
        }
    }
    assert_eq!(guard.decide("/login", Some("anything")), GuardDecision::Redirect("/dashboard"));
    assert_eq!(guard.decide("/login", None), GuardDecision::Allow);
    assert_eq!(guard.decide("/", None), GuardDecision::Allow);
    assert_eq!(guard.decide("/reports", None), GuardDecision::Allow);
}

#[test]
fn signed_guard_rejects_forged_and_expired_tokens() {
    let signer = signer();
    let guard = RouteGuard::new(SessionVerifier::Signed(signer.clone()));
    let valid = signer.issue(user()).unwrap();
    let expired = signer.issue_at(user(), 1_000).unwrap();
    let forged = SessionSigner::new(SecretString::from("other".to_string()), Duration::hours(1))
        .unwrap()
        .issue(user())
        .unwrap();

    assert_eq!(guard.decide("/payroll", Some(&valid)), GuardDecision::Allow);
    assert_eq!(guard.decide("/login", Some(&valid)), GuardDecision::Redirect("/dashboard"));
    for bad in [expired.as_str(), forged.as_str(), "opaque"] {
        assert_eq!(guard.decide("/payroll", Some(bad)), GuardDecision::Redirect("/login"));
        assert_eq!(guard.decide("/login", Some(bad)), GuardDecision::Allow);
    }
}

#[test]
fn reads_auth_cookie_from_any_cookie_header() {
    let mut headers = HeaderMap::new();
    headers.append(COOKIE, "theme=dark".parse().unwrap());
    assert_eq!(auth_token(&headers), None);
    headers.append(COOKIE, "lang=en; auth_token=t-1".parse().unwrap());
    assert_eq!(auth_token(&headers), Some("t-1"));
}
