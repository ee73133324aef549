use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use chrono::Duration;
use hr_types::UserProfile;
use hr_web::{SessionVerifier, WebServerConfig, serve};
use reqwest::{
    Client, StatusCode, header::{COOKIE, LOCATION, SET_COOKIE}, redirect::Policy
};
use secrecy::SecretString;
use serde_json::{Value, json};
use session_store::SessionSigner;

async fn spawn(config: WebServerConfig) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, &config, std::future::pending()).await.unwrap();
    });
    addr
}

fn http() -> Client {
    Client::builder().redirect(Policy::none()).build().unwrap()
}

fn signer(secret: &str) -> Arc<SessionSigner> {
    Arc::new(SessionSigner::new(SecretString::from(secret.to_string()), Duration::hours(2)).unwrap())
}

fn signed_config(signer: &Arc<SessionSigner>, static_dir: Option<PathBuf>) -> WebServerConfig {
    WebServerConfig {
        verifier: SessionVerifier::Signed(signer.clone()),
        static_dir,
        ..WebServerConfig::default()
    }
}

fn user() -> UserProfile {
    UserProfile {
        id: "u-9".to_string(),
        email: "hr@example.com".to_string(),
        name: "Harriet Rowe".to_string(),
        role: "hr".to_string(),
    }
}

#[tokio::test]
async fn guard_redirects_with_307() {
    let addr = spawn(WebServerConfig::default()).await;
    let http = http();

    let response = http.get(format!("http://{addr}/employees/7")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/login");

    let response = http
        .get(format!("http://{addr}/login"))
        .header(COOKIE, "auth_token=opaque")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/dashboard");

    for path in ["/", "/login", "/healthz"] {
        let response = http.get(format!("http://{addr}{path}")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }

    let response = http
        .get(format!("http://{addr}/kpi"))
        .header(COOKIE, "auth_token=opaque")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Kpi | HR Desk"));

    let response = http.get(format!("http://{addr}/reports")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signed_session_lifecycle() {
    let signer = signer("gateway-secret");
    let addr = spawn(signed_config(&signer, None)).await;
    let http = http();
    let token = signer.issue(user()).unwrap();

    let response = http
        .post(format!("http://{addr}/api/session"))
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with(&format!("auth_token={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age=")));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["name"], "Harriet Rowe");

    let response = http
        .get(format!("http://{addr}/payroll"))
        .header(COOKIE, format!("auth_token={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = http
        .get(format!("http://{addr}/api/session"))
        .header(COOKIE, format!("auth_token={token}"))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["id"], "u-9");

    let response = http.post(format!("http://{addr}/api/session/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers()[SET_COOKIE].to_str().unwrap().ends_with("Max-Age=0"));
}

#[tokio::test]
async fn signed_gateway_rejects_bad_tokens() {
    let signer = signer("gateway-secret");
    let addr = spawn(signed_config(&signer, None)).await;
    let http = http();
    let forged = self::signer("someone-else").issue(user()).unwrap();
    let expired = signer.issue_at(user(), 1_000).unwrap();

    let response = http
        .post(format!("http://{addr}/api/session"))
        .json(&json!({ "token": forged }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("signature"));

    for token in [forged.as_str(), expired.as_str(), "opaque"] {
        let response = http
            .get(format!("http://{addr}/dashboard"))
            .header(COOKIE, format!("auth_token={token}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    let response = http.get(format!("http://{addr}/api/session")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn presence_only_accepts_opaque_tokens() {
    let addr = spawn(WebServerConfig::default()).await;
    let http = http();

    let response = http
        .post(format!("http://{addr}/api/session"))
        .json(&json!({ "token": "backend-issued", "user": user() }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert_eq!(cookie, "auth_token=backend-issued; Path=/; HttpOnly; SameSite=Lax");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "hr@example.com");
    assert_eq!(body["expiresAt"], Value::Null);

    let response = http
        .post(format!("http://{addr}/api/session"))
        .json(&json!({ "token": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tokens_that_would_inject_cookie_attributes_are_rejected() {
    let addr = spawn(WebServerConfig::default()).await;
    let http = http();

    for token in ["abc; Domain=evil.example; Max-Age=999999999", "a,b", "has space", "quo\"ted"] {
        let response = http
            .post(format!("http://{addr}/api/session"))
            .json(&json!({ "token": token }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{token}");
        assert!(response.headers().get(SET_COOKIE).is_none(), "{token}");
        let body: Value = response.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().contains("not allowed in a cookie"));
    }
}

#[tokio::test]
async fn serves_static_dir_behind_guard() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("dashboard")).unwrap();
    std::fs::write(dir.path().join("dashboard/index.html"), "<h1>built dashboard</h1>").unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();

    let signer = signer("static-secret");
    let addr = spawn(signed_config(&signer, Some(dir.path().to_path_buf()))).await;
    let http = http();
    let token = signer.issue(user()).unwrap();

    let response = http.get(format!("http://{addr}/dashboard/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let response = http
        .get(format!("http://{addr}/dashboard/"))
        .header(COOKIE, format!("auth_token={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "<h1>built dashboard</h1>");

    let response = http.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(response.text().await.unwrap(), "<h1>home</h1>");
}
