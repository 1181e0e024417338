#![allow(dead_code)]

use anyhow::Result;
use grupi::{
    api::ApiConfig,
    session::{Credentials, SessionStore},
};
use serde_json::{json, Value};
use std::net::TcpListener;
use wiremock::{
    matchers::{body_json, header, header_regex, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const TOKEN: &str = "tok123";
pub const SESSION: &str = "s3ss10n";
pub const EMAIL: &str = "a@x.com";
pub const PASSWORD: &str = "good";

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

pub fn config(server: &MockServer, timeout_ms: u64) -> Result<ApiConfig> {
    Ok(ApiConfig::new(
        &format!("{}/api/v1/", server.uri()),
        &format!("{}/", server.uri()),
        timeout_ms,
    )?)
}

pub fn store(server: &MockServer) -> Result<SessionStore> {
    Ok(SessionStore::from_config(&config(server, 2_000)?)?)
}

pub fn user_json() -> Value {
    json!({
        "pk": 7,
        "email": EMAIL,
        "first_name": "Ana",
        "last_name": "Xavier",
        "profile": { "polo": "Centro", "curso": "Engenharia", "drp": "1" }
    })
}

pub fn good_credentials() -> Credentials {
    Credentials::new(EMAIL, PASSWORD)
}

pub fn issue_token() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", format!("csrftoken={TOKEN}; Path=/").as_str())
        .set_body_json(json!({ "detail": "CSRF cookie set" }))
}

/// `/csrf/` issues the token cookie.
pub async fn mount_csrf(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/csrf/"))
        .respond_with(issue_token())
        .mount(server)
        .await;
}

/// Login accepts `a@x.com`/`good` only when the token header is echoed back,
/// and `/auth/user/` answers only for the issued session cookie.
pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login/"))
        .and(header("X-CSRFToken", TOKEN))
        .and(body_json(json!({ "email": EMAIL, "password": PASSWORD })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "set-cookie",
                    format!("sessionid={SESSION}; Path=/; HttpOnly").as_str(),
                )
                .set_body_json(json!({ "key": "ignored" })),
        )
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/user/"))
        .and(header_regex("cookie", &format!("sessionid={SESSION}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/user/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .mount(server)
        .await;
}

pub async fn mount_logout(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout/"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "detail": "bye" })))
        .mount(server)
        .await;
}

/// CSRF, auth and a successful logout.
pub async fn backend() -> MockServer {
    let server = MockServer::start().await;
    mount_csrf(&server).await;
    mount_auth(&server).await;
    mount_logout(&server, 200).await;
    server
}

pub async fn requests(server: &MockServer) -> Result<Vec<Request>> {
    server
        .received_requests()
        .await
        .ok_or_else(|| anyhow::anyhow!("wiremock request recording is disabled"))
}

pub async fn hits(server: &MockServer, target: &str) -> Result<usize> {
    Ok(requests(server)
        .await?
        .iter()
        .filter(|request| request.url.path() == target)
        .count())
}
