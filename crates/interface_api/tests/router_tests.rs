//! Router wiring tests
//!
//! These run against a lazily-connected pool, so only routes that never
//! touch the database are exercised end to end. The point is the wiring:
//! public routes bypass auth, protected routes demand a valid token.

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use sqlx::postgres::PgPoolOptions;

use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::create_router;

fn test_server() -> TestServer {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/garments_test")
        .expect("lazy pool");
    let config = ApiConfig::default();
    TestServer::new(create_router(pool, config)).expect("server")
}

#[tokio::test]
async fn test_health_is_public() {
    let server = test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_reject_missing_token() {
    let server = test_server();

    let response = server.get("/api/v1/accounts").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_protected_routes_reject_garbage_token() {
    let server = test_server();

    let response = server
        .get("/api/v1/documents")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer not-a-jwt"),
        )
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_rejected() {
    let server = test_server();

    let token = create_token("u1", vec!["admin".to_string()], "wrong-secret", 3600)
        .expect("token");
    let response = server
        .get("/api/v1/accounts")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
        )
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = test_server();

    let response = server.get("/api/v2/accounts").await;
    response.assert_status_not_found();
}
