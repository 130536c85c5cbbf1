#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use stockroom_api::auth::jwt::{generate_access_token, JwtConfig};
use stockroom_api::auth::password::hash_password;
use stockroom_api::config::{LogFormat, ServerConfig};
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_core::roles::Role;
use stockroom_db::models::user::{CreateUser, User};
use stockroom_db::repositories::UserRepo;
use tower::ServiceExt;

/// Password given to every user created with [`create_user`].
pub const TEST_PASSWORD: &str = "counting-boxes";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: String::new(),
        db_max_connections: 5,
        log_format: LogFormat::Pretty,
        bootstrap_admin: None,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 8,
        },
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a user with [`TEST_PASSWORD`] and the given role.
pub async fn create_user(pool: &PgPool, username: &str, role: Role) -> User {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.as_str().to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Issue a bearer token for `user` with the test JWT secret.
pub fn token_for(user: &User) -> String {
    let role: Role = user.role.parse().expect("seeded role should be valid");
    generate_access_token(user.id, role, &test_config().jwt).expect("token generation should succeed")
}

/// Create a user with `role` and return its bearer token.
pub async fn login_as(pool: &PgPool, username: &str, role: Role) -> String {
    let user = create_user(pool, username, role).await;
    token_for(&user)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(
    app: Router,
    uri: &str,
    body: Option<serde_json::Value>,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), body).await
}

/// Send a raw (possibly malformed) JSON body.
pub async fn post_raw_auth(app: Router, uri: &str, raw: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Create a product through the API and return its id.
pub async fn create_product(pool: &PgPool, token: &str, code: &str, min_stock: i32) -> i64 {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": format!("Product {code}"),
        "code": code,
        "min_stock": min_stock,
    });
    let response = post_json_auth(app, "/api/v1/products", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Record a movement through the API.
pub async fn record_movement(
    pool: &PgPool,
    token: &str,
    product_id: i64,
    kind: &str,
    quantity: i64,
) -> Response<Body> {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "kind": kind,
        "quantity": quantity,
        "product_id": product_id,
    });
    post_json_auth(app, "/api/v1/movements", body, token).await
}
