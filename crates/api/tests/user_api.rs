//! HTTP-level tests for the user directory (administrators only).

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_auth, post_json, post_json_auth, put_json_auth};
use sqlx::PgPool;
use stockroom_core::roles::Role;

#[sqlx::test(migrations = "../db/migrations")]
async fn administrator_creates_user_who_can_log_in(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        serde_json::json!({ "username": "newhire", "password": "first-day", "role": "operator" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newhire");
    assert_eq!(json["data"]["role"], "operator");
    assert!(json["data"].get("password_hash").is_none());

    let login = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "newhire", "password": "first-day" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_administrators_are_forbidden(pool: PgPool) {
    for (name, role) in [("sup", Role::Supervisor), ("op", Role::Operator)] {
        let token = common::login_as(&pool, name, role).await;
        let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/users", &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{role}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_password_and_bad_role_are_rejected(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;

    let short = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        serde_json::json!({ "username": "shorty", "password": "12345", "role": "operator" }),
        &admin,
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    let json = body_json(short).await;
    assert!(json["error"].as_str().unwrap().contains("at least 6"));

    let bad_role = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/users",
        serde_json::json!({ "username": "boss", "password": "long-enough", "role": "owner" }),
        &admin,
    )
    .await;
    assert_eq!(bad_role.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_username_is_a_conflict(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/users",
        serde_json::json!({ "username": "admin", "password": "another-one", "role": "operator" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_role(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;
    let worker = common::create_user(&pool, "worker", Role::Operator).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", worker.id),
        serde_json::json!({ "role": "supervisor" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "supervisor");

    let fetched = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", worker.id),
        &admin,
    )
    .await;
    assert_eq!(body_json(fetched).await["data"]["role"], "supervisor");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_change_replaces_the_old_password(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;
    let worker = common::create_user(&pool, "forgetful", Role::Operator).await;

    let response = patch_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}/password", worker.id),
        Some(serde_json::json!({ "new_password": "brand-new-secret" })),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let old = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "forgetful", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "forgetful", "password": "brand-new-secret" }),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn toggle_status_flips_and_blocks_self(pool: PgPool) {
    let admin_user = common::create_user(&pool, "admin", Role::Administrator).await;
    let admin = common::token_for(&admin_user);
    let worker = common::create_user(&pool, "seasonal", Role::Operator).await;

    let response = patch_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}/toggle-status", worker.id),
        None,
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], false);

    let own = patch_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}/toggle-status", admin_user.id),
        None,
        &admin,
    )
    .await;
    assert_eq!(own.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_user_is_404(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;
    let response = get_auth(common::build_test_app(pool), "/api/v1/users/9999", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_or_short_usernames_are_rejected_after_trimming(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;

    for username in ["    ", "  ab  "] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/users",
            serde_json::json!({ "username": username, "password": "first-day", "role": "operator" }),
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{username:?}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let stored: Vec<String> = sqlx::query_scalar("SELECT username FROM users ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(stored, vec!["admin".to_string()]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn usernames_are_stored_trimmed(pool: PgPool) {
    let admin = common::login_as(&pool, "admin", Role::Administrator).await;
    let worker = common::create_user(&pool, "picker", Role::Operator).await;

    let created = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        serde_json::json!({ "username": "  packer  ", "password": "first-day", "role": "operator" }),
        &admin,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(body_json(created).await["data"]["username"], "packer");

    let blank_rename = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", worker.id),
        serde_json::json!({ "username": "     " }),
        &admin,
    )
    .await;
    assert_eq!(blank_rename.status(), StatusCode::BAD_REQUEST);

    let rename = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", worker.id),
        serde_json::json!({ "username": " loader " }),
        &admin,
    )
    .await;
    assert_eq!(rename.status(), StatusCode::OK);
    assert_eq!(body_json(rename).await["data"]["username"], "loader");
}
