//! HTTP-level integration tests for registration, login and the profile
//! endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_group, get, get_auth, post_json, post_json_auth,
    put_json_auth, signed_in_user, TEST_PASSWORD,
};
use pickleball_core::roles::ROLE_USER;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_then_login(pool: PgPool) {
    let body = json!({ "email": "  Alex@Example.COM ", "password": "secret1", "name": "Alex" });
    let response = post_json(build_test_app(pool.clone()), "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["message"].is_string());

    let body = json!({ "email": "alex@example.com", "password": "secret1" });
    let response = post_json(build_test_app(pool), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["email"], "alex@example.com");
    assert_eq!(json["name"], "Alex");
    assert_eq!(json["role"], ROLE_USER);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email_returns_409(pool: PgPool) {
    let body = json!({ "email": "dup@test.com", "password": "secret1" });
    let first = post_json(build_test_app(pool.clone()), "/api/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let body = json!({ "email": "DUP@test.com", "password": "secret1" });
    let second = post_json(build_test_app(pool), "/api/auth/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_short_password_returns_400(pool: PgPool) {
    let body = json!({ "email": "short@test.com", "password": "12345" });
    let response = post_json(build_test_app(pool), "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_returns_401(pool: PgPool) {
    let (_user, _token) = signed_in_user(&pool, "user@test.com").await;

    let body = json!({ "email": "user@test.com", "password": "not-the-password" });
    let response = post_json(build_test_app(pool), "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guest_cannot_log_in(pool: PgPool) {
    let (_user, token) = signed_in_user(&pool, "owner@test.com").await;
    let group_id = create_group(&pool, &token, "Club").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/groups/{group_id}/add-guest"),
        json!({ "displayName": "Guest Gail" }),
        &token,
    )
    .await;
    let guest = body_json(response).await;
    let guest_email = guest["email"].as_str().unwrap();

    let body = json!({ "email": guest_email, "password": "anything" });
    let response = post_json(build_test_app(pool), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_protected_route_rejects_bad_token(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/user/profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(build_test_app(pool), "/api/user/profile", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_update_trims_and_clears(pool: PgPool) {
    let (user, token) = signed_in_user(&pool, "profile@test.com").await;

    let body = json!({ "name": "  Pat  ", "photoUrl": "   " });
    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/user/profile",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(build_test_app(pool), "/api/user/profile", &token).await).await;
    assert_eq!(json["id"], user.id);
    assert_eq!(json["name"], "Pat");
    assert!(json["photoUrl"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password(pool: PgPool) {
    let (_user, token) = signed_in_user(&pool, "pw@test.com").await;

    let wrong = json!({ "currentPassword": "nope-nope", "newPassword": "brand-new-pw" });
    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/user/password",
        wrong,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "currentPassword": TEST_PASSWORD, "newPassword": "brand-new-pw" });
    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/user/password",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let login = json!({ "email": "pw@test.com", "password": "brand-new-pw" });
    let response = post_json(build_test_app(pool), "/api/auth/login", login).await;
    assert_eq!(response.status(), StatusCode::OK);
}
