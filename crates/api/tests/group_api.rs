//! HTTP-level integration tests for groups, membership and matches.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_group, create_user, delete_auth, get_auth, post_json_auth,
    put_json_auth, signed_in_user,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_creator_is_first_member(pool: PgPool) {
    let (user, token) = signed_in_user(&pool, "owner@test.com").await;
    let group_id = create_group(&pool, &token, "Club").await;

    let uri = format!("/api/groups/{group_id}/members");
    let response = get_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let members = body_json(response).await;
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["id"], user.id);
    assert_eq!(members[0]["isGuest"], false);

    let mine = body_json(get_auth(build_test_app(pool), "/api/groups/my", &token).await).await;
    assert_eq!(mine[0]["name"], "Club");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_group_name_returns_400(pool: PgPool) {
    let (_user, token) = signed_in_user(&pool, "owner@test.com").await;

    let response =
        post_json_auth(build_test_app(pool), "/api/groups", json!({ "name": "  " }), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_member_by_email(pool: PgPool) {
    let (_user, token) = signed_in_user(&pool, "owner@test.com").await;
    let friend = create_user(&pool, "friend@test.com").await;
    let group_id = create_group(&pool, &token, "Club").await;
    let uri = format!("/api/groups/{group_id}/add-member");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "email": " Friend@Test.com " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], friend.id);

    let response = post_json_auth(
        build_test_app(pool),
        &uri,
        json!({ "email": "nobody@test.com" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_guest_creates_synthetic_account(pool: PgPool) {
    let (_user, token) = signed_in_user(&pool, "owner@test.com").await;
    let group_id = create_group(&pool, &token, "Club").await;

    let response = post_json_auth(
        build_test_app(pool),
        &format!("/api/groups/{group_id}/add-guest"),
        json!({ "displayName": "Gail" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let guest = body_json(response).await;
    assert_eq!(guest["name"], "Gail");
    assert_eq!(guest["isGuest"], true);
    let email = guest["email"].as_str().unwrap();
    assert!(email.starts_with("guest_") && email.ends_with("@pickleball.local"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_removal_permissions(pool: PgPool) {
    let (_owner, owner_token) = signed_in_user(&pool, "owner@test.com").await;
    let (a, a_token) = signed_in_user(&pool, "a@test.com").await;
    let (b, _b_token) = signed_in_user(&pool, "b@test.com").await;
    let group_id = create_group(&pool, &owner_token, "Club").await;
    for email in ["a@test.com", "b@test.com"] {
        post_json_auth(
            build_test_app(pool.clone()),
            &format!("/api/groups/{group_id}/add-member"),
            json!({ "email": email }),
            &owner_token,
        )
        .await;
    }

    // A member cannot remove someone else.
    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/groups/{group_id}/members/{}", b.id),
        &a_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // But may leave.
    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/groups/{group_id}/members/{}", a.id),
        &a_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The creator can remove anyone.
    let response = delete_auth(
        build_test_app(pool),
        &format!("/api/groups/{group_id}/members/{}", b.id),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_creator_deletes_group(pool: PgPool) {
    let (_owner, owner_token) = signed_in_user(&pool, "owner@test.com").await;
    let (_other, other_token) = signed_in_user(&pool, "other@test.com").await;
    let group_id = create_group(&pool, &owner_token, "Club").await;
    let uri = format!("/api/groups/{group_id}");

    let response = delete_auth(build_test_app(pool.clone()), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(build_test_app(pool), &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_members(pool: PgPool) {
    let (_user, token) = signed_in_user(&pool, "owner@test.com").await;
    let group_id = create_group(&pool, &token, "Club").await;
    post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/groups/{group_id}/add-guest"),
        json!({ "displayName": "Alexandra" }),
        &token,
    )
    .await;

    let hits = body_json(
        get_auth(
            build_test_app(pool.clone()),
            &format!("/api/groups/{group_id}/search-members?query=ALEX"),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "Alexandra");

    let blank = body_json(
        get_auth(
            build_test_app(pool),
            &format!("/api/groups/{group_id}/search-members?query=%20"),
            &token,
        )
        .await,
    )
    .await;
    assert!(blank.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_and_rescore_match(pool: PgPool) {
    let (owner, token) = signed_in_user(&pool, "owner@test.com").await;
    let group_id = create_group(&pool, &token, "Club").await;
    let guest = body_json(
        post_json_auth(
            build_test_app(pool.clone()),
            &format!("/api/groups/{group_id}/add-guest"),
            json!({ "displayName": "Gail" }),
            &token,
        )
        .await,
    )
    .await;

    let body = json!({
        "groupId": group_id,
        "matchType": "SINGLES",
        "teamOneUserIds": [owner.id],
        "teamTwoUserIds": [guest["id"]],
        "teamOneScore": 11,
        "teamTwoScore": 7,
    });
    let response = post_json_auth(build_test_app(pool.clone()), "/api/matches", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["score"], "11-7");
    assert_eq!(created["matchType"], "SINGLES");
    assert_eq!(created["teamOne"][0]["userId"], owner.id);
    assert_eq!(created["teamTwo"][0]["userId"], guest["id"]);

    let match_id = created["id"].as_i64().unwrap();
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/matches/{match_id}/score"),
        json!({ "score": "11-9" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(
        get_auth(
            build_test_app(pool),
            &format!("/api/matches/by-group/{group_id}"),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["score"], "11-9");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_match_rejects_wrong_team_size(pool: PgPool) {
    let (owner, token) = signed_in_user(&pool, "owner@test.com").await;
    let group_id = create_group(&pool, &token, "Club").await;

    let body = json!({
        "groupId": group_id,
        "matchType": "DOUBLES",
        "teamOneUserIds": [owner.id],
        "teamTwoUserIds": [],
    });
    let response = post_json_auth(build_test_app(pool), "/api/matches", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
