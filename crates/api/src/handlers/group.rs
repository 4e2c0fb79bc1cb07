//! Handlers for the `/groups` resource and group membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pickleball_core::error::CoreError;
use pickleball_core::groups::{
    can_delete_group, can_remove_member, guest_email, normalize_email, normalize_search_query,
    require_name,
};
use pickleball_core::roles::ROLE_GUEST_ID;
use pickleball_core::types::DbId;
use pickleball_db::models::group::Group;
use pickleball_db::models::user::{CreateUser, GroupMember};
use pickleball_db::repositories::{GroupRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::state::AppState;

/// Stored for guest accounts. Not a PHC string, so it can never verify.
const UNUSABLE_PASSWORD_HASH: &str = "!";

/// Request body for `POST /groups`.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: Option<String>,
}

/// Request body for `POST /groups/{id}/add-member`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
}

/// Request body for `POST /groups/{id}/add-guest`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGuestRequest {
    pub display_name: Option<String>,
}

/// Load a group and check that `user_id` belongs to it.
///
/// 404 if the group does not exist, 403 if the caller is not a member.
pub(crate) async fn require_group_member(
    state: &AppState,
    group_id: DbId,
    user_id: DbId,
) -> AppResult<Group> {
    let group = GroupRepo::find_by_id(&state.pool, group_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Group",
            id: group_id,
        }))?;

    if !GroupRepo::is_member(&state.pool, group_id, user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not a member of this group".into(),
        )));
    }
    Ok(group)
}

/// POST /api/groups
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGroupRequest>,
) -> AppResult<(StatusCode, Json<Group>)> {
    let name = require_name(input.name.as_deref(), "Group name")?;
    let group = GroupRepo::create(&state.pool, &name, auth.user_id).await?;
    tracing::info!(group_id = group.id, user_id = auth.user_id, "Group created");
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/groups/my
pub async fn my_groups(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Group>>> {
    let groups = GroupRepo::list_for_member(&state.pool, auth.user_id).await?;
    Ok(Json(groups))
}

/// DELETE /api/groups/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let group = GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Group", id }))?;

    if !can_delete_group(group.created_by_id, auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the group creator can delete this group".into(),
        )));
    }

    GroupRepo::delete(&state.pool, id).await?;
    tracing::info!(group_id = id, user_id = auth.user_id, "Group deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/groups/{id}/members
pub async fn members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<GroupMember>>> {
    require_group_member(&state, id, auth.user_id).await?;
    let members = GroupRepo::list_members(&state.pool, id).await?;
    Ok(Json(members))
}

/// POST /api/groups/{id}/add-member
///
/// Adds an existing registered user by email. Adding someone twice is a no-op.
pub async fn add_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<Json<GroupMember>> {
    require_group_member(&state, id, auth.user_id).await?;

    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No registered user with email {email}")))?;

    GroupRepo::add_member(&state.pool, id, user.id).await?;
    tracing::info!(group_id = id, member_id = user.id, "Member added to group");
    Ok(Json(GroupMember::from(&user)))
}

/// POST /api/groups/{id}/add-guest
///
/// Creates a guest account (no usable password, synthetic email) and adds it
/// to the group.
pub async fn add_guest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddGuestRequest>,
) -> AppResult<(StatusCode, Json<GroupMember>)> {
    require_group_member(&state, id, auth.user_id).await?;
    let display_name = require_name(input.display_name.as_deref(), "Display name")?;

    let create = CreateUser {
        email: guest_email(),
        password_hash: UNUSABLE_PASSWORD_HASH.to_string(),
        name: Some(display_name),
        role_id: ROLE_GUEST_ID,
    };
    let guest = UserRepo::create(&state.pool, &create).await?;
    GroupRepo::add_member(&state.pool, id, guest.id).await?;

    tracing::info!(group_id = id, guest_id = guest.id, "Guest added to group");
    Ok((StatusCode::CREATED, Json(GroupMember::from(&guest))))
}

/// DELETE /api/groups/{group_id}/members/{user_id}
pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((group_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let group = GroupRepo::find_by_id(&state.pool, group_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Group",
            id: group_id,
        }))?;

    if !can_remove_member(group.created_by_id, auth.user_id, user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the group creator can remove other members".into(),
        )));
    }

    if GroupRepo::remove_member(&state.pool, group_id, user_id).await? {
        tracing::info!(group_id, member_id = user_id, "Member removed from group");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Group member",
            id: user_id,
        }))
    }
}

/// GET /api/groups/{group_id}/search-members?query=
pub async fn search_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<GroupMember>>> {
    require_group_member(&state, group_id, auth.user_id).await?;

    let Some(needle) = normalize_search_query(params.query.as_deref()) else {
        return Ok(Json(Vec::new()));
    };
    let members = GroupRepo::search_members(&state.pool, group_id, &needle).await?;
    Ok(Json(members))
}
