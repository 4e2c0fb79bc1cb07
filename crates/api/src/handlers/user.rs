//! Handlers for the signed-in user's own profile.

use axum::extract::State;
use axum::Json;
use pickleball_core::error::CoreError;
use pickleball_core::groups::trim_optional;
use pickleball_core::types::DbId;
use pickleball_db::models::user::{UpdateProfile, User};
use pickleball_db::repositories::{RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::MessageResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Public profile of the signed-in user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
}

/// Request body for `PUT /user/profile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// Request body for `PUT /user/password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

async fn to_profile(state: &AppState, user: User) -> AppResult<ProfileResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(ProfileResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        photo_url: user.photo_url,
        role,
    })
}

/// GET /api/user/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileResponse>> {
    let user = load_user(&state, auth.user_id).await?;
    Ok(Json(to_profile(&state, user).await?))
}

/// PUT /api/user/profile
///
/// Both fields are replaced; blank values clear them.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let update = UpdateProfile {
        name: trim_optional(input.name.as_deref()),
        photo_url: trim_optional(input.photo_url.as_deref()),
    };
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(to_profile(&state, user).await?))
}

/// PUT /api/user/password
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = load_user(&state, auth.user_id).await?;

    let current_ok = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".into(),
    }))
}
