//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pickleball_core::error::CoreError;
use pickleball_core::groups::{normalize_email, trim_optional};
use pickleball_core::roles::ROLE_USER_ID;
use pickleball_core::types::DbId;
use pickleball_db::models::user::CreateUser;
use pickleball_db::repositories::{is_unique_violation, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: DbId,
    pub token: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let email = normalize_email(&input.email);
    if email.is_empty() {
        return Err(AppError::Core(CoreError::Validation("Email is required".into())));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::exists_by_email(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        email,
        password_hash,
        name: trim_optional(input.name.as_deref()),
        role_id: ROLE_USER_ID,
    };

    // A concurrent registration can still win the race past the existence check.
    let user = match UserRepo::create(&state.pool, &create).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e, "uq_users_email") => {
            return Err(AppError::Core(CoreError::Conflict(
                "Email is already registered".into(),
            )));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

/// POST /api/auth/login
///
/// Authenticate with email + password and return a bearer token. Guest
/// accounts have no usable password and are always rejected.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if user.is_guest() {
        return Err(invalid_credentials());
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected, wrong password");
        return Err(invalid_credentials());
    }

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let token = generate_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        id: user.id,
        token,
        email: user.email,
        name: user.name,
        photo_url: user.photo_url,
        role,
    }))
}
