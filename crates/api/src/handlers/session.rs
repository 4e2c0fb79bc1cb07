//! Handlers for live sessions: creation, code lookup, roster, join, close.
//!
//! Lookup, roster and join are public so that guests without an account can
//! join by code. Every code from a path is normalized before it reaches the
//! database, so lookups are case-insensitive.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pickleball_core::error::CoreError;
use pickleball_core::session::{
    can_close, close_transition, resolve_session_name, validate_display_name, CloseTransition,
    PARTICIPANT_TYPE_GUEST,
};
use pickleball_core::session_code::{normalize_code, with_unique_code};
use pickleball_core::status::SessionStatus;
use pickleball_core::types::{DbId, Timestamp};
use pickleball_db::models::participant::{JoinOutcome, Participant};
use pickleball_db::models::session::{CreateSession, Session, SessionDetail};
use pickleball_db::repositories::{is_unique_violation, GroupRepo, ParticipantRepo, SessionRepo};
use pickleball_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::group::require_group_member;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /sessions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub name: Option<String>,
    pub group_id: DbId,
}

/// Request body for `POST /sessions/{code}/join`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionRequest {
    pub player_name: String,
}

/// Session as returned by every session endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub group_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub participant_count: i64,
}

impl From<SessionDetail> for SessionResponse {
    fn from(detail: SessionDetail) -> Self {
        Self {
            status: detail.status(),
            id: detail.id,
            code: detail.code,
            name: detail.name,
            group_id: detail.group_id,
            group_name: detail.group_name,
            created_at: detail.created_at,
            participant_count: detail.participant_count,
        }
    }
}

/// Roster entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: DbId,
    pub display_name: String,
    #[serde(rename = "type")]
    pub participant_type: &'static str,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name,
            participant_type: PARTICIPANT_TYPE_GUEST,
        }
    }
}

fn session_not_found(code: String) -> AppError {
    AppError::Core(CoreError::CodeNotFound {
        entity: "Session",
        code,
    })
}

async fn load_detail(state: &AppState, code: &str) -> AppResult<SessionDetail> {
    SessionRepo::find_detail_by_code(&state.pool, code)
        .await?
        .ok_or_else(|| session_not_found(code.to_string()))
}

/// Insert a session unless its code is taken. `Ok(None)` means retry with a
/// new code.
async fn try_insert_session(pool: &DbPool, create: CreateSession) -> AppResult<Option<Session>> {
    if SessionRepo::exists_by_code(pool, &create.code).await? {
        tracing::debug!(code = %create.code, "Session code taken, retrying");
        return Ok(None);
    }
    match SessionRepo::create(pool, &create).await {
        Ok(session) => Ok(Some(session)),
        Err(e) if is_unique_violation(&e, "uq_sessions_code") => {
            tracing::warn!(code = %create.code, "Session code raced on insert, retrying");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/sessions
///
/// Creates an active session for a group the caller belongs to. A blank name
/// falls back to the group name.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let group = require_group_member(&state, input.group_id, auth.user_id).await?;
    let name = resolve_session_name(input.name.as_deref(), &group.name);
    let pool = &state.pool;

    let session = with_unique_code(|code| {
        let create = CreateSession {
            code,
            name: name.clone(),
            group_id: group.id,
            created_by_id: auth.user_id,
        };
        try_insert_session(pool, create)
    })
    .await?;

    tracing::info!(
        session_id = session.id,
        code = %session.code,
        group_id = group.id,
        user_id = auth.user_id,
        "Session created",
    );

    let response = SessionResponse {
        status: session.status(),
        id: session.id,
        code: session.code,
        name: session.name,
        group_id: session.group_id,
        group_name: Some(group.name),
        created_at: session.created_at,
        participant_count: 0,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/sessions/{code}
///
/// Closed sessions remain visible; only an unknown code is a 404.
pub async fn get_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<SessionResponse>> {
    let code = normalize_code(&code);
    let detail = load_detail(&state, &code).await?;
    Ok(Json(detail.into()))
}

/// GET /api/sessions/{code}/participants
pub async fn participants(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Vec<ParticipantResponse>>> {
    let code = normalize_code(&code);
    let session = SessionRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| session_not_found(code))?;

    let roster = ParticipantRepo::list_by_session(&state.pool, session.id).await?;
    Ok(Json(roster.into_iter().map(Into::into).collect()))
}

/// POST /api/sessions/{code}/join
///
/// Appends a name to the roster. 410 once the session is closed.
pub async fn join(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<JoinSessionRequest>,
) -> AppResult<(StatusCode, Json<ParticipantResponse>)> {
    let code = normalize_code(&code);
    let display_name = validate_display_name(&input.player_name)?;

    match ParticipantRepo::join(&state.pool, &code, &display_name).await? {
        JoinOutcome::Joined(participant) => {
            tracing::info!(
                code = %code,
                participant_id = participant.id,
                "Participant joined session",
            );
            Ok((StatusCode::CREATED, Json(participant.into())))
        }
        JoinOutcome::SessionNotFound => Err(session_not_found(code)),
        JoinOutcome::SessionClosed => Err(AppError::Core(CoreError::SessionClosed(code))),
    }
}

/// PUT /api/sessions/{code}/close
///
/// Allowed for the session creator and the group creator. Closing an
/// already closed session succeeds without writing.
pub async fn close(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<SessionResponse>> {
    let code = normalize_code(&code);
    let session = SessionRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| session_not_found(code.clone()))?;

    let group_creator = GroupRepo::find_by_id(&state.pool, session.group_id)
        .await?
        .and_then(|g| g.created_by_id);
    if !can_close(auth.user_id, session.created_by_id, group_creator) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the session or group creator can close this session".into(),
        )));
    }

    match close_transition(session.status()) {
        CloseTransition::Close => {
            let closed = SessionRepo::close(&state.pool, session.id).await?;
            tracing::info!(code = %code, user_id = auth.user_id, closed, "Session closed");
        }
        CloseTransition::AlreadyClosed => {
            tracing::debug!(code = %code, "Session already closed");
        }
    }

    let detail = load_detail(&state, &code).await?;
    Ok(Json(detail.into()))
}

/// GET /api/sessions/my
pub async fn my_sessions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SessionResponse>>> {
    let sessions = SessionRepo::list_details_by_creator(&state.pool, auth.user_id).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// GET /api/sessions/by-group/{group_id}
pub async fn by_group(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<Vec<SessionResponse>>> {
    require_group_member(&state, group_id, auth.user_id).await?;
    let sessions = SessionRepo::list_details_by_group(&state.pool, group_id).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}
