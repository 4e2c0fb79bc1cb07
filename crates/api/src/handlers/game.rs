//! Handlers for the `/matches` resource.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pickleball_core::error::CoreError;
use pickleball_core::groups::trim_optional;
use pickleball_core::matches::{format_score, validate_teams};
use pickleball_core::status::MatchType;
use pickleball_core::types::{DbId, Timestamp};
use pickleball_db::models::game::{CreateMatch, Match, MatchPlayer};
use pickleball_db::repositories::{GroupRepo, MatchRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::group::require_group_member;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /matches`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub group_id: DbId,
    pub match_type: MatchType,
    pub team_one_user_ids: Vec<DbId>,
    pub team_two_user_ids: Vec<DbId>,
    pub team_one_score: Option<i32>,
    pub team_two_score: Option<i32>,
}

/// Request body for `PUT /matches/{id}/score`.
#[derive(Debug, Deserialize)]
pub struct UpdateScoreRequest {
    pub score: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayerResponse {
    pub user_id: DbId,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: DbId,
    pub group_id: DbId,
    pub match_type: Option<MatchType>,
    pub score: Option<String>,
    pub match_date: Timestamp,
    pub team_one: Vec<MatchPlayerResponse>,
    pub team_two: Vec<MatchPlayerResponse>,
}

impl MatchResponse {
    /// Assemble a response from a match and any slice of player rows; rows
    /// belonging to other matches are ignored.
    fn assemble(m: Match, players: &[MatchPlayer]) -> Self {
        let team = |n: i16| -> Vec<MatchPlayerResponse> {
            players
                .iter()
                .filter(|p| p.match_id == m.id && p.team == n)
                .map(|p| MatchPlayerResponse {
                    user_id: p.user_id,
                    email: p.email.clone(),
                    name: p.name.clone(),
                })
                .collect()
        };
        Self {
            team_one: team(1),
            team_two: team(2),
            match_type: m.match_type(),
            id: m.id,
            group_id: m.group_id,
            score: m.score,
            match_date: m.match_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/matches
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMatchRequest>,
) -> AppResult<(StatusCode, Json<MatchResponse>)> {
    require_group_member(&state, input.group_id, auth.user_id).await?;

    let members: HashSet<DbId> = GroupRepo::member_ids(&state.pool, input.group_id)
        .await?
        .into_iter()
        .collect();
    validate_teams(
        input.match_type,
        &input.team_one_user_ids,
        &input.team_two_user_ids,
        &members,
    )?;
    let score = format_score(input.team_one_score, input.team_two_score)?;

    let create = CreateMatch {
        group_id: input.group_id,
        match_type: input.match_type,
        team_one: input.team_one_user_ids,
        team_two: input.team_two_user_ids,
        score,
    };
    let created = MatchRepo::create(&state.pool, &create).await?;
    let players = MatchRepo::list_players(&state.pool, &[created.id]).await?;

    tracing::info!(match_id = created.id, group_id = created.group_id, "Match recorded");
    Ok((StatusCode::CREATED, Json(MatchResponse::assemble(created, &players))))
}

/// GET /api/matches/by-group/{group_id}
pub async fn by_group(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<Vec<MatchResponse>>> {
    require_group_member(&state, group_id, auth.user_id).await?;

    let matches = MatchRepo::list_by_group(&state.pool, group_id).await?;
    let ids: Vec<DbId> = matches.iter().map(|m| m.id).collect();
    let players = MatchRepo::list_players(&state.pool, &ids).await?;

    Ok(Json(
        matches
            .into_iter()
            .map(|m| MatchResponse::assemble(m, &players))
            .collect(),
    ))
}

/// PUT /api/matches/{id}/score
pub async fn update_score(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScoreRequest>,
) -> AppResult<Json<MatchResponse>> {
    let existing = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Match", id }))?;
    require_group_member(&state, existing.group_id, auth.user_id).await?;

    let score = trim_optional(input.score.as_deref());
    let updated = MatchRepo::update_score(&state.pool, id, score.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Match", id }))?;
    let players = MatchRepo::list_players(&state.pool, &[id]).await?;

    Ok(Json(MatchResponse::assemble(updated, &players)))
}
