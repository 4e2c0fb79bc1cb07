//! Match (game) model and DTOs.
//!
//! The module is named `game` because `match` is a keyword.

use pickleball_core::status::{MatchType, StatusId};
use pickleball_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `matches` table.
#[derive(Debug, Clone, FromRow)]
pub struct Match {
    pub id: DbId,
    pub group_id: DbId,
    pub match_type_id: StatusId,
    pub score: Option<String>,
    pub match_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Match {
    pub fn match_type(&self) -> Option<MatchType> {
        MatchType::from_id(self.match_type_id)
    }
}

/// DTO for inserting a match together with its two teams.
#[derive(Debug)]
pub struct CreateMatch {
    pub group_id: DbId,
    pub match_type: MatchType,
    pub team_one: Vec<DbId>,
    pub team_two: Vec<DbId>,
    pub score: Option<String>,
}

/// One player slot of a match, joined with the player's user row.
#[derive(Debug, Clone, FromRow)]
pub struct MatchPlayer {
    pub match_id: DbId,
    pub team: i16,
    pub user_id: DbId,
    pub email: String,
    pub name: Option<String>,
}
