//! Live session model and DTOs.

use pickleball_core::status::{SessionStatus, StatusId};
use pickleball_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub group_id: DbId,
    pub created_by_id: Option<DbId>,
    pub status_id: StatusId,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Session {
    /// Decoded status. Unknown IDs read as closed so they never accept joins.
    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_id(self.status_id).unwrap_or(SessionStatus::Closed)
    }
}

/// DTO for inserting a new session. Status always starts active.
#[derive(Debug)]
pub struct CreateSession {
    pub code: String,
    pub name: String,
    pub group_id: DbId,
    pub created_by_id: DbId,
}

/// A session joined with its group name and roster size.
#[derive(Debug, Clone, FromRow)]
pub struct SessionDetail {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub group_id: DbId,
    pub group_name: Option<String>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub participant_count: i64,
}

impl SessionDetail {
    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_id(self.status_id).unwrap_or(SessionStatus::Closed)
    }
}
