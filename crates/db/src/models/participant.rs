//! Session participant model.

use pickleball_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `session_participants` table. Rows are append-only.
#[derive(Debug, Clone, FromRow)]
pub struct Participant {
    pub id: DbId,
    pub session_id: DbId,
    pub display_name: String,
    pub joined_at: Timestamp,
}

/// Outcome of a join attempt, decided under a row lock on the session.
#[derive(Debug)]
pub enum JoinOutcome {
    Joined(Participant),
    SessionNotFound,
    SessionClosed,
}
