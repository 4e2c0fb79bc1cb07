//! Repository for the `session_participants` table.

use pickleball_core::status::{SessionStatus, StatusId};
use pickleball_core::types::DbId;
use sqlx::PgPool;

use crate::models::participant::{JoinOutcome, Participant};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, display_name, joined_at";

/// Provides append-only roster operations.
pub struct ParticipantRepo;

impl ParticipantRepo {
    /// Append a participant to the session identified by `code`.
    ///
    /// The session row is locked (`FOR UPDATE`) for the duration of the
    /// transaction, so a concurrent close either happens before the status
    /// check or after the insert commits.
    pub async fn join(
        pool: &PgPool,
        code: &str,
        display_name: &str,
    ) -> Result<JoinOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId, StatusId)> =
            sqlx::query_as("SELECT id, status_id FROM sessions WHERE code = $1 FOR UPDATE")
                .bind(code)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((session_id, status_id)) = row else {
            return Ok(JoinOutcome::SessionNotFound);
        };
        if SessionStatus::from_id(status_id) != Some(SessionStatus::Active) {
            tracing::debug!(code, session_id, "Join rejected, session is closed");
            return Ok(JoinOutcome::SessionClosed);
        }

        let query = format!(
            "INSERT INTO session_participants (session_id, display_name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let participant = sqlx::query_as::<_, Participant>(&query)
            .bind(session_id)
            .bind(display_name)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(JoinOutcome::Joined(participant))
    }

    /// All participants of a session in join order.
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_participants WHERE session_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
