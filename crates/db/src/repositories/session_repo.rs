//! Repository for the `sessions` table.

use pickleball_core::status::SessionStatus;
use pickleball_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, Session, SessionDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, group_id, created_by_id, status_id, closed_at, \
                        created_at, updated_at";

/// Projection + joins for [`SessionDetail`] reads.
const DETAIL_SELECT: &str = "SELECT s.id, s.code, s.name, s.group_id, g.name AS group_name, \
        s.status_id, s.created_at, \
        (SELECT COUNT(*) FROM session_participants p WHERE p.session_id = s.id) \
            AS participant_count \
     FROM sessions s LEFT JOIN groups g ON g.id = s.group_id";

/// Provides lifecycle operations for live sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new active session, returning the created row.
    ///
    /// A code collision surfaces as a unique violation on `uq_sessions_code`.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (code, name, group_id, created_by_id, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.group_id)
            .bind(input.created_by_id)
            .bind(SessionStatus::Active.id())
            .fetch_one(pool)
            .await
    }

    /// Find a session by its (already normalized) code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE code = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Whether any session, active or closed, holds `code`.
    pub async fn exists_by_code(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM sessions WHERE code = $1)")
                .bind(code)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Session detail (group name, participant count) by code.
    pub async fn find_detail_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<SessionDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE s.code = $1");
        sqlx::query_as::<_, SessionDetail>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Sessions created by a user, newest first.
    pub async fn list_details_by_creator(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SessionDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE s.created_by_id = $1 ORDER BY s.created_at DESC, s.id DESC"
        );
        sqlx::query_as::<_, SessionDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Sessions of a group, newest first.
    pub async fn list_details_by_group(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<SessionDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE s.group_id = $1 ORDER BY s.created_at DESC, s.id DESC"
        );
        sqlx::query_as::<_, SessionDetail>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// Transition an active session to closed.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// session was already closed (or does not exist).
    pub async fn close(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET status_id = $2, closed_at = NOW()
             WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(SessionStatus::Closed.id())
        .bind(SessionStatus::Active.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
