//! Repository for the `matches` and `match_players` tables.

use pickleball_core::types::DbId;
use sqlx::PgPool;

use crate::models::game::{CreateMatch, Match, MatchPlayer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, group_id, match_type_id, score, match_date, created_at, updated_at";

/// Provides CRUD operations for matches.
pub struct MatchRepo;

impl MatchRepo {
    /// Insert a match and both teams in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateMatch) -> Result<Match, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO matches (group_id, match_type_id, score)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Match>(&query)
            .bind(input.group_id)
            .bind(input.match_type.id())
            .bind(&input.score)
            .fetch_one(&mut *tx)
            .await?;

        let teams = [(1_i16, &input.team_one), (2_i16, &input.team_two)];
        for (team, players) in teams {
            for &user_id in players.iter() {
                sqlx::query(
                    "INSERT INTO match_players (match_id, user_id, team) VALUES ($1, $2, $3)",
                )
                .bind(created.id)
                .bind(user_id)
                .bind(team)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Find a match by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Match>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM matches WHERE id = $1");
        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Matches of a group, most recent first.
    pub async fn list_by_group(pool: &PgPool, group_id: DbId) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matches WHERE group_id = $1 ORDER BY match_date DESC, id DESC"
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// Player slots for the given matches, ordered by team then user.
    pub async fn list_players(
        pool: &PgPool,
        match_ids: &[DbId],
    ) -> Result<Vec<MatchPlayer>, sqlx::Error> {
        sqlx::query_as::<_, MatchPlayer>(
            "SELECT mp.match_id, mp.team, mp.user_id, u.email, u.name
             FROM match_players mp
             JOIN users u ON u.id = mp.user_id
             WHERE mp.match_id = ANY($1)
             ORDER BY mp.match_id, mp.team, mp.user_id",
        )
        .bind(match_ids)
        .fetch_all(pool)
        .await
    }

    /// Replace the score text. Returns `None` if no row with `id` exists.
    pub async fn update_score(
        pool: &PgPool,
        id: DbId,
        score: Option<&str>,
    ) -> Result<Option<Match>, sqlx::Error> {
        let query = format!("UPDATE matches SET score = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .bind(score)
            .fetch_optional(pool)
            .await
    }
}
