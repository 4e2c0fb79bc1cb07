//! Repository for the `groups` and `group_members` tables.

use pickleball_core::roles::ROLE_GUEST_ID;
use pickleball_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::Group;
use crate::models::user::GroupMember;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_by_id, created_at, updated_at";

/// Member projection over `users u`.
fn member_columns() -> String {
    format!("u.id, u.email, u.name, u.photo_url, (u.role_id = {ROLE_GUEST_ID}) AS is_guest")
}

/// Provides CRUD operations for groups and their membership.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a group and enrol its creator as the first member.
    pub async fn create(pool: &PgPool, name: &str, creator_id: DbId) -> Result<Group, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO groups (name, created_by_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let group = sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .bind(creator_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
            .bind(group.id)
            .bind(creator_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Find a group by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Groups the user belongs to, ordered by name.
    pub async fn list_for_member(pool: &PgPool, user_id: DbId) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM groups
             WHERE id IN (SELECT group_id FROM group_members WHERE user_id = $1)
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a group (members, sessions and matches cascade).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a member. Adding an existing member is a no-op.
    pub async fn add_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a member. Returns `true` if the membership existed.
    pub async fn remove_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `user_id` is a member of `group_id`.
    pub async fn is_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM group_members WHERE group_id = $1 AND user_id = $2)",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// IDs of every member of the group.
    pub async fn member_ids(pool: &PgPool, group_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM group_members WHERE group_id = $1")
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// Members of the group ordered case-insensitively by email.
    pub async fn list_members(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<GroupMember>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM group_members gm
             JOIN users u ON u.id = gm.user_id
             WHERE gm.group_id = $1
             ORDER BY LOWER(u.email) ASC",
            member_columns()
        );
        sqlx::query_as::<_, GroupMember>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// Members whose name or email contains `needle`, ignoring case.
    pub async fn search_members(
        pool: &PgPool,
        group_id: DbId,
        needle: &str,
    ) -> Result<Vec<GroupMember>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM group_members gm
             JOIN users u ON u.id = gm.user_id
             WHERE gm.group_id = $1
               AND (strpos(LOWER(COALESCE(u.name, '')), LOWER($2)) > 0
                    OR strpos(LOWER(u.email), LOWER($2)) > 0)
             ORDER BY LOWER(COALESCE(u.name, u.email)) ASC",
            member_columns()
        );
        sqlx::query_as::<_, GroupMember>(&query)
            .bind(group_id)
            .bind(needle)
            .fetch_all(pool)
            .await
    }
}
