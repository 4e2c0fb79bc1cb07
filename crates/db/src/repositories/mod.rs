//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod group_repo;
pub mod match_repo;
pub mod participant_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use group_repo::GroupRepo;
pub use match_repo::MatchRepo;
pub use participant_repo::ParticipantRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;

/// Whether `err` is a unique-constraint violation (SQLSTATE 23505) on `constraint`.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
