//! User entity model and DTOs.

use pickleball_core::roles::ROLE_GUEST_ID;
use pickleball_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_guest(&self) -> bool {
        self.role_id == ROLE_GUEST_ID
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role_id: DbId,
}

/// Replacement profile fields. `None` clears the column.
#[derive(Debug)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// A user as seen from a group's member list.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub is_guest: bool,
}

impl From<&User> for GroupMember {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            photo_url: user.photo_url.clone(),
            is_guest: user.is_guest(),
        }
    }
}
