//! Wire types returned by the API.

use chrono::{DateTime, Utc};
use pickleball_core::status::SessionStatus;
use serde::Deserialize;

pub type Id = i64;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub group_id: Id,
    #[serde(default)]
    pub group_name: Option<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub participant_count: i64,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Id,
    pub display_name: String,
    #[serde(rename = "type")]
    pub participant_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: Id,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub is_guest: bool,
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: Id,
    pub token: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
