//! Group and member rules.

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

/// Domain used for the synthetic email of guest accounts.
pub const GUEST_EMAIL_DOMAIN: &str = "pickleball.local";

/// Canonical email form: trimmed and lowercased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Synthetic, never-deliverable email for a guest member.
pub fn guest_email() -> String {
    format!("guest_{}@{GUEST_EMAIL_DOMAIN}", Uuid::new_v4().simple())
}

/// Validate a required name-like field, returning it trimmed.
pub fn require_name(raw: Option<&str>, field: &str) -> Result<String, CoreError> {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

/// Trim an optional free-text field; blank becomes `None`.
pub fn trim_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Only the group creator may delete a group.
pub fn can_delete_group(group_creator: Option<DbId>, requester: DbId) -> bool {
    group_creator == Some(requester)
}

/// The group creator may remove anyone; members may remove themselves.
pub fn can_remove_member(group_creator: Option<DbId>, requester: DbId, target: DbId) -> bool {
    group_creator == Some(requester) || requester == target
}

/// Member search query: trimmed, `None` when blank.
pub fn normalize_search_query(raw: Option<&str>) -> Option<String> {
    trim_optional(raw)
}
