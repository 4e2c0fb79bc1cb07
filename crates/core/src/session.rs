//! Live session lifecycle and roster rules.
//!
//! A session starts `ACTIVE` and may be closed exactly once; closing again is
//! a no-op. Participants are name-only records appended while the session is
//! active.

use crate::error::CoreError;
use crate::status::SessionStatus;
use crate::types::DbId;

/// Longest display name accepted for a participant.
pub const MAX_DISPLAY_NAME_LEN: usize = 100;

/// Participant type label reported by the roster API.
pub const PARTICIPANT_TYPE_GUEST: &str = "GUEST";

/// Result of asking a session to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTransition {
    /// The session was active and must be persisted as closed.
    Close,
    /// The session was already closed; nothing to write.
    AlreadyClosed,
}

/// Decide what closing a session in `status` means.
pub fn close_transition(status: SessionStatus) -> CloseTransition {
    match status {
        SessionStatus::Active => CloseTransition::Close,
        SessionStatus::Closed => CloseTransition::AlreadyClosed,
    }
}

/// Reject joins on a closed session.
pub fn ensure_joinable(status: SessionStatus, code: &str) -> Result<(), CoreError> {
    match status {
        SessionStatus::Active => Ok(()),
        SessionStatus::Closed => Err(CoreError::SessionClosed(code.to_string())),
    }
}

/// Validate a participant name, returning it trimmed.
pub fn validate_display_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Player name is required".into()));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Player name must be at most {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Pick the session's display name: the requested one when non-blank,
/// otherwise the owning group's name.
pub fn resolve_session_name(requested: Option<&str>, group_name: &str) -> String {
    requested
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(group_name)
        .to_string()
}

/// Whether `requester` may close a session.
///
/// The session creator and the creator of the owning group both can.
pub fn can_close(
    requester: DbId,
    session_creator: Option<DbId>,
    group_creator: Option<DbId>,
) -> bool {
    session_creator == Some(requester) || group_creator == Some(requester)
}
