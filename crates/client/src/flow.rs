//! Join-by-code flow: look a session up, show its roster, add a name.
//!
//! [`JoinFlow`] owns the flow state. Every lookup is tagged with a
//! generation; a response for anything but the newest lookup is discarded,
//! so the last request always wins.

use pickleball_core::session::ensure_joinable;
use pickleball_core::session_code::normalize_code_input;
use pickleball_core::status::SessionStatus;

use crate::api::SessionApi;
use crate::error::ClientError;
use crate::models::{Participant, Session};

pub const MSG_NOT_FOUND: &str = "Session not found. Check the code and try again.";
pub const MSG_LOOKUP_FAILED: &str = "Could not load session.";
pub const MSG_CLOSED_BY_ORGANISER: &str = "This session has been closed by the organiser.";
pub const MSG_NAME_REQUIRED: &str = "Enter your name first.";
pub const MSG_JOIN_CLOSED: &str = "This session has been closed.";
pub const MSG_JOIN_FAILED: &str = "Could not join. Try again.";

/// Why a lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    NotFound,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinState {
    /// Nothing looked up yet.
    Idle,
    /// The last lookup failed.
    LookupFailed(LookupFailure),
    /// A session is loaded. `join_error` holds the last join failure.
    Found {
        session: Session,
        roster: Vec<Participant>,
        join_error: Option<&'static str>,
    },
    /// Terminal: the user is on the roster.
    Joined {
        session: Session,
        participant: Participant,
        roster: Vec<Participant>,
    },
}

/// A lookup that has been started but not applied yet.
#[derive(Debug)]
pub struct LookupTicket {
    generation: u64,
    code: String,
}

impl LookupTicket {
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Result of a lookup request: the session plus its roster.
pub type LookupOutcome = Result<(Session, Vec<Participant>), ClientError>;

pub struct JoinFlow<A: SessionApi> {
    api: A,
    code: String,
    generation: u64,
    state: JoinState,
}

impl<A: SessionApi> JoinFlow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            code: String::new(),
            generation: 0,
            state: JoinState::Idle,
        }
    }

    /// Start a flow from a `/join/{code}` style path, looking the code up
    /// right away when the path carries one.
    pub async fn from_url_path(api: A, path: &str) -> Self {
        let mut flow = Self::new(api);
        if let Some(code) = code_from_path(path) {
            flow.lookup(code).await;
        }
        flow
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &JoinState {
        &self.state
    }

    /// The normalized code of the latest lookup.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            JoinState::Found { session, .. } | JoinState::Joined { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn roster(&self) -> &[Participant] {
        match &self.state {
            JoinState::Found { roster, .. } | JoinState::Joined { roster, .. } => roster,
            _ => &[],
        }
    }

    /// Whether the name form should be offered.
    pub fn can_join(&self) -> bool {
        matches!(&self.state, JoinState::Found { session, .. } if session.is_active())
    }

    /// User-facing message for the current state, if any.
    pub fn message(&self) -> Option<&'static str> {
        match &self.state {
            JoinState::LookupFailed(LookupFailure::NotFound) => Some(MSG_NOT_FOUND),
            JoinState::LookupFailed(LookupFailure::Other) => Some(MSG_LOOKUP_FAILED),
            JoinState::Found { join_error: Some(msg), .. } => Some(*msg),
            JoinState::Found { session, .. } if !session.is_active() => {
                Some(MSG_CLOSED_BY_ORGANISER)
            }
            _ => None,
        }
    }

    /// Look up `input` and replace the current state with the result.
    pub async fn lookup(&mut self, input: &str) {
        let Some(ticket) = self.begin_lookup(input) else {
            return;
        };
        let outcome = fetch_session(&self.api, ticket.code()).await;
        self.apply_lookup(ticket, outcome);
    }

    /// Register a new lookup, invalidating every earlier ticket.
    ///
    /// Returns `None` (no request to make) for empty input or once joined.
    pub fn begin_lookup(&mut self, input: &str) -> Option<LookupTicket> {
        if matches!(self.state, JoinState::Joined { .. }) {
            return None;
        }
        let code = normalize_code_input(input);
        if code.is_empty() {
            return None;
        }
        self.generation += 1;
        self.code.clone_from(&code);
        Some(LookupTicket {
            generation: self.generation,
            code,
        })
    }

    /// Apply a lookup result. Returns `false` if the ticket is stale and the
    /// result was dropped.
    pub fn apply_lookup(&mut self, ticket: LookupTicket, outcome: LookupOutcome) -> bool {
        if ticket.generation != self.generation || matches!(self.state, JoinState::Joined { .. }) {
            tracing::debug!(code = %ticket.code, "Discarding stale lookup response");
            return false;
        }
        self.state = match outcome {
            Ok((session, roster)) => JoinState::Found {
                session,
                roster,
                join_error: None,
            },
            Err(ClientError::NotFound) => JoinState::LookupFailed(LookupFailure::NotFound),
            Err(err) => {
                tracing::warn!(code = %ticket.code, error = %err, "Session lookup failed");
                JoinState::LookupFailed(LookupFailure::Other)
            }
        };
        true
    }

    /// Submit `name` for the loaded session.
    ///
    /// Does nothing unless a session is loaded. A blank name or a session
    /// already known to be closed is rejected without a request.
    pub async fn join(&mut self, name: &str) {
        let JoinState::Found {
            session,
            roster,
            join_error,
        } = &mut self.state
        else {
            return;
        };

        let name = name.trim();
        if name.is_empty() {
            *join_error = Some(MSG_NAME_REQUIRED);
            return;
        }
        if ensure_joinable(session.status, &session.code).is_err() {
            return;
        }

        match self.api.join_session(&session.code, name).await {
            Ok(participant) => {
                let roster = match self.api.list_participants(&session.code).await {
                    Ok(fresh) => fresh,
                    Err(err) => {
                        tracing::debug!(error = %err, "Roster refresh failed after join");
                        let mut stale = std::mem::take(roster);
                        stale.push(participant.clone());
                        stale
                    }
                };
                self.state = JoinState::Joined {
                    session: session.clone(),
                    participant,
                    roster,
                };
            }
            Err(ClientError::SessionClosed) => {
                session.status = SessionStatus::Closed;
                *join_error = Some(MSG_JOIN_CLOSED);
            }
            Err(err) => {
                tracing::warn!(code = %session.code, error = %err, "Join failed");
                *join_error = Some(MSG_JOIN_FAILED);
            }
        }
    }
}

/// Fetch a session and its roster concurrently. Roster failures yield an
/// empty roster.
pub async fn fetch_session<A: SessionApi>(api: &A, code: &str) -> LookupOutcome {
    let (session, roster) = tokio::join!(api.lookup_session(code), api.list_participants(code));
    let session = session?;
    let roster = roster.unwrap_or_else(|err| {
        tracing::debug!(code, error = %err, "Roster fetch failed");
        Vec::new()
    });
    Ok((session, roster))
}

/// Last non-empty segment of a `/join/{code}` path.
pub fn code_from_path(path: &str) -> Option<&str> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .filter(|s| !s.eq_ignore_ascii_case("join"))
}
