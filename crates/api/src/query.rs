//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Free-text search parameter (`?query=`).
///
/// A missing or blank query yields an empty result rather than an error.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}
