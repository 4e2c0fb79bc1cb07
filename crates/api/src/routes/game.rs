//! Route definitions for the `/matches` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::game;
use crate::state::AppState;

/// Routes mounted at `/matches`. All require auth.
///
/// ```text
/// POST /                     -> create
/// GET  /by-group/{group_id}  -> by_group
/// PUT  /{id}/score           -> update_score
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(game::create))
        .route("/by-group/{group_id}", get(game::by_group))
        .route("/{id}/score", put(game::update_score))
}
