//! Route definitions for the `/sessions` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// POST /                       -> create (auth)
/// GET  /my                     -> my_sessions (auth)
/// GET  /by-group/{group_id}    -> by_group (auth, member)
/// GET  /{code}                 -> get_by_code
/// GET  /{code}/participants    -> participants
/// POST /{code}/join            -> join
/// PUT  /{code}/close           -> close (auth, session or group creator)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(session::create))
        .route("/my", get(session::my_sessions))
        .route("/by-group/{group_id}", get(session::by_group))
        .route("/{code}", get(session::get_by_code))
        .route("/{code}/participants", get(session::participants))
        .route("/{code}/join", post(session::join))
        .route("/{code}/close", put(session::close))
}
