//! Route definitions for the `/groups` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::group;
use crate::state::AppState;

/// Routes mounted at `/groups`. All require auth.
///
/// ```text
/// POST   /                                 -> create
/// GET    /my                               -> my_groups
/// DELETE /{id}                             -> delete (creator only)
/// GET    /{id}/members                     -> members
/// POST   /{id}/add-member                  -> add_member
/// POST   /{id}/add-guest                   -> add_guest
/// DELETE /{id}/members/{user_id}           -> remove_member
/// GET    /{id}/search-members?query=       -> search_members
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(group::create))
        .route("/my", get(group::my_groups))
        .route("/{id}", delete(group::delete))
        .route("/{id}/members", get(group::members))
        .route("/{id}/add-member", post(group::add_member))
        .route("/{id}/add-guest", post(group::add_guest))
        .route("/{id}/members/{user_id}", delete(group::remove_member))
        .route("/{id}/search-members", get(group::search_members))
}
