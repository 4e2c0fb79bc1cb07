pub mod auth;
pub mod game;
pub mod group;
pub mod health;
pub mod session;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /user/profile                          get, update
/// /user/password                         change password
///
/// /groups                                create
/// /groups/my                             groups of the caller
/// /groups/{id}                           delete
/// /groups/{id}/members                   list members
/// /groups/{id}/add-member                add registered user
/// /groups/{id}/add-guest                 add guest account
/// /groups/{id}/members/{user_id}         remove member
/// /groups/{id}/search-members            member search
///
/// /sessions                              create
/// /sessions/my                           sessions of the caller
/// /sessions/by-group/{group_id}          sessions of a group
/// /sessions/{code}                       lookup (public)
/// /sessions/{code}/participants          roster (public)
/// /sessions/{code}/join                  join (public)
/// /sessions/{code}/close                 close
///
/// /matches                               record a match
/// /matches/by-group/{group_id}           matches of a group
/// /matches/{id}/score                    update score
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/groups", group::router())
        .nest("/sessions", session::router())
        .nest("/matches", game::router())
}
