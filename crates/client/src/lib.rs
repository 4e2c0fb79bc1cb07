//! Client side of Pickleball Planner: a typed HTTP client for the API, the
//! join-by-code flow, explicit auth state and a debounced member search.

pub mod api;
pub mod auth;
pub mod debounce;
pub mod error;
pub mod flow;
pub mod models;
