pub mod auth;
pub mod game;
pub mod group;
pub mod session;
pub mod user;
