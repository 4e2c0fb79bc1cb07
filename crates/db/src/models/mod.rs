//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Input DTOs for inserts and updates
//! - Joined read models where an endpoint needs more than one table

pub mod game;
pub mod group;
pub mod participant;
pub mod role;
pub mod session;
pub mod user;
