//! Domain types and rules for Pickleball Planner.
//!
//! This crate has no I/O. It holds the error taxonomy, status enums, session
//! join-code generation, and the validation and permission rules shared by
//! the database, API, and client crates.

pub mod error;
pub mod groups;
pub mod matches;
pub mod roles;
pub mod session;
pub mod session_code;
pub mod status;
pub mod types;
