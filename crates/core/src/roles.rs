//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_users.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_GUEST: &str = "guest";

/// Seeded `roles.id` of [`ROLE_USER`].
pub const ROLE_USER_ID: i64 = 1;
/// Seeded `roles.id` of [`ROLE_GUEST`].
pub const ROLE_GUEST_ID: i64 = 2;
