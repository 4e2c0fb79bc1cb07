//! Explicit credential state for the HTTP client.

use crate::models::{Id, LoginResponse};

/// Credentials of a signed-in user.
///
/// Created from a login response and dropped on logout or on any 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub token: String,
    pub user_id: Id,
    pub email: String,
    pub role: String,
}

impl From<LoginResponse> for AuthContext {
    fn from(login: LoginResponse) -> Self {
        Self {
            token: login.token,
            user_id: login.id,
            email: login.email,
            role: login.role,
        }
    }
}
