//! REST client for the Pickleball Planner API.
//!
//! [`SessionApi`] is the unauthenticated surface the join flow needs;
//! [`HttpClient`] implements it over [`reqwest`] and adds the signed-in
//! operations (login, create and close sessions, member search).

use std::future::Future;

use pickleball_core::session_code::normalize_code;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::auth::AuthContext;
use crate::error::ClientError;
use crate::models::{ErrorBody, GroupMember, Id, LoginResponse, Participant, Session};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "PICKLEBALL_API_URL";

/// Base URL used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Public session operations used by the join flow.
pub trait SessionApi {
    /// Fetch a session by code.
    fn lookup_session(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Session, ClientError>> + Send;

    /// Fetch a session's roster in join order.
    fn list_participants(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Vec<Participant>, ClientError>> + Send;

    /// Add `player_name` to a session's roster.
    fn join_session(
        &self,
        code: &str,
        player_name: &str,
    ) -> impl Future<Output = Result<Participant, ClientError>> + Send;
}

/// Member search used by [`crate::debounce::GroupSearch`].
pub trait MemberSearch {
    fn search_members(
        &self,
        group_id: Id,
        query: &str,
    ) -> impl Future<Output = Result<Vec<GroupMember>, ClientError>> + Send;
}

/// HTTP client for one API deployment.
pub struct HttpClient {
    client: reqwest::Client,
    api_url: String,
    auth: RwLock<Option<AuthContext>>,
}

impl HttpClient {
    /// Create a client for `api_url`, e.g. `http://localhost:3000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            auth: RwLock::new(None),
        }
    }

    /// Create a client for the URL in `PICKLEBALL_API_URL`, or the local default.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Current credentials, if signed in.
    pub async fn auth(&self) -> Option<AuthContext> {
        self.auth.read().await.clone()
    }

    /// Sign in and keep the returned credentials for later calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthContext, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&body)
            .send()
            .await?;

        let login: LoginResponse = self.parse_response(response).await?;
        let ctx = AuthContext::from(login);
        tracing::debug!(user_id = ctx.user_id, "Signed in");
        *self.auth.write().await = Some(ctx.clone());
        Ok(ctx)
    }

    /// Drop the stored credentials.
    pub async fn logout(&self) {
        self.auth.write().await.take();
    }

    /// Create a session for a group. A blank `name` falls back to the group name.
    pub async fn create_session(
        &self,
        group_id: Id,
        name: Option<&str>,
    ) -> Result<Session, ClientError> {
        let token = self.token().await?;
        let body = serde_json::json!({ "name": name, "groupId": group_id });
        let response = self
            .client
            .post(self.url("/api/sessions"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    /// Close a session. Closing an already closed session succeeds.
    pub async fn close_session(&self, code: &str) -> Result<Session, ClientError> {
        let token = self.token().await?;
        let response = self
            .client
            .put(self.session_url(code, Some("close"))?)
            .bearer_auth(token)
            .send()
            .await?;
        self.parse_response(response).await
    }

    /// Sessions created by the signed-in user, newest first.
    pub async fn my_sessions(&self) -> Result<Vec<Session>, ClientError> {
        let token = self.token().await?;
        let response = self
            .client
            .get(self.url("/api/sessions/my"))
            .bearer_auth(token)
            .send()
            .await?;
        self.parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// `/api/sessions/{code}[/{action}]` with the normalized code escaped as
    /// a single path segment.
    fn session_url(&self, code: &str, action: Option<&str>) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.url("/api/sessions"))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.api_url.clone()))?
            .push(&normalize_code(code))
            .extend(action);
        Ok(url)
    }

    async fn token(&self) -> Result<String, ClientError> {
        self.auth
            .read()
            .await
            .as_ref()
            .map(|ctx| ctx.token.clone())
            .ok_or(ClientError::Unauthorized)
    }

    /// Map a non-2xx response to a [`ClientError`]. A 401 also drops the
    /// stored credentials.
    async fn ensure_success(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let err = classify_failure(status.as_u16(), body);
        if matches!(err, ClientError::Unauthorized) && self.auth.write().await.take().is_some() {
            tracing::info!("Credentials rejected, signed out");
        }
        Err(err)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = self.ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Classify a failed response by status code.
pub(crate) fn classify_failure(status: u16, body: String) -> ClientError {
    match status {
        400 => {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            ClientError::InvalidInput(message)
        }
        401 => ClientError::Unauthorized,
        404 => ClientError::NotFound,
        410 => ClientError::SessionClosed,
        _ => ClientError::Api { status, body },
    }
}

impl SessionApi for HttpClient {
    async fn lookup_session(&self, code: &str) -> Result<Session, ClientError> {
        let response = self
            .client
            .get(self.session_url(code, None)?)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn list_participants(&self, code: &str) -> Result<Vec<Participant>, ClientError> {
        let response = self
            .client
            .get(self.session_url(code, Some("participants"))?)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn join_session(
        &self,
        code: &str,
        player_name: &str,
    ) -> Result<Participant, ClientError> {
        let body = serde_json::json!({ "playerName": player_name });
        let response = self
            .client
            .post(self.session_url(code, Some("join"))?)
            .json(&body)
            .send()
            .await?;
        self.parse_response(response).await
    }
}

impl MemberSearch for HttpClient {
    async fn search_members(
        &self,
        group_id: Id,
        query: &str,
    ) -> Result<Vec<GroupMember>, ClientError> {
        let token = self.token().await?;
        let response = self
            .client
            .get(self.url(&format!("/api/groups/{group_id}/search-members")))
            .query(&[("query", query)])
            .bearer_auth(token)
            .send()
            .await?;
        self.parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn failures_map_to_variants() {
        assert_matches!(classify_failure(404, String::new()), ClientError::NotFound);
        assert_matches!(classify_failure(410, String::new()), ClientError::SessionClosed);
        assert_matches!(classify_failure(401, String::new()), ClientError::Unauthorized);
        assert_matches!(
            classify_failure(503, "down".into()),
            ClientError::Api { status: 503, body } if body == "down"
        );
    }

    #[test]
    fn bad_request_uses_error_message() {
        let body = r#"{"error":"Player name is required","code":"VALIDATION_ERROR"}"#;
        assert_matches!(
            classify_failure(400, body.into()),
            ClientError::InvalidInput(msg) if msg == "Player name is required"
        );
        assert_matches!(
            classify_failure(400, "plain".into()),
            ClientError::InvalidInput(msg) if msg == "plain"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpClient::new("http://localhost:3000/");
        assert_eq!(client.api_url(), "http://localhost:3000");
        assert_eq!(client.url("/api/sessions"), "http://localhost:3000/api/sessions");
    }

    #[test]
    fn session_url_normalizes_code() {
        let client = HttpClient::new(DEFAULT_API_URL);
        let url = client.session_url(" pckl-7b2q ", Some("join")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/sessions/PCKL-7B2Q/join");
        let url = client.session_url("pckl-7b2q", None).unwrap();
        assert_eq!(url.path(), "/api/sessions/PCKL-7B2Q");
    }

    #[test]
    fn session_url_keeps_code_in_one_segment() {
        let client = HttpClient::new(DEFAULT_API_URL);

        let url = client.session_url("ab#cd", Some("join")).unwrap();
        assert_eq!(url.path(), "/api/sessions/AB%23CD/join");
        assert_eq!(url.fragment(), None);

        let url = client.session_url("ab?cd", Some("join")).unwrap();
        assert_eq!(url.path(), "/api/sessions/AB%3FCD/join");
        assert_eq!(url.query(), None);

        let url = client.session_url("ab/cd", Some("join")).unwrap();
        assert_eq!(url.path(), "/api/sessions/AB%2FCD/join");
    }

    #[test]
    fn session_url_rejects_unusable_base() {
        let client = HttpClient::new("not a url");
        assert_matches!(
            client.session_url("PCKL-7B2Q", None),
            Err(ClientError::InvalidUrl(_))
        );
    }

    #[tokio::test]
    async fn authenticated_calls_need_credentials() {
        let client = HttpClient::new(DEFAULT_API_URL);
        assert!(client.auth().await.is_none());
        assert_matches!(client.my_sessions().await, Err(ClientError::Unauthorized));
    }
}
