/// Errors surfaced by the API client.
///
/// Statuses the join flow reacts to get their own variant; anything else is
/// kept as [`ClientError::Api`] with the raw body for debugging.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 404: unknown code or id.
    #[error("Not found")]
    NotFound,

    /// 410: the session is closed.
    #[error("Session is closed")]
    SessionClosed,

    /// 400, or input rejected before sending.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 401, or an authenticated call without credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx response.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The configured API URL cannot carry a request path.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
