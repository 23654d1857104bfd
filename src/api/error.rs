use thiserror::Error;

/// Unified error type for the backend API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP transport errors
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Base URL or path construction errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Response body decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A command needed a bearer token and none is stored
    #[error("not logged in - run `ticket-scout login` first")]
    NotAuthenticated,

    /// An admin endpoint was called without ADMIN_API_KEY configured
    #[error("admin key not configured - set ADMIN_API_KEY")]
    MissingAdminKey,

    /// Non-2xx response; `message` is the server's `error` field when present
    #[error("{message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;
