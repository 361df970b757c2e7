//! Error types for the Pingdom API client.

use thiserror::Error;

/// Base error type for Pingdom operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status attached to the error, if the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Auth(_) => Some(401),
            Error::Api(e) => e.status_code,
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Raised when the service rejects the credentials (HTTP 401).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

/// Raised when the API returns a non-success status.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status_code: Option<u16>,
    pub response_data: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(
        message: impl Into<String>,
        status_code: Option<u16>,
        response_data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            message: message.into(),
            status_code,
            response_data,
        }
    }

    /// Build from a Pingdom error envelope.
    pub fn from_body(status_code: u16, body: Option<serde_json::Value>) -> Self {
        let message =
            error_message(body.as_ref()).unwrap_or_else(|| "API request failed".to_string());
        Self::new(message, Some(status_code), body)
    }
}

/// Message from `{"error":{"statuscode":403,"statusdesc":"Forbidden","errormessage":"..."}}`,
/// preferring `errormessage` over `statusdesc`.
pub(crate) fn error_message(body: Option<&serde_json::Value>) -> Option<String> {
    let error = body?.get("error")?;
    ["errormessage", "statusdesc"]
        .iter()
        .filter_map(|k| error.get(*k).and_then(|m| m.as_str()))
        .find(|m| !m.is_empty())
        .map(String::from)
}
