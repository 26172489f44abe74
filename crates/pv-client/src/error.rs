use pv_core::CoreError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors from backend calls and client setup.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}")]
    Status { status: StatusCode, body: String },
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),
    #[error("Not signed in")]
    Unauthenticated,
    #[error("{msg}", msg = pv_core::display::ACCESS_DENIED)]
    AccessDenied,
    #[error(transparent)]
    Validation(#[from] CoreError),
}

impl ClientError {
    /// HTTP status of a rejected request.
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response text sent with a failed request, if the backend sent any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => Some(body.trim()),
            _ => None,
        }
    }
}
