use bubblechat_types::MISSING_CREDENTIALS_MESSAGE;
use thiserror::Error;

/// A login attempt failed
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", MISSING_CREDENTIALS_MESSAGE)]
    MissingCredentials,
    /// The server answered with a non-success status
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid authentication response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("authentication response did not include an access token")]
    MissingToken,
}

/// A query could not be answered
#[derive(Debug, Error)]
pub enum QueryError {
    /// The server answered with a non-success status
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid query response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

impl AuthError {
    /// HTTP status of a rejected login, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl QueryError {
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
