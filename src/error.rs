//! Error types for the kiosk client

use reqwest::StatusCode;
use thiserror::Error;
use validator::ValidationErrors;

/// Failure of a single remote call
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl RequestError {
    /// HTTP status of the failure, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Transport(e) => e.status(),
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Decode(_) | RequestError::InvalidUrl(_) => None,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request failed: {0}")]
    Request(RequestError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Text shown to the kiosk user for this failure
    pub fn user_message(&self) -> String {
        match self {
            AppError::Request(_) => "Request failed. Please try again.".to_string(),
            AppError::Validation(errors) => {
                let mut fields: Vec<String> =
                    errors.field_errors().keys().map(|k| k.to_string()).collect();
                fields.sort_unstable();
                format!("Please check: {}", fields.join(", "))
            }
            AppError::Conflict(_) => "This record was already updated. Please reload.".to_string(),
            AppError::Config(_) => "Kiosk is misconfigured.".to_string(),
        }
    }
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        match e.status() {
            Some(StatusCode::CONFLICT) => AppError::Conflict(e.to_string()),
            _ => AppError::Request(e),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::from(e).into()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
