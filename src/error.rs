//! Request-level errors and their HTTP rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::completion::CompletionError;
use crate::extract::ExtractError;

/// Message for a request without a `file` field
pub const NO_FILE_MESSAGE: &str = "No file uploaded";
/// Message when extraction produced nothing usable
pub const NO_TEXT_MESSAGE: &str = "No readable text found.";
/// Client-facing message for network failures; details are only logged
pub const TRANSPORT_MESSAGE: &str = "Could not reach the completion API";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller supplied something unusable (400)
    #[error("{0}")]
    Input(String),
    /// Server missing required configuration (500)
    #[error("{0}")]
    Configuration(String),
    /// Completion API answered without a usable completion (500)
    #[error("upstream error: {error}")]
    Upstream { error: Value, api_response: Value },
    /// Completion API unreachable (500)
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn no_file() -> Self {
        Self::Input(NO_FILE_MESSAGE.to_string())
    }

    pub fn no_text() -> Self {
        Self::Input(NO_TEXT_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Input(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent to the client
    pub fn body(&self) -> Value {
        match self {
            Self::Upstream { error, api_response } => json!({
                "error": error,
                "api_response": api_response,
            }),
            Self::Transport(_) => json!({ "error": TRANSPORT_MESSAGE }),
            Self::Input(msg) | Self::Configuration(msg) | Self::Internal(msg) => {
                json!({ "error": msg })
            }
        }
    }
}

impl From<CompletionError> for AppError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::MissingApiKey => {
                Self::Configuration(CompletionError::MissingApiKey.to_string())
            }
            CompletionError::Upstream { error, api_response } => {
                Self::Upstream { error, api_response }
            }
            CompletionError::Transport(msg) => Self::Transport(msg),
            CompletionError::Client(msg) => Self::Internal(msg),
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Io(e) => Self::Internal(format!("Failed to read upload: {}", e)),
            other => Self::Input(format!("Could not read document: {}", other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
