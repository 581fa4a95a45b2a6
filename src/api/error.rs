use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::TopologyError;

/// Errors surfaced by the backend client
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// No response: connect, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The server refused the payload's shape or values
    #[error("Validation error: {0}")]
    Validation(String),

    /// 2xx envelope with `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    /// Local reference check failed before anything was sent
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
}

/// Error body shapes the backend is known to send
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ClientError {
    /// Map a non-2xx response to an error
    pub fn from_response(status: StatusCode, path: &str, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(path.to_string()),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(if message.is_empty() {
                    format!("{path} rejected the payload")
                } else {
                    message
                })
            }
            _ => ClientError::Http {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NetworkError",
            ClientError::NotFound(_) => "NotFoundError",
            ClientError::Validation(_) => "ValidationError",
            ClientError::Rejected(_) => "Rejected",
            ClientError::Http { .. } => "HttpError",
            ClientError::Decode(_) => "DecodeError",
            ClientError::Topology(_) => "TopologyError",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Decode(error.to_string())
        } else {
            ClientError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Decode(error.to_string())
    }
}
