use serde::{Deserialize, Serialize};

use super::ClientError;

/// Standard response envelope: `{data, message?, success}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data (absent on some failures)
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Optional server message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the request was successful; assumed when omitted
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            success: true,
        }
    }

    /// Unwrap the envelope into its payload
    pub fn into_result(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Rejected(
                self.message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ClientError::Decode("response envelope has no data".to_string()))
    }
}

/// Paged list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl<T> PaginatedResponse<T> {
    /// Whether pages remain after this one
    pub fn has_more(&self) -> bool {
        self.page.saturating_mul(self.limit) < self.total
    }
}
