//! Shared API request/response types

use serde::{Deserialize, Serialize};

/// Authentication fields carried by every protected request body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthFields {
    /// Unix epoch time in milliseconds
    pub timestamp: i64,

    /// SHA-256 hash (64 hex chars)
    pub hash: String,
}

/// JSON error body returned by every ELP service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
