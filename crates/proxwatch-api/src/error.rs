//! Error types for the proxwatch API client.

use thiserror::Error;

use crate::types::ErrorBody;

/// Typed error surfaced to consumers of the API client.
///
/// Cloneable on purpose: errors live inside broadcastable fetch-state
/// snapshots, so transport failures are captured as strings rather than
/// holding the underlying `reqwest::Error`.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<serde_json::Map<String, serde_json::Value>>,
    },

    /// The request never produced a response (connect/IO failure), or an
    /// attempt was torn down before it could settle.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a success status but the body did not
    /// decode as the declared type.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an `Api` error from a status code and a decoded error envelope.
    pub fn from_envelope(status: u16, body: ErrorBody) -> Self {
        ApiError::Api {
            status,
            code: Some(body.code),
            message: body.message,
            details: body.details,
        }
    }

    /// Build an `Api` error for a non-success status with no usable envelope.
    pub fn from_status(status: u16) -> Self {
        ApiError::Api {
            status,
            code: None,
            message: format!("HTTP error {status}"),
            details: None,
        }
    }

    /// HTTP status code, when the backend produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code from the backend envelope, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
