use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure codes the catalog service puts in its error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    InvalidRequest,
    StorageUnavailable,
    /// Any code this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::StorageUnavailable => "storage_unavailable",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body returned by the catalog service on non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A decoded catalog error body, carried through `anyhow` chains.
#[derive(Debug, Error)]
#[error("catalog error {code}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl From<ApiError> for ApiException {
    fn from(value: ApiError) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_code_decodes() {
        let body: ApiError =
            serde_json::from_str(r#"{"code":"storage_unavailable","message":"bucket offline"}"#)
                .expect("decode");
        assert_eq!(body.code, ErrorCode::StorageUnavailable);
        let exception = ApiException::from(body);
        assert_eq!(
            exception.to_string(),
            "catalog error storage_unavailable: bucket offline"
        );
    }

    #[test]
    fn unrecognized_code_falls_back_to_unknown() {
        let body: ApiError =
            serde_json::from_str(r#"{"code":"quota_exceeded","message":"slow down"}"#)
                .expect("decode");
        assert_eq!(body.code, ErrorCode::Unknown);
        assert_eq!(body.message, "slow down");
    }
}
