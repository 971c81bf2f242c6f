//! Error types for the bit.ly client.
//!
//! # Design
//! `Transport` and `Api` mirror the two ways a call can fail on the wire:
//! the request never produced a response, or the service answered with an
//! error payload. `Decode` covers responses that are not the JSON shape the
//! operation expects, and `Validation` covers input rejected before any
//! request is sent.

use thiserror::Error;

/// Transport-level codes, numbered after libcurl's error codes.
pub mod codes {
    pub const MALFORMED_URL: i64 = 3;
    pub const HOST_NOT_FOUND: i64 = 6;
    pub const CONNECT_FAILED: i64 = 7;
    pub const TIMEOUT: i64 = 28;
    pub const TOO_MANY_REDIRECTS: i64 = 47;
    pub const RECV_FAILED: i64 = 56;
}

/// Which layer an `ApiError` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Api,
    Decode,
    Validation,
}

/// A failure below the HTTP response layer, as reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error {code}: {message}")]
pub struct TransportError {
    pub code: i64,
    pub message: String,
}

impl TransportError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors returned by `BitlyClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// DNS, connect, TLS or timeout failure.
    #[error("transport error {code}: {message}")]
    Transport { code: i64, message: String },

    /// The service answered with a non-empty error message.
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    /// The body was not JSON, or lacked the field the operation reads.
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } => ErrorKind::Transport,
            ApiError::Api { .. } => ErrorKind::Api,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Numeric code from the transport or the service; 0 for local failures.
    pub fn code(&self) -> i64 {
        match self {
            ApiError::Transport { code, .. } | ApiError::Api { code, .. } => *code,
            ApiError::Decode(_) | ApiError::Validation(_) => 0,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message, .. } | ApiError::Api { message, .. } => message,
            ApiError::Decode(message) | ApiError::Validation(message) => message,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport {
            code: err.code,
            message: err.message,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_converts_with_code_and_message() {
        let err: ApiError = TransportError::new(codes::TIMEOUT, "timed out").into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.code(), 28);
        assert_eq!(err.message(), "timed out");
    }

    #[test]
    fn local_errors_have_zero_code() {
        assert_eq!(ApiError::Decode("x".into()).code(), 0);
        assert_eq!(ApiError::Validation("y".into()).code(), 0);
    }

    #[test]
    fn display_includes_code() {
        let err = ApiError::Api {
            code: 500,
            message: "INVALID_URI".to_string(),
        };
        assert_eq!(err.to_string(), "api error 500: INVALID_URI");
    }
}
