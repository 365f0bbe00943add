//! Error types for the API client.
//!
//! # Design
//! Every failure the client can produce is an `ApiError`. Callers that only
//! care about the broad cause use `ApiError::kind`, which folds network and
//! status failures together and keeps malformed bodies apart.

use thiserror::Error;

/// Broad classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a usable response: network failure or a
    /// non-2xx status.
    Transport,
    /// The response arrived but its body was not valid JSON.
    Decode,
    /// The request could not be built, so nothing was sent.
    Request,
}

/// Errors returned by `ApiClient` and `Transport` implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The round trip failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status outside 200-299. The body is not
    /// inspected.
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    /// The response body could not be decoded as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("unsupported HTTP method: {0}")]
    InvalidMethod(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) | ApiError::HttpStatus { .. } => ErrorKind::Transport,
            ApiError::Deserialization(_) => ErrorKind::Decode,
            ApiError::Serialization(_) | ApiError::InvalidMethod(_) => ErrorKind::Request,
        }
    }

    /// Status code carried by an `HttpStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}
