//! Error types for the API client.
//!
//! # Design
//! These errors never reach the caller of `get`/`post`; `ApiClient` folds
//! them into an `ApiResponse::Failed`. They exist so the build and transport
//! steps can use `?` and so the normalizer can tell "nothing came back"
//! apart from "the request never went out".

use thiserror::Error;

/// Errors produced while building or executing a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was dispatched but no response arrived: timeout, refused
    /// connection, DNS failure, or a connection dropped mid-response.
    #[error("no response from server: {0}")]
    NoResponse(String),

    /// The request could not be built or sent at all.
    #[error("{0}")]
    Request(String),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn no_response(msg: impl Into<String>) -> Self {
        Self::NoResponse(msg.into())
    }

    #[must_use]
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse(_))
    }
}
