//! The normalized result every call returns.
//!
//! # Design
//! Callers never see an `Err`. A call either yields the server's decoded body
//! (success or error status alike) or an `ErrorResult` describing why there
//! is no body. `into_value` flattens this to the plain JSON shape callers
//! pass around.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

pub const NO_RESPONSE_MSG: &str = "No response from server";
pub const REQUEST_FAILED_MSG: &str = "Request failed";

/// Failure marker, serialized as `{"status": false, "msg": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub status: bool,
    pub msg: String,
}

impl ErrorResult {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            status: false,
            msg: msg.into(),
        }
    }

    pub fn no_response() -> Self {
        Self::new(NO_RESPONSE_MSG)
    }
}

/// Outcome of one `get` or `post`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 2xx response body, opaque to the client.
    Success(Value),
    /// Non-2xx response whose body decoded; handed back unchanged.
    ServerError { status: u16, body: Value },
    /// No usable response.
    Failed(ErrorResult),
}

impl ApiResponse {
    /// Classify a transport outcome.
    ///
    /// Non-2xx responses without a decodable body land in `Failed` with a
    /// status message rather than pretending nothing came back.
    pub fn from_outcome(outcome: Result<HttpResponse, ApiError>) -> Self {
        match outcome {
            Ok(response) if response.is_success() => ApiResponse::Success(decode_success(&response)),
            Ok(response) => match serde_json::from_str::<Value>(&response.body) {
                Ok(body) => ApiResponse::ServerError {
                    status: response.status,
                    body,
                },
                Err(_) => ApiResponse::Failed(ErrorResult::new(format!(
                    "Request failed with status code {}",
                    response.status
                ))),
            },
            Err(ApiError::NoResponse(_)) => ApiResponse::Failed(ErrorResult::no_response()),
            Err(err) => {
                let msg = err.to_string();
                if msg.is_empty() {
                    ApiResponse::Failed(ErrorResult::new(REQUEST_FAILED_MSG))
                } else {
                    ApiResponse::Failed(ErrorResult::new(msg))
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ApiResponse::Failed(_))
    }

    /// Status of a non-2xx response that carried a body.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiResponse::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            ApiResponse::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The flat JSON shape: the body as-is, or the `ErrorResult` object.
    pub fn into_value(self) -> Value {
        match self {
            ApiResponse::Success(body) | ApiResponse::ServerError { body, .. } => body,
            ApiResponse::Failed(err) => serde_json::json!({ "status": err.status, "msg": err.msg }),
        }
    }
}

/// JSON when it parses, otherwise the raw text. Empty bodies become `null`.
/// A `text/*` content type skips JSON decoding so `"42"` stays a string.
fn decode_success(response: &HttpResponse) -> Value {
    let body = response.body.as_str();
    if body.trim().is_empty() {
        return Value::Null;
    }
    if response.is_text() {
        return Value::String(body.to_string());
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
