//! Thin HTTP API client: `get` and `post` against one base endpoint.
//!
//! # Overview
//! A client resolves its base URL, bearer key, and timeout once at
//! construction (explicit arguments, then `API_ENDPOINT` / `API_KEY` /
//! `API_TIMEOUT`, then defaults) and keeps them for its lifetime. Each call
//! builds a request, attaches `Authorization: Bearer <key>` when a key is in
//! effect, executes it, and normalizes the outcome into an `ApiResponse`.
//!
//! # Design
//! - `ApiClient` is stateless beyond its config; share it freely across threads.
//! - Building (`build_*`) and normalizing (`parse_response`) are pure; I/O
//!   sits behind the `Transport` trait, with `UreqTransport` as the default.
//! - Calls never return `Err`. Server error bodies come back as data, and
//!   transport failures become `{"status": false, "msg": ...}`.
//! - No retries, no caching, no singletons: `create_client` returns a fresh
//!   client every time.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;

pub use client::{ApiClient, Params, RequestOptions};
pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS, ENV_API_KEY, ENV_ENDPOINT, ENV_TIMEOUT};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{ApiResponse, ErrorResult, NO_RESPONSE_MSG, REQUEST_FAILED_MSG};
pub use transport::{Transport, UreqTransport};

/// Build a new client. Arguments left `None` are read from the environment.
pub fn create_client(base_url: Option<&str>, api_key: Option<&str>, timeout_ms: Option<u64>) -> ApiClient {
    let config = ClientConfig::resolve(
        base_url.map(str::to_string),
        api_key.map(str::to_string),
        timeout_ms,
    );
    ApiClient::new(config)
}
