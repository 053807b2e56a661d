//! Request building and response normalization.
//!
//! # Design
//! `ApiClient` holds an immutable `ClientConfig` and a `Transport`, nothing
//! else. Each operation is split the same way: `build_*` turns arguments into
//! an `HttpRequest`, the transport executes it, and `parse_response` folds
//! whatever happened into an `ApiResponse`. `get` and `post` run all three
//! and never return an error.

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::ApiResponse;
use crate::transport::{Transport, UreqTransport};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";

/// Query parameters or a request body: string keys to arbitrary JSON.
pub type Params = Map<String, Value>;

/// Per-call passthrough merged into one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra headers, sent in order. An `Authorization` entry is replaced
    /// whenever the call has an API key.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Stateless client for a single base endpoint.
///
/// Safe to share across threads; every method takes `&self` and the
/// configuration never changes after construction.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client over a `ureq` agent bound to `config.timeout`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self { config, transport }
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Join `path` onto the base URL.
    ///
    /// An empty path means `/`. Paths that already carry a scheme bypass the
    /// base URL. The result must be absolute; anything else is rejected here
    /// so it never reaches the transport.
    pub fn resolve_url(&self, path: &str) -> Result<String, ApiError> {
        let path = if path.is_empty() { "/" } else { path };
        let base = self.config.base_url.as_str();

        let url = if is_absolute(path) || base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
        };

        if !is_absolute(&url) {
            return Err(ApiError::request(format!("Invalid URL: {url}")));
        }
        Ok(url)
    }

    pub fn build_get(
        &self,
        path: &str,
        query: &Params,
        apikey: Option<&str>,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.resolve_url(path)?,
            query: query_pairs(query),
            headers: self.merge_headers(apikey, options.headers.clone()),
            body: None,
        })
    }

    /// `data` becomes the JSON body exactly as given.
    pub fn build_post(
        &self,
        path: &str,
        data: &Params,
        apikey: Option<&str>,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resolve_url(path)?;
        let body = serde_json::to_string(data)?;

        let mut headers = options.headers.clone();
        if !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE)) {
            headers.push((CONTENT_TYPE.to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            query: Vec::new(),
            headers: self.merge_headers(apikey, headers),
            body: Some(body),
        })
    }

    pub fn parse_response(&self, outcome: Result<HttpResponse, ApiError>) -> ApiResponse {
        ApiResponse::from_outcome(outcome)
    }

    /// GET `path` with `query` as URL parameters.
    ///
    /// `apikey` of `None` uses the configured key; `Some("")` sends the
    /// request unauthenticated.
    #[instrument(level = "debug", skip_all, fields(path = %path))]
    pub fn get(&self, path: &str, query: &Params, apikey: Option<&str>, options: &RequestOptions) -> ApiResponse {
        self.dispatch(self.build_get(path, query, apikey, options))
    }

    /// POST `data` as a JSON body to `path`. Key handling matches `get`.
    #[instrument(level = "debug", skip_all, fields(path = %path))]
    pub fn post(&self, path: &str, data: &Params, apikey: Option<&str>, options: &RequestOptions) -> ApiResponse {
        self.dispatch(self.build_post(path, data, apikey, options))
    }

    fn dispatch(&self, built: Result<HttpRequest, ApiError>) -> ApiResponse {
        let outcome = built.and_then(|request| {
            debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
            self.transport.execute(&request)
        });

        let response = self.parse_response(outcome);
        match &response {
            ApiResponse::Failed(err) => warn!(msg = %err.msg, "request failed"),
            ApiResponse::ServerError { status, .. } => debug!(status, "server returned error status"),
            ApiResponse::Success(_) => {}
        }
        response
    }

    /// The effective key is the per-call one when given, otherwise the
    /// configured default. Only a non-empty key produces a header.
    fn merge_headers(&self, apikey: Option<&str>, mut headers: Vec<(String, String)>) -> Vec<(String, String)> {
        let key = apikey.unwrap_or(&self.config.api_key);
        if !key.is_empty() {
            headers.retain(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION));
            headers.push((AUTHORIZATION.to_string(), format!("Bearer {key}")));
        }
        headers
    }
}

/// Flatten query values to text.
///
/// Strings go out verbatim, `null` as empty, numbers and booleans as their
/// literal. Arrays join their elements with `,` (`[1, 2]` sends `1,2`).
/// Objects have no query form and are sent as their JSON text.
fn query_pairs(query: &Params) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(key, value)| (key.clone(), query_text(value)))
        .collect()
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(query_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// `scheme://...` with an RFC 3986 scheme.
fn is_absolute(url: &str) -> bool {
    match url.split_once("://") {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
