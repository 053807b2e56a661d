//! Executes `HttpRequest` values over the network.
//!
//! `Transport` is the only place I/O happens. `UreqTransport` is the
//! production implementation; tests substitute their own.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok`, report
/// "sent but nothing came back" as `ApiError::NoResponse`, and everything
/// that stopped the request from going out as `ApiError::Request`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// `ureq`-backed transport holding one persistent agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    /// The timeout bounds the whole call: connect, send, and reading the body.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").field("timeout", &self.timeout).finish()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (key, value) in &request.query {
                    builder = builder.query(key, value);
                }
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (key, value) in &request.query {
                    builder = builder.query(key, value);
                }
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        // Bodies are opaque, so no size cap. Only I/O and timeouts while
        // reading count as nothing having come back.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, headers, body })
    }
}

/// Sort a `ureq` failure into "no response" versus "never sent".
fn classify(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Io(_)
        | ureq::Error::Timeout(_)
        | ureq::Error::HostNotFound
        | ureq::Error::ConnectionFailed
        | ureq::Error::ConnectProxyFailed(_)
        | ureq::Error::Tls(_)
        | ureq::Error::Rustls(_) => ApiError::no_response(err.to_string()),
        other => ApiError::request(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_and_timeout_failures_mean_no_response() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(classify(ureq::Error::Io(refused)).is_no_response());
        assert!(classify(ureq::Error::HostNotFound).is_no_response());
        assert!(classify(ureq::Error::ConnectionFailed).is_no_response());
    }

    #[test]
    fn tls_and_proxy_failures_mean_no_response() {
        assert!(classify(ureq::Error::Tls("handshake failed")).is_no_response());
        assert!(classify(ureq::Error::ConnectProxyFailed("proxy refused".to_string())).is_no_response());
    }

    #[test]
    fn body_limit_is_not_a_missing_response() {
        assert!(!classify(ureq::Error::BodyExceedsLimit(10 * 1024 * 1024)).is_no_response());
    }

    #[test]
    fn malformed_uri_is_a_request_failure() {
        let err = classify(ureq::Error::BadUri("missing scheme".to_string()));
        assert!(matches!(err, ApiError::Request(msg) if msg.contains("missing scheme")));
    }

    #[test]
    fn keeps_configured_timeout() {
        let transport = UreqTransport::new(Duration::from_millis(750));
        assert_eq!(transport.timeout(), Duration::from_millis(750));
    }
}
