//! HTTP request/response values and the transport that executes them.
//!
//! # Design
//! Requests and responses are plain data. `CodeforcesClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses the `HttpResponse`
//! that comes back, so everything except the round-trip itself is
//! deterministic and testable without a network. `UreqTransport` is the
//! blocking implementation used in production; any
//! `Fn(&HttpRequest) -> Result<HttpResponse, ApiError>` is also a transport.

use std::io;
use std::time::Duration;

use crate::error::ApiError;

/// Upper bound on a response body. `contest.standings` for large rounds runs
/// to tens of megabytes.
pub const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// One GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Wire method name, used in diagnostics.
    pub endpoint: String,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes exactly one request. Non-200 statuses are returned as data.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Blocking transport backed by `ureq`. A new agent is built per call with
/// the request's timeout as its global deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(request.timeout))
            .build()
            .new_agent();

        let mut response = agent
            .get(&request.url)
            .query_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .call()
            .map_err(|e| classify(request, e))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| classify(request, e))?;

        Ok(HttpResponse { status, body })
    }
}

fn classify(request: &HttpRequest, err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => timeout(request),
        ureq::Error::Io(ref io_err) if is_timeout(io_err) => timeout(request),
        other => ApiError::Connection {
            method: request.endpoint.clone(),
            reason: other.to_string(),
        },
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn timeout(request: &HttpRequest) -> ApiError {
    ApiError::Timeout {
        method: request.endpoint.clone(),
        timeout: request.timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            endpoint: "contest.list".to_string(),
            url: "http://127.0.0.1:9/contest.list".to_string(),
            query: vec![("gym".to_string(), "True".to_string())],
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn closures_are_transports() {
        let transport = |req: &HttpRequest| {
            Ok::<_, ApiError>(HttpResponse {
                status: 200,
                body: format!("{} {}", req.endpoint, req.query.len()),
            })
        };
        let response = transport.execute(&request()).unwrap();
        assert_eq!(response.body, "contest.list 1");
    }

    #[test]
    fn query_value_lookup() {
        let req = request();
        assert_eq!(req.query_value("gym"), Some("True"));
        assert_eq!(req.query_value("apiSig"), None);
    }

    #[test]
    fn io_timeouts_classify_as_timeout() {
        let err = classify(
            &request(),
            ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow")),
        );
        assert!(matches!(err, ApiError::Timeout { .. }));

        let err = classify(
            &request(),
            ureq::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused")),
        );
        assert!(matches!(err, ApiError::Connection { .. }));
    }
}
