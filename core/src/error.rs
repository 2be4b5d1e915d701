//! Error types for the Codeforces API client.
//!
//! # Design
//! Every call returns `Result<T, ApiError>`. The variants split into three
//! groups: failures detected before anything is sent (`UnknownMethod`,
//! `ParameterValidation`, `MissingCredentials`, `ResultShapeMismatch`),
//! transport-level outcomes (`Timeout`, `Connection`, `Http`) and logical
//! outcomes reported by the remote service or found while decoding its answer
//! (`Api`, `ResponseValidation`). None of them are retried internally.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::registry::{ParamKind, ResultShape};

/// A single reason a set of call arguments was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamProblem {
    /// The name is not declared in the endpoint's parameter schema.
    Unknown(String),
    /// A required parameter was absent, unset or an empty list.
    Missing(&'static str),
    /// The value does not have the declared kind.
    WrongKind {
        name: &'static str,
        expected: ParamKind,
    },
}

impl ParamProblem {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ParamProblem::Unknown(name) => name,
            ParamProblem::Missing(name) => name,
            ParamProblem::WrongKind { name, .. } => name,
        }
    }
}

impl fmt::Display for ParamProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamProblem::Unknown(name) => write!(f, "unknown parameter `{name}`"),
            ParamProblem::Missing(name) => write!(f, "missing required parameter `{name}`"),
            ParamProblem::WrongKind { name, expected } => {
                write!(f, "parameter `{name}` must be {expected}")
            }
        }
    }
}

fn join_problems(problems: &[ParamProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned by `CodeforcesClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No endpoint is registered under this identifier.
    #[error("unknown method: {name}")]
    UnknownMethod { name: String },

    /// The call arguments violate the endpoint's parameter schema. Never sent.
    #[error("invalid parameters for {method}: {}", join_problems(.problems))]
    ParameterValidation {
        method: &'static str,
        problems: Vec<ParamProblem>,
    },

    /// The endpoint requires a signed request but no credentials are configured.
    #[error("{method} requires an API key and secret")]
    MissingCredentials { method: &'static str },

    /// The requested Rust result type does not match the endpoint's shape.
    #[error("{method} returns {declared:?}, not {requested:?}")]
    ResultShapeMismatch {
        method: &'static str,
        declared: ResultShape,
        requested: ResultShape,
    },

    /// No response arrived within the configured timeout.
    #[error("request to {method} timed out after {:.2}s", .timeout.as_secs_f64())]
    Timeout { method: String, timeout: Duration },

    /// The host could not be reached.
    #[error("connection to {method} failed: {reason}")]
    Connection { method: String, reason: String },

    /// The server answered with a status other than 200.
    #[error("HTTP {status} from {method}: {body}")]
    Http {
        method: String,
        status: u16,
        body: String,
    },

    /// The envelope reported `status = "FAILED"`.
    #[error("API rejected request: {comment}")]
    Api { comment: String },

    /// The envelope is malformed or `result` does not fit the declared shape.
    #[error("invalid response at `{path}`: {reason}")]
    ResponseValidation { path: String, reason: String },

    /// Client configuration could not be loaded.
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl ApiError {
    pub(crate) fn invalid_response(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::ResponseValidation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The remote service's failure comment, if there is one.
    ///
    /// Codeforces answers most rejected requests with a non-200 status and a
    /// FAILED envelope, so `Http` bodies are checked for a comment as well.
    pub fn comment(&self) -> Option<String> {
        match self {
            ApiError::Api { comment } => Some(comment.clone()),
            ApiError::Http { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("comment")?.as_str().map(str::to_string)),
            _ => None,
        }
    }

    /// True when the request never left the process.
    pub fn is_pre_network(&self) -> bool {
        matches!(
            self,
            ApiError::UnknownMethod { .. }
                | ApiError::ParameterValidation { .. }
                | ApiError::MissingCredentials { .. }
                | ApiError::ResultShapeMismatch { .. }
                | ApiError::Config { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_validation_names_every_field() {
        let err = ApiError::ParameterValidation {
            method: "contest.list",
            problems: vec![
                ParamProblem::Unknown("bogus".to_string()),
                ParamProblem::Missing("contestId"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("`bogus`"), "{msg}");
        assert!(msg.contains("`contestId`"), "{msg}");
        assert!(err.is_pre_network());
    }

    #[test]
    fn comment_from_http_body_envelope() {
        let err = ApiError::Http {
            method: "contest.standings".to_string(),
            status: 400,
            body: r#"{"status":"FAILED","comment":"contestId: Contest with id 0 not found"}"#
                .to_string(),
        };
        assert_eq!(
            err.comment().as_deref(),
            Some("contestId: Contest with id 0 not found")
        );
        assert!(!err.is_pre_network());
    }

    #[test]
    fn comment_absent_for_plain_http_body() {
        let err = ApiError::Http {
            method: "contest.list".to_string(),
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert!(err.comment().is_none());
    }

    #[test]
    fn timeout_display_uses_seconds() {
        let err = ApiError::Timeout {
            method: "contest.list".to_string(),
            timeout: Duration::from_millis(9010),
        };
        assert_eq!(err.to_string(), "request to contest.list timed out after 9.01s");
    }
}
