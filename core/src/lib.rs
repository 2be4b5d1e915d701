//! Typed, blocking client for the Codeforces API.
//!
//! # Overview
//! Each endpoint is described once in a static registry. A call validates the
//! caller's arguments against that descriptor, signs the request when the
//! endpoint needs an API key, performs one GET, and decodes the JSON envelope
//! into a typed result or a classified `ApiError`.
//!
//! # Design
//! - `CodeforcesClient` is stateless apart from its config and transport.
//! - Request building (`build_request`) and response parsing
//!   (`parse_response`) are pure, so the I/O boundary is the `Transport` trait.
//! - No caching, retries or rate limiting: one call is one network attempt.
//! - Result types are defined independently from the stub server in the
//!   `mock-server` crate; integration tests catch drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod params;
pub mod registry;
pub mod types;

pub use auth::Credentials;
pub use client::{CodeforcesClient, StandingsQuery};
pub use config::ClientConfig;
pub use decode::{decode_envelope, Validate};
pub use error::{ApiError, ParamProblem};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use params::{Args, ParamValue};
pub use registry::{lookup, Descriptor, ParamKind, ParamSpec, ResultShape, REGISTRY};
pub use types::*;
