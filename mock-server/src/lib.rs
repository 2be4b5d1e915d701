//! Stub of the Codeforces API for tests.
//!
//! `GET /api/{method}` answers with whatever was registered for `method` and
//! records the query it received. When credentials are configured, protected
//! methods must carry a valid `apiSig`; the signature check is written
//! independently of the client so the two can catch each other's drift.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha512};
use tokio::{net::TcpListener, sync::RwLock};

/// A response to hand back for one method.
#[derive(Clone, Debug)]
pub struct Canned {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Canned {
    /// 200 with `{"status":"OK","result":result}`.
    pub fn ok(result: Value) -> Self {
        Self::raw(200, json!({"status": "OK", "result": result}).to_string())
    }

    /// Codeforces rejects requests with 400 and a FAILED envelope.
    pub fn failed(comment: &str) -> Self {
        Self::raw(400, failed_body(comment))
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
pub struct StubState {
    responses: HashMap<String, Canned>,
    requests: Vec<RecordedRequest>,
    credentials: Option<(String, String)>,
    protected: HashSet<String>,
}

impl StubState {
    pub fn respond(&mut self, method: &str, canned: Canned) -> &mut Self {
        self.responses.insert(method.to_string(), canned);
        self
    }

    /// Require a valid signature made with `key`/`secret` on `methods`.
    pub fn protect(&mut self, key: &str, secret: &str, methods: &[&str]) -> &mut Self {
        self.credentials = Some((key.to_string(), secret.to_string()));
        self.protected.extend(methods.iter().map(|m| m.to_string()));
        self
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    fn check_auth(&self, method: &str, query: &[(String, String)]) -> Result<(), &'static str> {
        let Some((key, secret)) = &self.credentials else {
            return Ok(());
        };
        if !self.protected.contains(method) {
            return Ok(());
        }
        let value = |name: &str| query.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str());
        match (value("apiKey"), value("time"), value("apiSig")) {
            (Some(k), Some(_), Some(sig)) if k == key => match sig.get(..6) {
                Some(rand) if expected_sig(method, query, secret, rand) == sig => Ok(()),
                _ => Err("apiSig: Incorrect signature"),
            },
            (Some(_), _, _) => Err("apiKey: Incorrect API key"),
            _ => Err("apiKey: Not specified"),
        }
    }
}

fn expected_sig(method: &str, query: &[(String, String)], secret: &str, rand: &str) -> String {
    // Sorted by (name, value) before rendering, so `count` precedes `count2`.
    let mut params: Vec<&(String, String)> =
        query.iter().filter(|(n, _)| n != "apiSig").collect();
    params.sort();
    let joined = params
        .iter()
        .map(|(n, v)| format!("{n}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let text = format!("{rand}/{method}?{joined}#{secret}");
    format!("{rand}{}", hex::encode(Sha512::digest(text.as_bytes())))
}

fn failed_body(comment: &str) -> String {
    json!({"status": "FAILED", "comment": comment}).to_string()
}

pub type Stub = Arc<RwLock<StubState>>;

pub fn stub() -> Stub {
    Arc::new(RwLock::new(StubState::default()))
}

pub fn app(stub: Stub) -> Router {
    Router::new()
        .route("/api/{method}", get(dispatch))
        .with_state(stub)
}

pub async fn run(listener: TcpListener, stub: Stub) -> Result<(), std::io::Error> {
    axum::serve(listener, app(stub)).await
}

async fn dispatch(
    State(stub): State<Stub>,
    Path(method): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let (canned, auth) = {
        let mut state = stub.write().await;
        state.requests.push(RecordedRequest {
            method: method.clone(),
            query: query.clone(),
        });
        (
            state.responses.get(&method).cloned(),
            state.check_auth(&method, &query),
        )
    };
    tracing::info!(%method, params = query.len(), "stub request");

    let canned = match (canned, auth) {
        (_, Err(comment)) => Canned::failed(comment),
        (Some(canned), Ok(())) => canned,
        (None, Ok(())) => Canned::raw(404, failed_body("Method not found")),
    };
    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }

    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], canned.body).into_response()
}
