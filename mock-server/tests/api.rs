use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, stub, Canned, Stub};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn stub_with(method: &str, canned: Canned) -> Stub {
    let stub = stub();
    stub.write().await.respond(method, canned);
    stub
}

// --- canned responses ---

#[tokio::test]
async fn serves_canned_ok_envelope() {
    let stub = stub_with("user.friends", Canned::ok(json!(["Petr"]))).await;
    let resp = app(stub).oneshot(get("/api/user.friends")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    assert_eq!(body_json(resp).await, json!({"status": "OK", "result": ["Petr"]}));
}

#[tokio::test]
async fn serves_canned_failure_as_400() {
    let stub = stub_with("contest.hacks", Canned::failed("contestId: Contest not found")).await;
    let resp = app(stub).oneshot(get("/api/contest.hacks?contestId=0")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["comment"], "contestId: Contest not found");
}

#[tokio::test]
async fn unknown_method_is_404_failed() {
    let resp = app(stub()).oneshot(get("/api/user.secrets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["comment"], "Method not found");
}

// --- recording ---

#[tokio::test]
async fn records_query_in_order() {
    let stub = stub_with("contest.standings", Canned::ok(json!({}))).await;
    let resp = app(stub.clone())
        .oneshot(get("/api/contest.standings?contestId=566&handles=tourist;Petr&from=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let state = stub.read().await;
    let recorded = &state.requests()[0];
    assert_eq!(recorded.method, "contest.standings");
    let names: Vec<_> = recorded.query.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["contestId", "handles", "from"]);
    assert_eq!(recorded.param("handles"), Some("tourist;Petr"));
}

// --- signature checks ---

#[tokio::test]
async fn protected_method_requires_key() {
    let stub = stub_with("user.friends", Canned::ok(json!([]))).await;
    stub.write().await.protect("K", "S", &["user.friends"]);
    let resp = app(stub).oneshot(get("/api/user.friends")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["comment"], "apiKey: Not specified");
}

#[tokio::test]
async fn protected_method_accepts_valid_signature() {
    let stub = stub_with("user.friends", Canned::ok(json!(["Petr"]))).await;
    stub.write().await.protect("K", "S", &["user.friends"]);
    let uri = "/api/user.friends?onlyOnline=True&apiKey=K&time=1700000000&apiSig=abcdef\
               f51207d5278f2fdf607d472383c03f57427b962a7d44fc0917f5aec6ad3e5bd0\
               67b284648d84f660b067e1967557fedd7c4f95d2cde9382dc162bc75c94ea996";
    let resp = app(stub).oneshot(get(uri)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["result"], json!(["Petr"]));
}

#[tokio::test]
async fn protected_method_rejects_tampered_parameters() {
    let stub = stub_with("user.friends", Canned::ok(json!([]))).await;
    stub.write().await.protect("K", "S", &["user.friends"]);
    let uri = "/api/user.friends?onlyOnline=False&apiKey=K&time=1700000000&apiSig=abcdef\
               f51207d5278f2fdf607d472383c03f57427b962a7d44fc0917f5aec6ad3e5bd0\
               67b284648d84f660b067e1967557fedd7c4f95d2cde9382dc162bc75c94ea996";
    let resp = app(stub).oneshot(get(uri)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["comment"], "apiSig: Incorrect signature");
}
