use mock_server::{stub, Canned};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const FIXTURES: &[(&str, &str)] = &[
    ("contest.list", include_str!("../../test-vectors/contest_list.json")),
    ("contest.standings", include_str!("../../test-vectors/contest_standings.json")),
    ("user.info", include_str!("../../test-vectors/user_info.json")),
];

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let stub = stub();
    {
        let mut state = stub.write().await;
        for (method, body) in FIXTURES {
            state.respond(method, Canned::raw(200, *body));
        }
    }

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "serving codeforces stub at /api");
    mock_server::run(listener, stub).await
}
