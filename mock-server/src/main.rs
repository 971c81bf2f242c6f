use std::sync::Arc;

use mock_server::MockState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt::init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let login = std::env::var("BITLY_LOGIN").unwrap_or_else(|_| "bitlyapidemo".to_string());
    let api_key = std::env::var("BITLY_API_KEY").unwrap_or_else(|_| "R_demo".to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, %login, "mock bit.ly listening");
    mock_server::run(listener, Arc::new(MockState::new(&login, &api_key))).await
}
