mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use api::ApiClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal in deployed environments.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env();
    let client = ApiClient::from_env()?;
    tracing::info!(base_url = client.base_url(), "remote API client initialized");

    let port = config.port;
    let state = state::AppState::new(Arc::new(client), config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "seller dashboard gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
