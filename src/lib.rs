pub mod api;
pub mod config;
pub mod llm;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod validation;

#[cfg(test)]
mod test_utils;

use api::AppState;
use config::Config;
use llm::ChatClient;
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = Config::from_env()?;
  logging::init(config.environment);

  let llm = ChatClient::new(&config.api_base, &config.openai_api_key, &config.model)?;
  let state = Arc::new(AppState {
    llm,
    access_secret: config.access_secret.clone(),
  });
  let app = api::router(state);

  let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
  tracing::info!(
    addr = %config.bind_addr,
    model = %config.model,
    environment = ?config.environment,
    "workout service listening"
  );

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  tracing::info!("workout service shut down");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
}
