pub mod auth;
pub mod error;
pub mod workout;

use crate::llm::ChatClient;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared by every request. Read-only after startup.
pub struct AppState {
  pub llm: ChatClient,
  pub access_secret: String,
}

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route(
      "/api/workout",
      post(workout::generate_workout).fallback(workout::method_not_allowed),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
