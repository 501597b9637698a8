use crate::validation::ValidationErrors;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// Every way a request can end without a plan. Each maps to one status and
/// one fixed `error` string.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("Method not allowed. Use POST.")]
  MethodNotAllowed,

  #[error("Unauthorized")]
  Unauthorized,

  #[error("Invalid request body: {0}")]
  InvalidRequest(String),

  #[error("Invalid GPT response format: {0}")]
  InvalidPlan(ValidationErrors),

  #[error("Internal server error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::InvalidRequest(_) | ApiError::InvalidPlan(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match self {
      ApiError::MethodNotAllowed => json!({ "error": "Method not allowed. Use POST." }),
      ApiError::Unauthorized => json!({ "error": "Unauthorized" }),
      ApiError::InvalidRequest(details) => json!({
        "error": "Invalid request body",
        "details": details,
      }),
      ApiError::InvalidPlan(violations) => json!({
        "error": "Invalid GPT response format",
        "details": violations,
      }),
      ApiError::Internal(details) => json!({
        "error": "Internal server error",
        "details": details,
      }),
    };
    (status, Json(body)).into_response()
  }
}
