use super::auth::BearerAuth;
use super::error::ApiError;
use super::AppState;
use crate::llm::parse_model_output;
use crate::models::{TrainingDayInput, WorkoutPlan};
use crate::prompt::{build_system_prompt, build_user_message};
use crate::validation::validate_workout;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// ---------------------------------------------------------------------------
/// Generate Workout
/// ---------------------------------------------------------------------------

/// POST /api/workout
///
/// Credential check, then input decode, prompt, one model call, cleanup,
/// parse and validation. Nothing is retried.
pub async fn generate_workout(
  State(state): State<Arc<AppState>>,
  _auth: BearerAuth,
  body: Bytes,
) -> Result<Json<WorkoutPlan>, ApiError> {
  let input = decode_input(&body)?;

  let system_prompt = build_system_prompt(&input).map_err(internal)?;
  let user_message = build_user_message(&input).map_err(internal)?;
  tracing::debug!(date = %input.date, prompt = %system_prompt, "assembled prompt");

  let raw = state
    .llm
    .complete(&system_prompt, &user_message)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, model = state.llm.model(), "workout generation failed");
      internal(e)
    })?;
  tracing::debug!(reply = %raw, "model reply");

  let value = parse_model_output(&raw).map_err(|e| {
    tracing::error!(error = %e, "model reply could not be parsed");
    internal(e)
  })?;

  let plan = validate_workout(&value).map_err(|violations| {
    tracing::warn!(
      count = violations.len(),
      violations = %violations,
      "model reply failed workout validation"
    );
    ApiError::InvalidPlan(violations)
  })?;

  let summary = plan.step_summary();
  tracing::info!(
    date = %input.date,
    workout_type = plan.workout_information.workout_type.as_str(),
    steps = summary.steps,
    timed_steps = summary.timed,
    distance_steps = summary.measured,
    heart_rate_steps = summary.heart_rate,
    paced_steps = summary.paced,
    "workout generated"
  );

  Ok(Json(plan))
}

/// Any verb other than POST on the workout route
pub async fn method_not_allowed() -> ApiError {
  ApiError::MethodNotAllowed
}

fn decode_input(body: &[u8]) -> Result<TrainingDayInput, ApiError> {
  let input: TrainingDayInput =
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

  input
    .check()
    .map_err(|issues| ApiError::InvalidRequest(issues.join("; ")))?;

  Ok(input)
}

fn internal(err: impl std::fmt::Display) -> ApiError {
  ApiError::Internal(err.to_string())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
