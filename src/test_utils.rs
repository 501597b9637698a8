//! Test utilities shared by the unit tests
//!
//! This module provides:
//! - Mock training-day factories (typed and raw JSON)
//! - A known-good model reply
//! - App state wired to a mock upstream

use crate::api::AppState;
use crate::llm::ChatClient;
use crate::models::{
  FitnessTier, FitnessTrend, TrainingDayInput, TrainingStrategy, TrainingWorkoutInput,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Request body as a caller would send it
pub fn mock_training_day_json() -> Value {
  json!({
    "date": "2025-06-02",
    "trimp7dAdjusted": 310.5,
    "trimp28dAdjusted": 1180.0,
    "trimp90dAdjusted": 3420.0,
    "acuteChronicRatio": 1.1,
    "chronicLoadRatio": 0.95,
    "hrv": 62.0,
    "rhr": 48.0,
    "sleepHours": 7.4,
    "sleepQuality": 0.82,
    "lastRunningWorkouts": [
      {
        "date": "2025-06-01",
        "distance": 10.2,
        "duration": 3300,
        "type": "Easy",
        "rpe": 4,
        "hrZoneDistribution": { "1": 300, "2": 1800, "3": 1200 }
      },
      {
        "date": "2025-05-30T07:15:00Z",
        "distance": 8.0,
        "duration": 2520,
        "type": "Tempo",
        "rpe": 7
      }
    ],
    "daysSinceLastRunningWorkout": 1,
    "daysSinceLastRest": 3,
    "vo2Max": 52.3,
    "fitnessTier": "intermediate",
    "fitnessTrend": "improving",
    "temperature": 18.5,
    "city": "Portland",
    "trainingStrategy": "impliedProgression"
  })
}

/// The same day as `mock_training_day_json`, typed
pub fn mock_training_day() -> TrainingDayInput {
  TrainingDayInput {
    date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    trimp7d_adjusted: 310.5,
    trimp28d_adjusted: 1180.0,
    trimp90d_adjusted: 3420.0,
    acute_chronic_ratio: 1.1,
    chronic_load_ratio: 0.95,
    hrv: Some(62.0),
    rhr: Some(48.0),
    sleep_hours: Some(7.4),
    sleep_quality: Some(0.82),
    last_running_workouts: vec![
      TrainingWorkoutInput {
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        distance: 10.2,
        duration: 3300.0,
        workout_type: "Easy".to_string(),
        rpe: Some(4.0),
        hr_zone_distribution: Some(BTreeMap::from([(1, 300.0), (2, 1800.0), (3, 1200.0)])),
      },
      TrainingWorkoutInput {
        date: NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
        distance: 8.0,
        duration: 2520.0,
        workout_type: "Tempo".to_string(),
        rpe: Some(7.0),
        hr_zone_distribution: None,
      },
    ],
    days_since_last_running_workout: 1,
    days_since_last_rest: 3,
    vo2_max: Some(52.3),
    fitness_tier: FitnessTier::Intermediate,
    fitness_trend: FitnessTrend::Improving,
    temperature: Some(18.5),
    city: Some("Portland".to_string()),
    training_strategy: TrainingStrategy::ImpliedProgression,
  }
}

/// A model reply that satisfies every workout constraint: warmup,
/// 6 x (800 m / 400 m) repeat, cooldown.
///
/// Numbers that come back out as `f64` are written as floats so the
/// validated plan serializes to an identical `Value`.
pub fn valid_plan_json() -> Value {
  json!({
    "workoutInformation": {
      "title": "6 x 800m Cruise Intervals",
      "type": "Intervals",
      "description": "Warm up, six 800m repeats at threshold with 400m jogs, easy cooldown.",
      "why": "Load is balanced (AC:CL 1.1) and sleep was solid, so you can absorb quality work today.",
      "mentalFuel": "Smooth, strong, repeatable. Own every 800."
    },
    "workoutPlan": {
      "workoutId": "2025-06-02-intervals-6x800",
      "segments": [
        {
          "type": "Easy",
          "phase": "warmup",
          "label": "Warm up",
          "duration": 600.0,
          "targetPace": "Z2"
        },
        {
          "type": "Intervals",
          "phase": "work",
          "repeat": {
            "count": 6,
            "steps": [
              {
                "type": "Intervals",
                "phase": "work",
                "distance": 800.0,
                "targetPace": { "min": "3:55", "max": "4:05" }
              },
              {
                "type": "Recovery",
                "phase": "recovery",
                "distance": 400.0,
                "targetHeartRate": { "min": 120, "max": 140 }
              }
            ]
          }
        },
        {
          "type": "Easy",
          "phase": "cooldown",
          "duration": 600.0,
          "targetHeartRate": { "min": 110, "max": 135 }
        }
      ]
    }
  })
}

/// A valid plan whose only segment is `depth` repeat blocks nested around a
/// single timed Z2 step, each block repeating `count` times.
pub fn nested_repeat_plan_json(depth: usize, count: u32) -> Value {
  let mut segment = json!({
    "type": "Easy",
    "phase": "work",
    "duration": 60.0,
    "targetPace": "Z2"
  });
  for _ in 0..depth {
    segment = json!({
      "type": "Intervals",
      "phase": "work",
      "repeat": { "count": count, "steps": [segment] }
    });
  }

  let mut plan = valid_plan_json();
  plan["workoutPlan"]["segments"] = json!([segment]);
  plan
}

/// ---------------------------------------------------------------------------
/// App State
/// ---------------------------------------------------------------------------

/// State pointing the chat client at a mockito server under `/v1/`
pub fn mock_app_state(server: &mockito::ServerGuard, secret: &str) -> Arc<AppState> {
  let base = Url::parse(&format!("{}/v1/", server.url())).expect("mock server url");
  let llm = ChatClient::new(&base, "sk-test", "gpt-4o").expect("chat client");

  Arc::new(AppState {
    llm,
    access_secret: secret.to_string(),
  })
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_typed_and_json_training_day_agree() {
    let parsed: TrainingDayInput = serde_json::from_value(mock_training_day_json()).unwrap();
    assert_eq!(parsed, mock_training_day());
  }

  #[test]
  fn test_valid_plan_has_nested_repeat() {
    let plan = valid_plan_json();
    let steps = plan["workoutPlan"]["segments"][1]["repeat"]["steps"]
      .as_array()
      .unwrap();
    assert_eq!(steps.len(), 2);
  }
}
