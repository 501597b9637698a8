use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Upper bound on the workout history a caller may send
pub const MAX_RECENT_WORKOUTS: usize = 10;

/// ---------------------------------------------------------------------------
/// Training Day Input
/// ---------------------------------------------------------------------------

/// Everything the coach knows about the athlete on the day being planned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDayInput {
  #[serde(deserialize_with = "deserialize_day")]
  pub date: NaiveDate,

  // Training load (TRIMP)
  pub trimp7d_adjusted: f64,
  pub trimp28d_adjusted: f64,
  pub trimp90d_adjusted: f64,
  pub acute_chronic_ratio: f64,
  pub chronic_load_ratio: f64,

  // Recovery
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hrv: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rhr: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sleep_hours: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sleep_quality: Option<f64>, // 0-1

  // History
  #[serde(default)]
  pub last_running_workouts: Vec<TrainingWorkoutInput>,
  pub days_since_last_running_workout: u32,
  pub days_since_last_rest: u32,

  // Fitness
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vo2_max: Option<f64>,
  pub fitness_tier: FitnessTier,
  pub fitness_trend: FitnessTrend,

  // Environment
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f64>, // Celsius
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,

  #[serde(default)]
  pub training_strategy: TrainingStrategy,
}

/// One past run in the caller's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingWorkoutInput {
  #[serde(deserialize_with = "deserialize_day")]
  pub date: NaiveDate,
  pub distance: f64, // km
  pub duration: f64, // seconds
  #[serde(rename = "type")]
  pub workout_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rpe: Option<f64>,
  /// Zone number -> seconds spent in it
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hr_zone_distribution: Option<BTreeMap<u8, f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessTier {
  Beginner,
  Intermediate,
  Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessTrend {
  Improving,
  Stable,
  Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainingStrategy {
  #[default]
  ImpliedProgression,
  Other,
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp
fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|dt| dt.date_naive()))
    .map_err(|_| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

impl TrainingDayInput {
  /// Range checks serde can't express. Returns every problem found.
  pub fn check(&self) -> Result<(), Vec<String>> {
    let mut issues = Vec::new();

    let loads = [
      ("trimp7dAdjusted", self.trimp7d_adjusted),
      ("trimp28dAdjusted", self.trimp28d_adjusted),
      ("trimp90dAdjusted", self.trimp90d_adjusted),
      ("acuteChronicRatio", self.acute_chronic_ratio),
      ("chronicLoadRatio", self.chronic_load_ratio),
    ];
    for (name, value) in loads {
      if !value.is_finite() || value < 0.0 {
        issues.push(format!("{} must be a non-negative number", name));
      }
    }

    if let Some(quality) = self.sleep_quality {
      if !(0.0..=1.0).contains(&quality) {
        issues.push("sleepQuality must be between 0 and 1".into());
      }
    }

    if self.last_running_workouts.len() > MAX_RECENT_WORKOUTS {
      issues.push(format!(
        "lastRunningWorkouts holds at most {} workouts",
        MAX_RECENT_WORKOUTS
      ));
    }

    for (i, workout) in self.last_running_workouts.iter().enumerate() {
      if let Some(rpe) = workout.rpe {
        if !(1.0..=10.0).contains(&rpe) {
          issues.push(format!("lastRunningWorkouts[{}].rpe must be between 1 and 10", i));
        }
      }
      if workout.distance < 0.0 || workout.duration < 0.0 {
        issues.push(format!(
          "lastRunningWorkouts[{}] distance and duration must be non-negative",
          i
        ));
      }
    }

    if issues.is_empty() {
      Ok(())
    } else {
      Err(issues)
    }
  }
}
