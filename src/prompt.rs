//! Prompt assembly for workout generation
//!
//! The coaching instructions live in `prompts/workout_system.txt`. Field
//! budgets and enumerations are injected from the same constants the
//! validator enforces, so the two cannot drift apart.

use crate::models::workout::{
  SegmentPhase, WorkoutType, DESCRIPTION_MAX_CHARS, HEART_RATE_CEILING, LABEL_MAX_CHARS,
  MENTAL_FUEL_MAX_CHARS, TITLE_MAX_CHARS, WHY_MAX_CHARS, WORKOUT_ID_MAX_CHARS,
};
use crate::models::TrainingDayInput;
use serde_json::{json, Value};

const SYSTEM_TEMPLATE: &str = include_str!("prompts/workout_system.txt");

/// Machine-readable description of the reply shape, embedded in the prompt
pub fn schema_description() -> Value {
  let types: Vec<&str> = WorkoutType::ALL.iter().map(|t| t.as_str()).collect();
  let phases: Vec<&str> = SegmentPhase::ALL.iter().map(|p| p.as_str()).collect();

  let segment = json!({
    "type": { "enum": types },
    "phase": { "enum": phases, "optional": true },
    "label": { "type": "string", "maxLength": LABEL_MAX_CHARS, "optional": true },
    "duration": { "type": "number", "minimum": 0, "unit": "seconds", "optional": true },
    "distance": { "type": "number", "minimum": 0, "unit": "meters", "optional": true },
    "targetHeartRate": {
      "optional": true,
      "min": { "type": "integer", "minimum": 0, "maximum": HEART_RATE_CEILING },
      "max": { "type": "integer", "minimum": 0, "maximum": HEART_RATE_CEILING }
    },
    "targetPace": {
      "optional": true,
      "oneOf": ["Z1-Z5", "m:ss", { "min": "m:ss", "max": "m:ss" }]
    },
    "repeat": {
      "optional": true,
      "count": { "type": "integer", "minimum": 1 },
      "steps": "array of segments (same shape), at least one"
    }
  });

  json!({
    "workoutInformation": {
      "title": { "type": "string", "maxLength": TITLE_MAX_CHARS },
      "type": { "enum": types },
      "description": { "type": "string", "maxLength": DESCRIPTION_MAX_CHARS },
      "why": { "type": "string", "maxLength": WHY_MAX_CHARS },
      "mentalFuel": { "type": "string", "maxLength": MENTAL_FUEL_MAX_CHARS }
    },
    "workoutPlan": {
      "workoutId": { "type": "string", "minLength": 1, "maxLength": WORKOUT_ID_MAX_CHARS },
      "segments": { "type": "array", "minItems": 1, "items": segment }
    }
  })
}

/// Build the system instruction for one training day
pub fn build_system_prompt(input: &TrainingDayInput) -> Result<String, serde_json::Error> {
  let schema = serde_json::to_string_pretty(&schema_description())?;
  let training_day = serde_json::to_string_pretty(input)?;

  let types: Vec<String> = WorkoutType::ALL
    .iter()
    .map(|t| format!("\"{}\"", t.as_str()))
    .collect();
  let phases: Vec<String> = SegmentPhase::ALL
    .iter()
    .map(|p| format!("\"{}\"", p.as_str()))
    .collect();

  // Caller data goes last so nothing inside it is treated as a placeholder
  let vars = [
    ("schema", schema),
    ("workout_types", types.join(", ")),
    ("phases", phases.join(", ")),
    ("title_max", TITLE_MAX_CHARS.to_string()),
    ("description_max", DESCRIPTION_MAX_CHARS.to_string()),
    ("why_max", WHY_MAX_CHARS.to_string()),
    ("mental_fuel_max", MENTAL_FUEL_MAX_CHARS.to_string()),
    ("workout_id_max", WORKOUT_ID_MAX_CHARS.to_string()),
    ("label_max", LABEL_MAX_CHARS.to_string()),
    ("heart_rate_max", HEART_RATE_CEILING.to_string()),
    ("training_day", training_day),
  ];

  Ok(render(SYSTEM_TEMPLATE, &vars))
}

/// The user turn carries the same training day as compact JSON
pub fn build_user_message(input: &TrainingDayInput) -> Result<String, serde_json::Error> {
  serde_json::to_string(input)
}

fn render(template: &str, vars: &[(&str, String)]) -> String {
  vars.iter().fold(template.to_string(), |text, (name, value)| {
    text.replace(&format!("{{{{{}}}}}", name), value)
  })
}
