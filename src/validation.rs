//! Shape and constraint checks for model-generated workout plans
//!
//! The model hands back loosely structured JSON. Everything here walks that
//! JSON by hand so that every problem is collected with a path into the
//! nested segment/repeat structure, instead of stopping at the first one the
//! way a plain `serde` derive would. Nothing in this module panics or has side
//! effects: the same value always produces the same verdict and the same
//! violations, in document order.

use crate::models::workout::{
  HeartRateRange, Pace, PaceRange, PaceTarget, PlanBody, RepeatBlock, Segment, SegmentPhase,
  WorkoutInformation, WorkoutPlan, WorkoutType, DESCRIPTION_MAX_CHARS, HEART_RATE_CEILING,
  LABEL_MAX_CHARS, MENTAL_FUEL_MAX_CHARS, TITLE_MAX_CHARS, WHY_MAX_CHARS, WORKOUT_ID_MAX_CHARS,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

/// ---------------------------------------------------------------------------
/// Patterns
/// ---------------------------------------------------------------------------

// m:ss or mm:ss; the 0-59 ranges are checked after the match
static PACE_PATTERN: LazyLock<Option<Regex>> =
  LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").ok());

static ZONE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^Z([1-5])$").ok());

/// ---------------------------------------------------------------------------
/// Violations
/// ---------------------------------------------------------------------------

/// One failed constraint, located by a dotted path such as
/// `workoutPlan.segments[2].repeat.steps[0].targetPace`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  pub path: String,
  pub message: String,
}

/// Every violation found in a rejected plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
  pub fn violations(&self) -> &[Violation] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .0
      .iter()
      .map(|v| format!("{}: {}", v.path, v.message))
      .collect();
    write!(f, "{}", parts.join("; "))
  }
}

impl std::error::Error for ValidationErrors {}

/// ---------------------------------------------------------------------------
/// Entry Point
/// ---------------------------------------------------------------------------

/// Check a parsed model reply against the workout plan schema.
///
/// Unknown fields are dropped from the accepted plan and `null` in an optional
/// field counts as absent.
pub fn validate_workout(value: &Value) -> Result<WorkoutPlan, ValidationErrors> {
  let mut checker = Checker::default();
  let plan = checker.plan(value);

  match plan {
    Some(plan) if checker.violations.is_empty() => Ok(plan),
    _ => Err(ValidationErrors(checker.violations)),
  }
}

/// ---------------------------------------------------------------------------
/// Checker
/// ---------------------------------------------------------------------------

// Every check returns `Option<T>`: `None` means a violation was recorded.
// Optional fields use `Option<Option<T>>`, where the outer layer is validity.
#[derive(Default)]
struct Checker {
  violations: Vec<Violation>,
}

impl Checker {
  fn fail(&mut self, path: &str, message: impl Into<String>) {
    let path = if path.is_empty() { "(root)" } else { path };
    self.violations.push(Violation {
      path: path.to_string(),
      message: message.into(),
    });
  }

  fn plan(&mut self, value: &Value) -> Option<WorkoutPlan> {
    let obj = self.object(value, "")?;

    let information = self.required(obj, "workoutInformation", "", Self::information);
    let body = self.required(obj, "workoutPlan", "", Self::plan_body);

    Some(WorkoutPlan {
      workout_information: information?,
      workout_plan: body?,
    })
  }

  fn information(&mut self, value: &Value, path: &str) -> Option<WorkoutInformation> {
    let obj = self.object(value, path)?;

    let title = self.required(obj, "title", path, |c, v, p| c.text(v, p, 0, TITLE_MAX_CHARS));
    let workout_type = self.required(obj, "type", path, Self::workout_type);
    let description = self.required(obj, "description", path, |c, v, p| {
      c.text(v, p, 0, DESCRIPTION_MAX_CHARS)
    });
    let why = self.required(obj, "why", path, |c, v, p| c.text(v, p, 0, WHY_MAX_CHARS));
    let mental_fuel = self.required(obj, "mentalFuel", path, |c, v, p| {
      c.text(v, p, 0, MENTAL_FUEL_MAX_CHARS)
    });

    Some(WorkoutInformation {
      title: title?,
      workout_type: workout_type?,
      description: description?,
      why: why?,
      mental_fuel: mental_fuel?,
    })
  }

  fn plan_body(&mut self, value: &Value, path: &str) -> Option<PlanBody> {
    let obj = self.object(value, path)?;

    let workout_id = self.required(obj, "workoutId", path, |c, v, p| {
      c.text(v, p, 1, WORKOUT_ID_MAX_CHARS)
    });
    let segments = self.required(obj, "segments", path, Self::segments);

    Some(PlanBody {
      workout_id: workout_id?,
      segments: segments?,
    })
  }

  /// ---------------------------------------------------------------------------
  /// Segments
  /// ---------------------------------------------------------------------------

  fn segments(&mut self, value: &Value, path: &str) -> Option<Vec<Segment>> {
    let Some(items) = value.as_array() else {
      self.fail(path, format!("expected an array, received {}", kind(value)));
      return None;
    };

    if items.is_empty() {
      self.fail(path, "must contain at least one segment");
      return None;
    }

    // Visit every item so all violations are reported, not just the first
    let checked: Vec<Option<Segment>> = items
      .iter()
      .enumerate()
      .map(|(i, item)| self.segment(item, &format!("{}[{}]", path, i)))
      .collect();

    checked.into_iter().collect()
  }

  /// The per-segment rule set, applied identically at every nesting depth
  fn segment(&mut self, value: &Value, path: &str) -> Option<Segment> {
    let obj = self.object(value, path)?;

    let segment_type = self.required(obj, "type", path, Self::workout_type);
    let phase = self.optional(obj, "phase", path, Self::phase);
    let label = self.optional(obj, "label", path, |c, v, p| c.text(v, p, 0, LABEL_MAX_CHARS));
    let duration = self.optional(obj, "duration", path, Self::non_negative);
    let distance = self.optional(obj, "distance", path, Self::non_negative);
    let target_heart_rate = self.optional(obj, "targetHeartRate", path, Self::heart_rate);
    let target_pace = self.optional(obj, "targetPace", path, Self::pace_target);
    let repeat = self.optional(obj, "repeat", path, Self::repeat);

    // A repeat block is a container; its steps carry timing and intensity
    if present(obj, "repeat").is_none() {
      if present(obj, "duration").is_none() && present(obj, "distance").is_none() {
        self.fail(path, "segment must specify either duration or distance");
      }
      if present(obj, "targetHeartRate").is_none() && present(obj, "targetPace").is_none() {
        self.fail(path, "segment must specify either targetHeartRate or targetPace");
      }
    }

    Some(Segment {
      segment_type: segment_type?,
      phase: phase?,
      label: label?,
      duration: duration?,
      distance: distance?,
      target_heart_rate: target_heart_rate?,
      target_pace: target_pace?,
      repeat: repeat?,
    })
  }

  fn repeat(&mut self, value: &Value, path: &str) -> Option<RepeatBlock> {
    let obj = self.object(value, path)?;

    let count = self.required(obj, "count", path, |c, v, p| {
      c.whole_number(v, p, 1.0, u32::MAX as f64)
    });
    let steps = self.required(obj, "steps", path, Self::segments);

    Some(RepeatBlock {
      count: count? as u32,
      steps: steps?,
    })
  }

  /// ---------------------------------------------------------------------------
  /// Intensity Targets
  /// ---------------------------------------------------------------------------

  fn heart_rate(&mut self, value: &Value, path: &str) -> Option<HeartRateRange> {
    let obj = self.object(value, path)?;

    let ceiling = HEART_RATE_CEILING as f64;
    let min = self.required(obj, "min", path, |c, v, p| c.whole_number(v, p, 0.0, ceiling));
    let max = self.required(obj, "max", path, |c, v, p| c.whole_number(v, p, 0.0, ceiling));

    let (min, max) = (min? as u16, max? as u16);
    if min > max {
      self.fail(path, format!("min ({}) must not exceed max ({})", min, max));
      return None;
    }

    Some(HeartRateRange { min, max })
  }

  fn pace_target(&mut self, value: &Value, path: &str) -> Option<PaceTarget> {
    match value {
      Value::String(token) => {
        if let Some(zone) = parse_zone(token) {
          return Some(PaceTarget::Zone(zone));
        }
        match parse_pace(token) {
          Some(pace) => Some(PaceTarget::Pace(pace)),
          None => {
            self.fail(
              path,
              format!(
                "\"{}\" is not a zone (Z1-Z5) or a pace in m:ss format with minutes and seconds 0-59",
                token
              ),
            );
            None
          }
        }
      }
      Value::Object(obj) => {
        let min = self.required(obj, "min", path, Self::pace);
        let max = self.required(obj, "max", path, Self::pace);

        let (min, max) = (min?, max?);
        if min.total_seconds() > max.total_seconds() {
          self.fail(path, format!("min pace ({}) must not exceed max pace ({})", min, max));
          return None;
        }

        Some(PaceTarget::Range(PaceRange { min, max }))
      }
      other => {
        self.fail(
          path,
          format!("expected a pace string or a {{min, max}} object, received {}", kind(other)),
        );
        None
      }
    }
  }

  fn pace(&mut self, value: &Value, path: &str) -> Option<Pace> {
    let token = self.string(value, path)?;
    let pace = parse_pace(token);
    if pace.is_none() {
      self.fail(
        path,
        format!("\"{}\" is not a pace in m:ss format with minutes and seconds 0-59", token),
      );
    }
    pace
  }

  /// ---------------------------------------------------------------------------
  /// Scalars
  /// ---------------------------------------------------------------------------

  fn workout_type(&mut self, value: &Value, path: &str) -> Option<WorkoutType> {
    let name = self.string(value, path)?;
    let parsed = WorkoutType::from_name(name);
    if parsed.is_none() {
      let allowed: Vec<&str> = WorkoutType::ALL.iter().map(|t| t.as_str()).collect();
      self.fail(
        path,
        format!("\"{}\" is not a workout type; expected one of: {}", name, allowed.join(", ")),
      );
    }
    parsed
  }

  fn phase(&mut self, value: &Value, path: &str) -> Option<SegmentPhase> {
    let name = self.string(value, path)?;
    let parsed = SegmentPhase::from_name(name);
    if parsed.is_none() {
      let allowed: Vec<&str> = SegmentPhase::ALL.iter().map(|p| p.as_str()).collect();
      self.fail(
        path,
        format!("\"{}\" is not a phase; expected one of: {}", name, allowed.join(", ")),
      );
    }
    parsed
  }

  fn text(&mut self, value: &Value, path: &str, min: usize, max: usize) -> Option<String> {
    let text = self.string(value, path)?;
    let chars = text.chars().count();

    if chars < min {
      self.fail(path, format!("must contain at least {} character(s)", min));
      return None;
    }
    if chars > max {
      self.fail(
        path,
        format!("must contain at most {} characters, found {}", max, chars),
      );
      return None;
    }

    Some(text.to_string())
  }

  fn non_negative(&mut self, value: &Value, path: &str) -> Option<f64> {
    let number = self.number(value, path)?;
    if number < 0.0 {
      self.fail(path, format!("must be greater than or equal to 0, found {}", number));
      return None;
    }
    Some(number)
  }

  fn whole_number(&mut self, value: &Value, path: &str, min: f64, max: f64) -> Option<f64> {
    let number = self.number(value, path)?;
    if number.fract() != 0.0 {
      self.fail(path, format!("must be a whole number, found {}", number));
      return None;
    }
    if number < min || number > max {
      self.fail(path, format!("must be between {} and {}, found {}", min, max, number));
      return None;
    }
    Some(number)
  }

  fn number(&mut self, value: &Value, path: &str) -> Option<f64> {
    match value.as_f64() {
      Some(n) if n.is_finite() => Some(n),
      _ => {
        self.fail(path, format!("expected a number, received {}", kind(value)));
        None
      }
    }
  }

  fn string<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v str> {
    let text = value.as_str();
    if text.is_none() {
      self.fail(path, format!("expected a string, received {}", kind(value)));
    }
    text
  }

  fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
    let obj = value.as_object();
    if obj.is_none() {
      self.fail(path, format!("expected an object, received {}", kind(value)));
    }
    obj
  }

  /// ---------------------------------------------------------------------------
  /// Field Access
  /// ---------------------------------------------------------------------------

  fn required<T>(
    &mut self,
    obj: &Map<String, Value>,
    key: &str,
    parent: &str,
    check: impl FnOnce(&mut Self, &Value, &str) -> Option<T>,
  ) -> Option<T> {
    let path = field_path(parent, key);
    match present(obj, key) {
      Some(value) => check(self, value, &path),
      None => {
        self.fail(&path, "is required");
        None
      }
    }
  }

  fn optional<T>(
    &mut self,
    obj: &Map<String, Value>,
    key: &str,
    parent: &str,
    check: impl FnOnce(&mut Self, &Value, &str) -> Option<T>,
  ) -> Option<Option<T>> {
    match present(obj, key) {
      Some(value) => check(self, value, &field_path(parent, key)).map(Some),
      None => Some(None),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Helpers
/// ---------------------------------------------------------------------------

fn present<'v>(obj: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
  obj.get(key).filter(|v| !v.is_null())
}

fn field_path(parent: &str, key: &str) -> String {
  if parent.is_empty() {
    key.to_string()
  } else {
    format!("{}.{}", parent, key)
  }
}

fn kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

fn parse_zone(token: &str) -> Option<u8> {
  let caps = ZONE_PATTERN.as_ref()?.captures(token)?;
  caps.get(1)?.as_str().parse().ok()
}

/// Parse `m:ss` / `mm:ss` with minutes and seconds both in 0-59
pub fn parse_pace(token: &str) -> Option<Pace> {
  let caps = PACE_PATTERN.as_ref()?.captures(token)?;
  let minutes: u8 = caps.get(1)?.as_str().parse().ok()?;
  let seconds: u8 = caps.get(2)?.as_str().parse().ok()?;

  if minutes > 59 || seconds > 59 {
    return None;
  }

  Some(Pace { minutes, seconds })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
