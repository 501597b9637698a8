use serde::{Serialize, Serializer};
use std::fmt;

/// ---------------------------------------------------------------------------
/// Field Budgets
/// ---------------------------------------------------------------------------

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 150;
pub const WHY_MAX_CHARS: usize = 250;
pub const MENTAL_FUEL_MAX_CHARS: usize = 250;
pub const WORKOUT_ID_MAX_CHARS: usize = 100;
pub const LABEL_MAX_CHARS: usize = 100;
pub const HEART_RATE_CEILING: u16 = 220;

/// ---------------------------------------------------------------------------
/// Workout Types
/// ---------------------------------------------------------------------------

/// Closed set of workout (and segment) types understood by the playback side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutType {
  Easy,
  Recovery,
  Long,
  Steady,
  Tempo,
  Threshold,
  Progression,
  Intervals,
  IntervalLadder,
  SprintIntervals,
  Benchmark,
  Strides,
  RestDay,
}

impl WorkoutType {
  pub const ALL: [WorkoutType; 13] = [
    WorkoutType::Easy,
    WorkoutType::Recovery,
    WorkoutType::Long,
    WorkoutType::Steady,
    WorkoutType::Tempo,
    WorkoutType::Threshold,
    WorkoutType::Progression,
    WorkoutType::Intervals,
    WorkoutType::IntervalLadder,
    WorkoutType::SprintIntervals,
    WorkoutType::Benchmark,
    WorkoutType::Strides,
    WorkoutType::RestDay,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutType::Easy => "Easy",
      WorkoutType::Recovery => "Recovery",
      WorkoutType::Long => "Long",
      WorkoutType::Steady => "Steady",
      WorkoutType::Tempo => "Tempo",
      WorkoutType::Threshold => "Threshold",
      WorkoutType::Progression => "Progression",
      WorkoutType::Intervals => "Intervals",
      WorkoutType::IntervalLadder => "Interval Ladder",
      WorkoutType::SprintIntervals => "Sprint Intervals",
      WorkoutType::Benchmark => "Benchmark",
      WorkoutType::Strides => "Strides",
      WorkoutType::RestDay => "Rest Day",
    }
  }

  /// Exact, case-sensitive match against the published names
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|t| t.as_str() == name)
  }
}

impl Serialize for WorkoutType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

/// Where a segment sits in the session. Maps onto warmup / block step / cooldown
/// on the device side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentPhase {
  Warmup,
  Work,
  Recovery,
  Cooldown,
}

impl SegmentPhase {
  pub const ALL: [SegmentPhase; 4] = [
    SegmentPhase::Warmup,
    SegmentPhase::Work,
    SegmentPhase::Recovery,
    SegmentPhase::Cooldown,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      SegmentPhase::Warmup => "warmup",
      SegmentPhase::Work => "work",
      SegmentPhase::Recovery => "recovery",
      SegmentPhase::Cooldown => "cooldown",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|p| p.as_str() == name)
  }
}

/// ---------------------------------------------------------------------------
/// Intensity Targets
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartRateRange {
  pub min: u16,
  pub max: u16,
}

/// A running pace in minutes and seconds per kilometer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
  pub minutes: u8,
  pub seconds: u8,
}

impl Pace {
  pub fn total_seconds(&self) -> u32 {
    self.minutes as u32 * 60 + self.seconds as u32
  }
}

impl fmt::Display for Pace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{:02}", self.minutes, self.seconds)
  }
}

impl Serialize for Pace {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaceRange {
  pub min: Pace,
  pub max: Pace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceTarget {
  /// Heart-rate zone token, 1 through 5
  Zone(u8),
  Pace(Pace),
  Range(PaceRange),
}

impl Serialize for PaceTarget {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      PaceTarget::Zone(zone) => serializer.collect_str(&format_args!("Z{}", zone)),
      PaceTarget::Pace(pace) => pace.serialize(serializer),
      PaceTarget::Range(range) => range.serialize(serializer),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Plan Structure
/// ---------------------------------------------------------------------------

/// A validated workout plan, as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
  pub workout_information: WorkoutInformation,
  pub workout_plan: PlanBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutInformation {
  pub title: String,
  #[serde(rename = "type")]
  pub workout_type: WorkoutType,
  pub description: String,
  pub why: String,
  pub mental_fuel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBody {
  pub workout_id: String,
  pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
  #[serde(rename = "type")]
  pub segment_type: WorkoutType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phase: Option<SegmentPhase>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  /// Seconds
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration: Option<f64>,
  /// Meters
  #[serde(skip_serializing_if = "Option::is_none")]
  pub distance: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target_heart_rate: Option<HeartRateRange>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target_pace: Option<PaceTarget>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub repeat: Option<RepeatBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatBlock {
  pub count: u32,
  pub steps: Vec<Segment>,
}

/// Primary timing of a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentGoal {
  Duration(f64),
  Distance(f64),
}

/// Intensity the step should be run at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intensity {
  HeartRate(HeartRateRange),
  Pace(PaceTarget),
}

impl Segment {
  /// Duration wins when both duration and distance are present.
  pub fn goal(&self) -> Option<SegmentGoal> {
    self
      .duration
      .map(SegmentGoal::Duration)
      .or_else(|| self.distance.map(SegmentGoal::Distance))
  }

  /// Heart rate wins when both targets are present.
  pub fn intensity(&self) -> Option<Intensity> {
    self
      .target_heart_rate
      .map(Intensity::HeartRate)
      .or_else(|| self.target_pace.map(Intensity::Pace))
  }
}

/// Unrolled step counts for a plan. Every repeat block is multiplied out and
/// the counts saturate at `usize::MAX`, since nothing bounds repeat depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
  pub steps: usize,
  pub timed: usize,
  pub measured: usize,
  pub heart_rate: usize,
  pub paced: usize,
}

impl StepSummary {
  fn add(self, other: StepSummary) -> StepSummary {
    StepSummary {
      steps: self.steps.saturating_add(other.steps),
      timed: self.timed.saturating_add(other.timed),
      measured: self.measured.saturating_add(other.measured),
      heart_rate: self.heart_rate.saturating_add(other.heart_rate),
      paced: self.paced.saturating_add(other.paced),
    }
  }

  fn times(self, count: u32) -> StepSummary {
    let n = count as usize;
    StepSummary {
      steps: self.steps.saturating_mul(n),
      timed: self.timed.saturating_mul(n),
      measured: self.measured.saturating_mul(n),
      heart_rate: self.heart_rate.saturating_mul(n),
      paced: self.paced.saturating_mul(n),
    }
  }

  fn of_step(segment: &Segment) -> StepSummary {
    let goal = segment.goal();
    let intensity = segment.intensity();
    StepSummary {
      steps: 1,
      timed: matches!(goal, Some(SegmentGoal::Duration(_))) as usize,
      measured: matches!(goal, Some(SegmentGoal::Distance(_))) as usize,
      heart_rate: matches!(intensity, Some(Intensity::HeartRate(_))) as usize,
      paced: matches!(intensity, Some(Intensity::Pace(_))) as usize,
    }
  }
}

impl WorkoutPlan {
  pub fn step_summary(&self) -> StepSummary {
    fn walk(segments: &[Segment]) -> StepSummary {
      segments
        .iter()
        .map(|s| match &s.repeat {
          Some(block) => walk(&block.steps).times(block.count),
          None => StepSummary::of_step(s),
        })
        .fold(StepSummary::default(), StepSummary::add)
    }
    walk(&self.workout_plan.segments)
  }

  /// Total number of step segments once every repeat block is unrolled
  pub fn expanded_step_count(&self) -> usize {
    self.step_summary().steps
  }
}
