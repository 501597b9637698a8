pub mod training;
pub mod workout;

pub use training::{FitnessTier, FitnessTrend, TrainingDayInput, TrainingStrategy, TrainingWorkoutInput};
pub use workout::{
  HeartRateRange, Pace, PaceRange, PaceTarget, PlanBody, RepeatBlock, Segment, SegmentPhase,
  StepSummary, WorkoutInformation, WorkoutPlan, WorkoutType,
};
