//! Goal computation module
//!
//! The normalize -> estimate -> resolve -> split pipeline, the
//! change-detection signature over its inputs, and the stateful engine
//! wrapper that persists results.

pub mod engine;
pub mod estimator;
pub mod normalizer;
pub mod resolver;
pub mod signature;
pub mod splitter;
pub mod units;

pub use engine::{EngineStats, GoalEngine, RecomputeOutcome};
pub use estimator::{bmr, maintenance_calories};
pub use normalizer::{
    convert_weight_text, parse_age, parse_height, parse_weight, ActivityLevel, BodyProfile, Sex,
    WeightConversion,
};
pub use resolver::{daily_delta, suggested_intake, GoalMode};
pub use signature::input_signature;
pub use splitter::MacroSplit;
pub use units::WeightUnit;
