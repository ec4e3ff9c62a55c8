//! Data models
//!
//! Rust structs representing the goal store's two single-row tables.

mod goal_inputs;
mod goal_targets;

pub use goal_inputs::GoalInputs;
pub use goal_targets::{GoalTargets, TargetValues};
