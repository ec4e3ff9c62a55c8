//! Nutrition Goal Engine (nutrigoal) Library
//!
//! Core functionality for computing daily calorie and macro targets.

pub mod build_info;
pub mod db;
pub mod goal;
pub mod mcp;
pub mod models;
pub mod scheduler;
pub mod tools;
