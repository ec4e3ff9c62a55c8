//! Tools module
//!
//! MCP tool implementations for the nutrition goal engine.

pub mod goals;
pub mod status;
