//! MCP module
//!
//! MCP server exposing the goal engine tools.

pub mod server;

pub use server::GoalService;
