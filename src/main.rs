//! Nutrition Goal Engine (nutrigoal)
//!
//! An MCP server computing daily calorie and macro targets.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod build_info;
mod db;
mod goal;
mod mcp;
mod models;
mod scheduler;
mod tools;

use goal::GoalEngine;
use mcp::GoalService;
use scheduler::{RecomputeScheduler, DEFAULT_DEBOUNCE};

/// Get the database path from environment or use default
fn get_database_path() -> PathBuf {
    std::env::var("NUTRIGOAL_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nutrigoal.db");
            path
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrigoal=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    // Get database path
    let db_path = get_database_path();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    // Engine restores the previous signature/targets from the store
    let engine = Arc::new(Mutex::new(GoalEngine::new(database.clone())?));

    // Debounce loop for keystroke-level input edits
    let recompute_scheduler = RecomputeScheduler::spawn(engine.clone(), DEFAULT_DEBOUNCE);

    // Seed the in-memory edit snapshot from the stored row
    let initial_inputs = database.with_conn(models::GoalInputs::get_or_default)?;

    // Create the goal service
    let service = GoalService::new(db_path, database, engine, recompute_scheduler, initial_inputs);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
