//! Database migrations
//!
//! Schema creation and migration logic for the goal settings store.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- GOAL INPUTS
        -- Single-row table holding the raw user inputs the engine
        -- reconciles on every recompute. Text fields are stored as
        -- typed, untrimmed display text; the engine normalizes them.
        -- ============================================
        CREATE TABLE goal_inputs (
            id INTEGER PRIMARY KEY CHECK(id = 1),

            -- Body metrics (raw display text)
            weight_text TEXT NOT NULL DEFAULT '',
            feet_text TEXT NOT NULL DEFAULT '',
            inches_text TEXT NOT NULL DEFAULT '',
            age_text TEXT NOT NULL DEFAULT '',

            -- Enum selections
            sex TEXT NOT NULL DEFAULT 'male',
            activity_level TEXT NOT NULL DEFAULT 'moderate'
                CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'active', 'very_active')),
            -- No CHECK here: an unrecognized unit token is persisted as
            -- requested and interpreted as kg until corrected.
            weight_unit TEXT NOT NULL DEFAULT 'kg',
            goal_mode TEXT NOT NULL DEFAULT 'maintain' CHECK(goal_mode IN ('lose', 'maintain', 'gain')),

            -- Tunables (always stored in kg-based units)
            target_rate_kg_per_week REAL NOT NULL DEFAULT 0.5,
            protein_per_kg REAL NOT NULL DEFAULT 1.8,
            fat_per_kg REAL NOT NULL DEFAULT 0.9,

            -- Change-detection signature from the previous recompute
            last_signature TEXT,

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- GOAL TARGETS
        -- Single-row table of published derived values, overwritten
        -- in place on each recompute. All values NULL while the
        -- body profile is incomplete.
        -- ============================================
        CREATE TABLE goal_targets (
            id INTEGER PRIMARY KEY CHECK(id = 1),

            maintenance_calories INTEGER,
            suggested_intake INTEGER,
            protein_g INTEGER,
            fat_g INTEGER,
            carbs_g INTEGER,

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
