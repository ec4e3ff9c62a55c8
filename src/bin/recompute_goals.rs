//! Utility to force one recompute of the stored input snapshot and print
//! the resulting targets

use std::path::PathBuf;

use nutrigoal::goal::GoalEngine;
use nutrigoal::models::GoalInputs;

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
            std::fs::create_dir_all(&path).ok();
            path.push("nutrigoal.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = nutrigoal::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        nutrigoal::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let snapshot = database.with_conn(GoalInputs::get_or_default)?;
    let mut engine = GoalEngine::new(database)?;
    let outcome = engine.recompute_if_needed(&snapshot);

    if !outcome.recomputed {
        println!("Inputs unchanged since last recompute (signature cache hit).");
    }

    match outcome.targets {
        Some(t) => {
            println!("Goal targets:");
            println!("  Maintenance: {} kcal", t.maintenance_calories);
            println!("  Suggested intake: {} kcal", t.suggested_intake);
            println!(
                "  Macros: {} g protein / {} g fat / {} g carbs",
                t.protein_g, t.fat_g, t.carbs_g
            );
        }
        None => {
            println!("Body profile incomplete: no targets published.");
        }
    }

    Ok(())
}
