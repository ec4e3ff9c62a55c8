//! Utility to seed the documented fallback defaults into the goal store

use std::path::PathBuf;

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
    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = nutrigoal::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        nutrigoal::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    // Seed defaults
    database.with_conn(|conn| {
        let inputs =
            nutrigoal::models::GoalInputs::save(conn, &nutrigoal::models::GoalInputs::default())?;
        println!("Defaults seeded:");
        println!("  Weight: {} {}", inputs.weight_text, inputs.weight_unit);
        println!("  Height: {} ft {} in", inputs.feet_text, inputs.inches_text);
        println!("  Age: {}", inputs.age_text);
        println!("  Sex: {} | Activity: {}", inputs.sex, inputs.activity_level);
        println!(
            "  Mode: {} @ {} kg/week | protein {} g/kg | fat {} g/kg",
            inputs.goal_mode,
            inputs.target_rate_kg_per_week,
            inputs.protein_per_kg,
            inputs.fat_per_kg
        );
        Ok(())
    })?;

    Ok(())
}
