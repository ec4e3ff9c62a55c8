//! Goal inputs model
//!
//! The single-row table of raw user inputs the engine reconciles: body
//! metric text fields, enum selections, and the macro/rate tunables.
//! Text fields are stored exactly as typed; normalization happens at
//! recompute time.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Raw engine inputs (single row, id = 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInputs {
    pub id: i64,
    pub weight_text: String,
    pub feet_text: String,
    pub inches_text: String,
    pub age_text: String,
    pub sex: String,
    pub activity_level: String,
    pub weight_unit: String,
    pub goal_mode: String,
    pub target_rate_kg_per_week: f64,
    pub protein_per_kg: f64,
    pub fat_per_kg: f64,
    pub last_signature: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for GoalInputs {
    /// Documented fallback defaults used when the store is empty:
    /// 70 kg, 5 ft 7 in (~170 cm), age 30, male, moderate activity,
    /// 1.8 g/kg protein, 0.9 g/kg fat, 0.5 kg/week, maintain.
    fn default() -> Self {
        Self {
            id: 1,
            weight_text: "70".to_string(),
            feet_text: "5".to_string(),
            inches_text: "7".to_string(),
            age_text: "30".to_string(),
            sex: "male".to_string(),
            activity_level: "moderate".to_string(),
            weight_unit: "kg".to_string(),
            goal_mode: "maintain".to_string(),
            target_rate_kg_per_week: 0.5,
            protein_per_kg: 1.8,
            fat_per_kg: 0.9,
            last_signature: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl GoalInputs {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            weight_text: row.get("weight_text")?,
            feet_text: row.get("feet_text")?,
            inches_text: row.get("inches_text")?,
            age_text: row.get("age_text")?,
            sex: row.get("sex")?,
            activity_level: row.get("activity_level")?,
            weight_unit: row.get("weight_unit")?,
            goal_mode: row.get("goal_mode")?,
            target_rate_kg_per_week: row.get("target_rate_kg_per_week")?,
            protein_per_kg: row.get("protein_per_kg")?,
            fat_per_kg: row.get("fat_per_kg")?,
            last_signature: row.get("last_signature")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the stored inputs (single row table)
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goal_inputs WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(inputs) => Ok(Some(inputs)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the stored inputs, falling back to the documented defaults
    pub fn get_or_default(conn: &Connection) -> DbResult<Self> {
        Ok(Self::get(conn)?.unwrap_or_default())
    }

    /// Write all input fields (upsert, single row)
    pub fn save(conn: &Connection, inputs: &Self) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO goal_inputs (
                id, weight_text, feet_text, inches_text, age_text,
                sex, activity_level, weight_unit, goal_mode,
                target_rate_kg_per_week, protein_per_kg, fat_per_kg
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                weight_text = excluded.weight_text,
                feet_text = excluded.feet_text,
                inches_text = excluded.inches_text,
                age_text = excluded.age_text,
                sex = excluded.sex,
                activity_level = excluded.activity_level,
                weight_unit = excluded.weight_unit,
                goal_mode = excluded.goal_mode,
                target_rate_kg_per_week = excluded.target_rate_kg_per_week,
                protein_per_kg = excluded.protein_per_kg,
                fat_per_kg = excluded.fat_per_kg,
                updated_at = datetime('now')
            "#,
            params![
                inputs.weight_text,
                inputs.feet_text,
                inputs.inches_text,
                inputs.age_text,
                inputs.sex,
                inputs.activity_level,
                inputs.weight_unit,
                inputs.goal_mode,
                inputs.target_rate_kg_per_week,
                inputs.protein_per_kg,
                inputs.fat_per_kg,
            ],
        )?;

        Self::get(conn)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Persist only the change-detection signature
    ///
    /// Written before recomputation so a crash mid-recompute cannot cause
    /// an infinite recompute loop on restart.
    pub fn save_signature(conn: &Connection, signature: &str) -> DbResult<()> {
        let updated = conn.execute(
            "UPDATE goal_inputs SET last_signature = ?1, updated_at = datetime('now') WHERE id = 1",
            params![signature],
        )?;

        // First run: no row yet, seed one carrying the signature
        if updated == 0 {
            conn.execute(
                "INSERT INTO goal_inputs (id, last_signature) VALUES (1, ?1)",
                params![signature],
            )?;
        }
        Ok(())
    }
}
