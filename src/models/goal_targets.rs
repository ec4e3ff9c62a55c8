//! Goal targets model
//!
//! The single-row table of published derived values. Overwritten in place
//! on each recompute; all columns NULL while the body profile is
//! incomplete.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A complete set of computed target values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetValues {
    pub maintenance_calories: i64,
    pub suggested_intake: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carbs_g: i64,
}

/// Published goal targets (single row, id = 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalTargets {
    pub id: i64,
    pub maintenance_calories: Option<i64>,
    pub suggested_intake: Option<i64>,
    pub protein_g: Option<i64>,
    pub fat_g: Option<i64>,
    pub carbs_g: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl GoalTargets {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            maintenance_calories: row.get("maintenance_calories")?,
            suggested_intake: row.get("suggested_intake")?,
            protein_g: row.get("protein_g")?,
            fat_g: row.get("fat_g")?,
            carbs_g: row.get("carbs_g")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The computed values, if the last recompute published any
    pub fn values(&self) -> Option<TargetValues> {
        Some(TargetValues {
            maintenance_calories: self.maintenance_calories?,
            suggested_intake: self.suggested_intake?,
            protein_g: self.protein_g?,
            fat_g: self.fat_g?,
            carbs_g: self.carbs_g?,
        })
    }

    /// Get the published targets (single row table)
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goal_targets WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(targets) => Ok(Some(targets)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Publish new target values, or clear them when `None` (incomplete
    /// profile). Upsert, single row.
    pub fn publish(conn: &Connection, values: Option<&TargetValues>) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO goal_targets (
                id, maintenance_calories, suggested_intake, protein_g, fat_g, carbs_g
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                maintenance_calories = excluded.maintenance_calories,
                suggested_intake = excluded.suggested_intake,
                protein_g = excluded.protein_g,
                fat_g = excluded.fat_g,
                carbs_g = excluded.carbs_g,
                updated_at = datetime('now')
            "#,
            params![
                values.map(|v| v.maintenance_calories),
                values.map(|v| v.suggested_intake),
                values.map(|v| v.protein_g),
                values.map(|v| v.fat_g),
                values.map(|v| v.carbs_g),
            ],
        )?;

        Self::get(conn)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}
