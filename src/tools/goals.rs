//! Goal MCP tools
//!
//! Edit merging and read paths behind the goal tools. All edits accumulate
//! in a shared pending snapshot (`PendingInputs`) so that edits landing
//! inside one debounce window never clobber each other; persistence
//! happens inside the engine on the next successful recompute.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::db::Database;
use crate::goal::{convert_weight_text, ActivityLevel, GoalEngine, GoalMode, WeightUnit};
use crate::models::{GoalInputs, GoalTargets};

// Tunable ranges; edits outside them are clamped, never rejected
const RATE_RANGE: (f64, f64) = (0.0, 1.5);
const PROTEIN_RANGE: (f64, f64) = (1.2, 2.4);
const FAT_RANGE: (f64, f64) = (0.6, 1.2);

/// Fields accepted by set_body_metrics (all optional, merged over the
/// pending snapshot)
#[derive(Debug, Default)]
pub struct BodyMetricsUpdate {
    pub weight: Option<String>,
    pub feet: Option<String>,
    pub inches: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
}

/// Fields accepted by set_goal_preferences
#[derive(Debug, Default)]
pub struct GoalPreferencesUpdate {
    pub mode: Option<String>,
    pub target_rate_kg_per_week: Option<f64>,
    pub protein_per_kg: Option<f64>,
    pub fat_per_kg: Option<f64>,
}

/// Snapshot echoed back after an edit
#[derive(Debug, Serialize)]
pub struct InputSnapshotResponse {
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
    /// Whether the body metrics currently form a complete profile
    pub profile_complete: bool,
}

impl From<&GoalInputs> for InputSnapshotResponse {
    fn from(inputs: &GoalInputs) -> Self {
        Self {
            weight_text: inputs.weight_text.clone(),
            feet_text: inputs.feet_text.clone(),
            inches_text: inputs.inches_text.clone(),
            age_text: inputs.age_text.clone(),
            sex: inputs.sex.clone(),
            activity_level: inputs.activity_level.clone(),
            weight_unit: inputs.weight_unit.clone(),
            goal_mode: inputs.goal_mode.clone(),
            target_rate_kg_per_week: inputs.target_rate_kg_per_week,
            protein_per_kg: inputs.protein_per_kg,
            fat_per_kg: inputs.fat_per_kg,
            profile_complete: GoalEngine::compute(inputs).is_some(),
        }
    }
}

/// Published targets for the dashboard consumer
#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub maintenance_calories: Option<i64>,
    pub suggested_intake: Option<i64>,
    pub protein_g: Option<i64>,
    pub fat_g: Option<i64>,
    pub carbs_g: Option<i64>,
    pub profile_complete: bool,
    pub updated_at: Option<String>,
}

/// Response for convert_weight_unit
#[derive(Debug, Serialize)]
pub struct ConvertUnitResponse {
    /// The rewritten weight field text
    pub weight_text: String,
    pub weight_unit: String,
    /// The kg value backing the display, when the field parsed
    pub weight_kg: Option<f64>,
    pub recomputed: bool,
}

fn clamp(value: f64, (lo, hi): (f64, f64)) -> f64 {
    value.clamp(lo, hi)
}

/// The in-memory input snapshot edits accumulate into
///
/// The store is only written on recompute, so between debounce fires this
/// is the single source of truth for "what the user has typed so far".
/// Every edit merges over it under one lock and hands back a consistent
/// copy for the scheduler.
#[derive(Clone)]
pub struct PendingInputs {
    inner: Arc<Mutex<GoalInputs>>,
}

impl PendingInputs {
    /// Wrap the snapshot restored from the store at startup
    pub fn new(initial: GoalInputs) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// A consistent copy of the current snapshot
    pub fn snapshot(&self) -> GoalInputs {
        self.inner.lock().unwrap().clone()
    }

    /// Merge a body-metrics edit and return the updated snapshot
    pub fn edit_body_metrics(&self, update: BodyMetricsUpdate) -> GoalInputs {
        let mut inputs = self.inner.lock().unwrap();
        merge_body_metrics(&mut inputs, update);
        inputs.clone()
    }

    /// Merge a preferences edit and return the updated snapshot
    pub fn edit_goal_preferences(&self, update: GoalPreferencesUpdate) -> GoalInputs {
        let mut inputs = self.inner.lock().unwrap();
        merge_goal_preferences(&mut inputs, update);
        inputs.clone()
    }

    /// Switch the display unit and return the updated snapshot
    pub fn edit_display_unit(&self, unit_token: &str) -> GoalInputs {
        let mut inputs = self.inner.lock().unwrap();
        merge_display_unit(&mut inputs, unit_token);
        inputs.clone()
    }
}

/// Merge a body-metrics edit in place
///
/// Sex is stored as typed (matching stays permissive downstream); the
/// activity label is canonicalized through its total parser.
pub fn merge_body_metrics(inputs: &mut GoalInputs, update: BodyMetricsUpdate) {
    if let Some(weight) = update.weight {
        inputs.weight_text = weight;
    }
    if let Some(feet) = update.feet {
        inputs.feet_text = feet;
    }
    if let Some(inches) = update.inches {
        inputs.inches_text = inches;
    }
    if let Some(age) = update.age {
        inputs.age_text = age;
    }
    if let Some(sex) = update.sex {
        inputs.sex = sex;
    }
    if let Some(activity) = update.activity_level {
        inputs.activity_level = ActivityLevel::from_str(&activity).as_str().to_string();
    }
}

/// Merge a preferences edit in place
///
/// Mode is canonicalized through its total parser; numeric tunables are
/// clamped into their documented ranges.
pub fn merge_goal_preferences(inputs: &mut GoalInputs, update: GoalPreferencesUpdate) {
    if let Some(mode) = update.mode {
        inputs.goal_mode = GoalMode::from_str(&mode).as_str().to_string();
    }
    if let Some(rate) = update.target_rate_kg_per_week {
        inputs.target_rate_kg_per_week = clamp(rate, RATE_RANGE);
    }
    if let Some(protein) = update.protein_per_kg {
        inputs.protein_per_kg = clamp(protein, PROTEIN_RANGE);
    }
    if let Some(fat) = update.fat_per_kg {
        inputs.fat_per_kg = clamp(fat, FAT_RANGE);
    }
}

/// Switch the display weight unit in place, rewriting the weight text
///
/// The requested token is persisted as-is even when unrecognized; an
/// unrecognized token is interpreted as kg for the numeric conversion, so
/// the displayed value never changes under it.
pub fn merge_display_unit(inputs: &mut GoalInputs, unit_token: &str) {
    if !WeightUnit::is_recognized(unit_token) {
        tracing::warn!(
            "unrecognized weight unit '{}', value left unchanged",
            unit_token
        );
    }

    let from = WeightUnit::from_str(&inputs.weight_unit);
    let to = WeightUnit::from_str(unit_token);
    let conversion = convert_weight_text(&inputs.weight_text, from, to);

    inputs.weight_text = conversion.display_text;
    inputs.weight_unit = unit_token.trim().to_lowercase();
}

/// Read the published targets
///
/// `pending` is the current in-memory snapshot, so the completeness flag
/// reflects edits still waiting out the debounce window.
pub fn get_targets(db: &Database, pending: &GoalInputs) -> Result<TargetsResponse, String> {
    let targets = db
        .with_conn(|conn| GoalTargets::get(conn))
        .map_err(|e| e.to_string())?;

    let profile_complete = GoalEngine::compute(pending).is_some();
    Ok(match targets {
        Some(t) => TargetsResponse {
            maintenance_calories: t.maintenance_calories,
            suggested_intake: t.suggested_intake,
            protein_g: t.protein_g,
            fat_g: t.fat_g,
            carbs_g: t.carbs_g,
            profile_complete,
            updated_at: Some(t.updated_at),
        },
        None => TargetsResponse {
            maintenance_calories: None,
            suggested_intake: None,
            protein_g: None,
            fat_g: None,
            carbs_g: None,
            profile_complete,
            updated_at: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DB_SEQ: AtomicU32 = AtomicU32::new(0);

    fn test_database() -> Database {
        let path = std::env::temp_dir().join(format!(
            "nutrigoal_tools_test_{}_{}.db",
            std::process::id(),
            DB_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = std::fs::remove_file(&path);
        let database = Database::new(&path).expect("open test database");
        database
            .with_conn(|conn| run_migrations(conn))
            .expect("run migrations");
        database
    }

    #[test]
    fn test_merge_body_metrics_over_defaults() {
        let mut inputs = GoalInputs::default();
        merge_body_metrics(
            &mut inputs,
            BodyMetricsUpdate {
                weight: Some("82,5".to_string()),
                age: Some("41".to_string()),
                activity_level: Some("Very-Active".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(inputs.weight_text, "82,5");
        assert_eq!(inputs.age_text, "41");
        assert_eq!(inputs.activity_level, "very_active");
        // Untouched fields keep their defaults
        assert_eq!(inputs.feet_text, "5");
        assert_eq!(inputs.sex, "male");
    }

    #[test]
    fn test_merge_goal_preferences_clamps_tunables() {
        let mut inputs = GoalInputs::default();
        merge_goal_preferences(
            &mut inputs,
            GoalPreferencesUpdate {
                mode: Some("CUT".to_string()),
                target_rate_kg_per_week: Some(9.0),
                protein_per_kg: Some(0.5),
                fat_per_kg: Some(2.0),
            },
        );

        assert_eq!(inputs.goal_mode, "lose");
        assert_eq!(inputs.target_rate_kg_per_week, 1.5);
        assert_eq!(inputs.protein_per_kg, 1.2);
        assert_eq!(inputs.fat_per_kg, 1.2);
    }

    #[test]
    fn test_merge_display_unit_rewrites_weight_text() {
        let mut inputs = GoalInputs::default();
        merge_display_unit(&mut inputs, "lb");
        assert_eq!(inputs.weight_unit, "lb");
        assert_eq!(inputs.weight_text, "154.32");
    }

    #[test]
    fn test_merge_display_unit_unrecognized_token() {
        let mut inputs = GoalInputs::default();
        merge_display_unit(&mut inputs, "stone");
        // Flag persisted as requested, value numerically unchanged
        assert_eq!(inputs.weight_unit, "stone");
        assert_eq!(inputs.weight_text, "70");
    }

    #[test]
    fn test_successive_edits_accumulate_without_recompute() {
        // Two edits inside one debounce window must both survive: the
        // second snapshot carries the first edit, even though nothing has
        // been persisted yet.
        let pending = PendingInputs::new(GoalInputs::default());

        let first = pending.edit_body_metrics(BodyMetricsUpdate {
            weight: Some("85".to_string()),
            ..Default::default()
        });
        assert_eq!(first.weight_text, "85");

        let second = pending.edit_body_metrics(BodyMetricsUpdate {
            age: Some("41".to_string()),
            ..Default::default()
        });
        assert_eq!(second.age_text, "41");
        assert_eq!(second.weight_text, "85");
    }

    #[test]
    fn test_unit_toggle_sees_pending_weight_edit() {
        let pending = PendingInputs::new(GoalInputs::default());

        pending.edit_body_metrics(BodyMetricsUpdate {
            weight: Some("80".to_string()),
            ..Default::default()
        });
        let converted = pending.edit_display_unit("lb");

        // 80 kg, not the stored default of 70 kg
        assert_eq!(converted.weight_text, "176.37");
        assert_eq!(converted.weight_unit, "lb");
    }

    #[test]
    fn test_preference_and_metric_edits_do_not_clobber() {
        let pending = PendingInputs::new(GoalInputs::default());

        pending.edit_body_metrics(BodyMetricsUpdate {
            weight: Some("85".to_string()),
            ..Default::default()
        });
        pending.edit_goal_preferences(GoalPreferencesUpdate {
            mode: Some("gain".to_string()),
            ..Default::default()
        });

        let snapshot = pending.snapshot();
        assert_eq!(snapshot.weight_text, "85");
        assert_eq!(snapshot.goal_mode, "gain");
    }

    #[test]
    fn test_get_targets_empty_store() {
        let db = test_database();
        let pending = GoalInputs::default();
        let response = get_targets(&db, &pending).unwrap();
        assert!(response.maintenance_calories.is_none());
        // Defaults form a complete profile even before the first recompute
        assert!(response.profile_complete);
    }
}
