//! Goal engine
//!
//! The stateful wrapper around the pure computation pipeline: it holds the
//! last change-detection signature and last published targets, skips
//! recomputation when nothing changed, and persists inputs and outputs as
//! one transaction on every real recompute.

use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::{GoalInputs, GoalTargets, TargetValues};

use super::estimator::maintenance_calories;
use super::normalizer::BodyProfile;
use super::resolver::{suggested_intake, GoalMode};
use super::signature::input_signature;
use super::splitter::MacroSplit;
use super::units::WeightUnit;

/// Result of one recompute entry-point invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecomputeOutcome {
    /// False when the signature cache short-circuited the call
    pub recomputed: bool,
    /// The currently published targets (None while the profile is incomplete)
    pub targets: Option<TargetValues>,
}

/// Running counters for the status tool
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub recompute_count: u64,
    pub skip_count: u64,
    pub last_recompute_at: Option<String>,
}

/// The goal engine: sole writer of the published target values
pub struct GoalEngine {
    database: Database,
    last_signature: Option<String>,
    last_targets: Option<TargetValues>,
    recompute_count: u64,
    skip_count: u64,
    last_recompute_at: Option<String>,
}

impl GoalEngine {
    /// Construct the engine, restoring the previous signature and targets
    /// from the store so a restart does not force a recompute.
    pub fn new(database: Database) -> DbResult<Self> {
        let (last_signature, last_targets) = database.with_conn(|conn| {
            let signature = GoalInputs::get(conn)?.and_then(|i| i.last_signature);
            let targets = GoalTargets::get(conn)?.and_then(|t| t.values());
            Ok((signature, targets))
        })?;

        Ok(Self {
            database,
            last_signature,
            last_targets,
            recompute_count: 0,
            skip_count: 0,
            last_recompute_at: None,
        })
    }

    /// Pure computation: raw inputs to target values
    ///
    /// Returns `None` whenever the body profile is incomplete; no partial
    /// outputs exist.
    pub fn compute(inputs: &GoalInputs) -> Option<TargetValues> {
        let profile = BodyProfile::from_raw(
            &inputs.weight_text,
            WeightUnit::from_str(&inputs.weight_unit),
            &inputs.feet_text,
            &inputs.inches_text,
            &inputs.age_text,
            &inputs.sex,
            &inputs.activity_level,
        )?;

        let maintenance = maintenance_calories(&profile);
        let mode = GoalMode::from_str(&inputs.goal_mode);
        let intake = suggested_intake(mode, maintenance, inputs.target_rate_kg_per_week);
        let split = MacroSplit::allocate(
            profile.weight_kg,
            inputs.protein_per_kg,
            inputs.fat_per_kg,
            intake,
        );

        Some(TargetValues {
            maintenance_calories: maintenance,
            suggested_intake: intake,
            protein_g: split.protein_g,
            fat_g: split.fat_g,
            carbs_g: split.carbs_g,
        })
    }

    /// Recompute and persist, unless the tracked inputs are unchanged
    ///
    /// Persistence failures are logged and absorbed: the in-memory outcome
    /// stays correct for this session and the store re-derives on next
    /// launch.
    pub fn recompute_if_needed(&mut self, inputs: &GoalInputs) -> RecomputeOutcome {
        let signature = input_signature(inputs);
        if self.last_signature.as_deref() == Some(signature.as_str()) {
            self.skip_count += 1;
            tracing::debug!("inputs unchanged, recompute skipped");
            return RecomputeOutcome {
                recomputed: false,
                targets: self.last_targets,
            };
        }

        // Signature first: a crash between here and the output write must
        // not leave the store re-triggering the same recompute forever.
        if let Err(e) = self
            .database
            .with_conn(|conn| GoalInputs::save_signature(conn, &signature))
        {
            tracing::warn!("failed to persist input signature: {}", e);
        }
        self.last_signature = Some(signature);

        let targets = Self::compute(inputs);

        // Inputs and published outputs land in one transaction so the
        // store never holds targets that disagree with their inputs.
        let persisted = self.database.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            GoalInputs::save(&tx, inputs)?;
            GoalTargets::publish(&tx, targets.as_ref())?;
            tx.commit()?;
            Ok(())
        });
        if let Err(e) = persisted {
            tracing::warn!("failed to persist recomputed goals: {}", e);
        }

        self.last_targets = targets;
        self.recompute_count += 1;
        self.last_recompute_at =
            Some(chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        match &targets {
            Some(t) => tracing::info!(
                maintenance = t.maintenance_calories,
                intake = t.suggested_intake,
                "goal targets recomputed"
            ),
            None => tracing::info!("body profile incomplete, goal targets cleared"),
        }

        RecomputeOutcome {
            recomputed: true,
            targets,
        }
    }

    /// Currently published targets
    pub fn published(&self) -> Option<TargetValues> {
        self.last_targets
    }

    /// Counters for the status tool
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            recompute_count: self.recompute_count,
            skip_count: self.skip_count,
            last_recompute_at: self.last_recompute_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DB_SEQ: AtomicU32 = AtomicU32::new(0);

    fn test_database() -> Database {
        let path = std::env::temp_dir().join(format!(
            "nutrigoal_engine_test_{}_{}.db",
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

    fn sample_inputs() -> GoalInputs {
        GoalInputs::default()
    }

    #[test]
    fn test_compute_reference_profile() {
        let mut inputs = sample_inputs();
        inputs.goal_mode = "lose".to_string();

        // Default profile is 70 kg / 5'7" / 30 / male / moderate. Height is
        // 170.18 cm, so maintenance is round(1618.625 * 1.55) = 2509.
        let targets = GoalEngine::compute(&inputs).unwrap();
        assert_eq!(targets.maintenance_calories, 2509);
        assert_eq!(targets.suggested_intake, 2509 - 550);
        assert_eq!(targets.protein_g, 126);
        assert_eq!(targets.fat_g, 63);
    }

    #[test]
    fn test_compute_incomplete_profile_has_no_partial_output() {
        for invalid in [
            ("weight", GoalInputs {
                weight_text: "not a number".to_string(),
                ..sample_inputs()
            }),
            ("height", GoalInputs {
                feet_text: "".to_string(),
                ..sample_inputs()
            }),
            ("age", GoalInputs {
                age_text: "500".to_string(),
                ..sample_inputs()
            }),
        ] {
            let (field, inputs) = invalid;
            assert!(
                GoalEngine::compute(&inputs).is_none(),
                "invalid {} must clear all outputs",
                field
            );
        }
    }

    #[test]
    fn test_recompute_idempotent_via_signature_cache() {
        let mut engine = GoalEngine::new(test_database()).unwrap();
        let inputs = sample_inputs();

        let first = engine.recompute_if_needed(&inputs);
        assert!(first.recomputed);
        assert!(first.targets.is_some());

        let second = engine.recompute_if_needed(&inputs);
        assert!(!second.recomputed);
        assert_eq!(second.targets, first.targets);
        assert_eq!(engine.stats().recompute_count, 1);
        assert_eq!(engine.stats().skip_count, 1);
    }

    #[test]
    fn test_recompute_persists_inputs_and_targets() {
        let database = test_database();
        let mut engine = GoalEngine::new(database.clone()).unwrap();
        let mut inputs = sample_inputs();
        inputs.goal_mode = "gain".to_string();

        let outcome = engine.recompute_if_needed(&inputs);
        let stored = database
            .with_conn(|conn| GoalTargets::get(conn))
            .unwrap()
            .unwrap();
        assert_eq!(stored.values(), outcome.targets);

        let stored_inputs = database
            .with_conn(|conn| GoalInputs::get(conn))
            .unwrap()
            .unwrap();
        assert_eq!(stored_inputs.goal_mode, "gain");
        assert!(stored_inputs.last_signature.is_some());
    }

    #[test]
    fn test_invalid_edit_clears_published_targets() {
        let database = test_database();
        let mut engine = GoalEngine::new(database.clone()).unwrap();

        let valid = sample_inputs();
        assert!(engine.recompute_if_needed(&valid).targets.is_some());

        let mut broken = sample_inputs();
        broken.weight_text = "".to_string();
        let outcome = engine.recompute_if_needed(&broken);
        assert!(outcome.recomputed);
        assert!(outcome.targets.is_none());

        let stored = database
            .with_conn(|conn| GoalTargets::get(conn))
            .unwrap()
            .unwrap();
        assert!(stored.values().is_none());
        assert!(stored.maintenance_calories.is_none());
    }

    #[test]
    fn test_signature_survives_restart() {
        let database = test_database();
        let inputs = sample_inputs();

        let mut engine = GoalEngine::new(database.clone()).unwrap();
        assert!(engine.recompute_if_needed(&inputs).recomputed);
        drop(engine);

        // A fresh engine over the same store must not recompute for the
        // same inputs.
        let mut restarted = GoalEngine::new(database).unwrap();
        let outcome = restarted.recompute_if_needed(&inputs);
        assert!(!outcome.recomputed);
        assert!(outcome.targets.is_some());
    }
}
