//! Target resolver
//!
//! Turns a signed-by-mode weekly weight-change rate into a daily calorie
//! adjustment and a suggested daily intake.

use serde::{Deserialize, Serialize};

use super::units::KCAL_PER_KG;

const DAYS_PER_WEEK: f64 = 7.0;

/// Goal mode: the direction of the desired weight change
///
/// The stored rate is always non-negative; the sign is conveyed entirely
/// by the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMode {
    Lose,
    Maintain,
    Gain,
}

impl GoalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalMode::Lose => "lose",
            GoalMode::Maintain => "maintain",
            GoalMode::Gain => "gain",
        }
    }

    /// Parse from string. Total function: unknown keys default to maintain.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lose" | "cut" => GoalMode::Lose,
            "gain" | "bulk" => GoalMode::Gain,
            _ => GoalMode::Maintain,
        }
    }
}

/// Daily calorie adjustment for a weekly rate in kg
///
/// `round(rate * 7700 / 7)`; a zero rate always yields a zero delta.
pub fn daily_delta(target_rate_kg_per_week: f64) -> i64 {
    (target_rate_kg_per_week * KCAL_PER_KG / DAYS_PER_WEEK).round() as i64
}

/// Suggested daily intake for a mode and maintenance estimate
///
/// Lose is clamped at zero so an aggressive rate on a small maintenance
/// estimate never suggests a negative intake.
pub fn suggested_intake(mode: GoalMode, maintenance: i64, target_rate_kg_per_week: f64) -> i64 {
    let delta = daily_delta(target_rate_kg_per_week);
    match mode {
        GoalMode::Maintain => maintenance,
        GoalMode::Lose => (maintenance - delta).max(0),
        GoalMode::Gain => maintenance + delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_delta_half_kg() {
        // round(0.5 * 7700 / 7) = 550
        assert_eq!(daily_delta(0.5), 550);
    }

    #[test]
    fn test_daily_delta_rounding() {
        // 0.3 * 7700 / 7 = 330.0
        assert_eq!(daily_delta(0.3), 330);
        // 0.25 * 7700 / 7 = 275.0
        assert_eq!(daily_delta(0.25), 275);
        // 1.5 * 7700 / 7 = 1650.0
        assert_eq!(daily_delta(1.5), 1650);
    }

    #[test]
    fn test_suggested_intake_modes() {
        assert_eq!(suggested_intake(GoalMode::Maintain, 2507, 0.5), 2507);
        assert_eq!(suggested_intake(GoalMode::Lose, 2507, 0.5), 1957);
        assert_eq!(suggested_intake(GoalMode::Gain, 2507, 0.5), 3057);
    }

    #[test]
    fn test_zero_rate_yields_maintenance_for_all_modes() {
        for mode in [GoalMode::Lose, GoalMode::Maintain, GoalMode::Gain] {
            assert_eq!(suggested_intake(mode, 2507, 0.0), 2507);
        }
    }

    #[test]
    fn test_lose_clamps_at_zero() {
        // Delta (550) exceeds a tiny maintenance estimate
        assert_eq!(suggested_intake(GoalMode::Lose, 400, 0.5), 0);
    }

    #[test]
    fn test_mode_from_str_defaults_to_maintain() {
        assert_eq!(GoalMode::from_str("lose"), GoalMode::Lose);
        assert_eq!(GoalMode::from_str("GAIN"), GoalMode::Gain);
        assert_eq!(GoalMode::from_str("recomp"), GoalMode::Maintain);
    }
}
