//! Goal engine MCP server implementation
//!
//! Exposes the goal engine over MCP stdio. Body-metric and preference
//! edits go through the debounced scheduler; the unit toggle recomputes
//! immediately because it rewrites the displayed weight text itself.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::goal::GoalEngine;
use crate::models::GoalInputs;
use crate::scheduler::RecomputeScheduler;
use crate::tools::goals::{
    self, BodyMetricsUpdate, ConvertUnitResponse, GoalPreferencesUpdate, InputSnapshotResponse,
    PendingInputs,
};
use crate::tools::status::StatusTracker;

/// Goal engine MCP service
#[derive(Clone)]
pub struct GoalService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    engine: Arc<Mutex<GoalEngine>>,
    scheduler: RecomputeScheduler,
    /// Edits accumulate here between debounce fires
    pending: PendingInputs,
    tool_router: ToolRouter<GoalService>,
}

impl GoalService {
    pub fn new(
        database_path: PathBuf,
        database: Database,
        engine: Arc<Mutex<GoalEngine>>,
        scheduler: RecomputeScheduler,
        initial_inputs: GoalInputs,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            engine,
            scheduler,
            pending: PendingInputs::new(initial_inputs),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetBodyMetricsParams {
    /// Weight as typed, in the current display unit (e.g., "70.5" or "70,5")
    pub weight: Option<String>,
    /// Height feet component (non-negative integer text)
    pub feet: Option<String>,
    /// Height inches component (non-negative integer text, empty means 0)
    pub inches: Option<String>,
    /// Age in years (integer text)
    pub age: Option<String>,
    /// Sex label; anything starting with "m" counts as male
    pub sex: Option<String>,
    /// Activity level: sedentary, light, moderate, active, very_active
    /// (unknown values fall back to moderate)
    pub activity_level: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGoalPreferencesParams {
    /// Goal mode: lose, maintain, gain (unknown values fall back to maintain)
    pub mode: Option<String>,
    /// Target weight-change rate in kg/week, clamped to [0.0, 1.5]
    pub target_rate_kg_per_week: Option<f64>,
    /// Protein allocation in g/kg body weight, clamped to [1.2, 2.4]
    pub protein_per_kg: Option<f64>,
    /// Fat allocation in g/kg body weight, clamped to [0.6, 1.2]
    pub fat_per_kg: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertWeightUnitParams {
    /// Display unit to switch to: kg or lb
    pub unit: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl GoalService {
    // --- Status ---

    #[tool(description = "Get the current status of the goal engine service including build info, database status, and recompute counters")]
    async fn goal_status(&self) -> Result<CallToolResult, McpError> {
        let stats = self.engine.lock().await.stats();
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&stats);
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Inputs ---

    #[tool(description = "Update body metrics (weight/feet/inches/age text, sex, activity level). Only provided fields change. Recompute is debounced; invalid text clears the published targets rather than erroring.")]
    fn set_body_metrics(&self, Parameters(p): Parameters<SetBodyMetricsParams>) -> Result<CallToolResult, McpError> {
        let update = BodyMetricsUpdate {
            weight: p.weight, feet: p.feet, inches: p.inches, age: p.age,
            sex: p.sex, activity_level: p.activity_level,
        };
        let snapshot = self.pending.edit_body_metrics(update);
        let response = InputSnapshotResponse::from(&snapshot);
        self.scheduler.submit(snapshot);
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update goal preferences (mode, target rate in kg/week, protein and fat g/kg). Out-of-range tunables are clamped. Recompute is debounced.")]
    fn set_goal_preferences(&self, Parameters(p): Parameters<SetGoalPreferencesParams>) -> Result<CallToolResult, McpError> {
        let update = GoalPreferencesUpdate {
            mode: p.mode,
            target_rate_kg_per_week: p.target_rate_kg_per_week,
            protein_per_kg: p.protein_per_kg,
            fat_per_kg: p.fat_per_kg,
        };
        let snapshot = self.pending.edit_goal_preferences(update);
        let response = InputSnapshotResponse::from(&snapshot);
        self.scheduler.submit(snapshot);
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Switch the display weight unit (kg/lb). Rewrites the weight text in the new unit and recomputes immediately (no debounce). Unrecognized units leave the value unchanged but are still persisted.")]
    async fn convert_weight_unit(&self, Parameters(p): Parameters<ConvertWeightUnitParams>) -> Result<CallToolResult, McpError> {
        let snapshot = self.pending.edit_display_unit(&p.unit);

        // Immediate path: the displayed text itself changed
        let outcome = self.engine.lock().await.recompute_if_needed(&snapshot);

        let response = ConvertUnitResponse {
            weight_text: snapshot.weight_text.clone(),
            weight_unit: snapshot.weight_unit.clone(),
            weight_kg: crate::goal::parse_weight(
                &snapshot.weight_text,
                crate::goal::WeightUnit::from_str(&snapshot.weight_unit),
            ),
            recomputed: outcome.recomputed,
        };
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Outputs ---

    #[tool(description = "Read the published goal targets: maintenance calories, suggested daily intake, and protein/fat/carb grams. All values are absent while the body profile is incomplete.")]
    fn get_goal_targets(&self) -> Result<CallToolResult, McpError> {
        let snapshot = self.pending.snapshot();
        let result = goals::get_targets(&self.database, &snapshot)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Force a recompute of the current input snapshot right now, bypassing the debounce window. A no-op if nothing changed since the last recompute.")]
    async fn recompute_now(&self) -> Result<CallToolResult, McpError> {
        let snapshot = self.pending.snapshot();
        let outcome = self.engine.lock().await.recompute_if_needed(&snapshot);
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for GoalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrigoal".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrition Goal Engine".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrition Goal Engine - daily calorie and macro targets from body metrics. \
                 Inputs: set_body_metrics (weight/feet/inches/age text, sex, activity), \
                 set_goal_preferences (mode, rate kg/week, protein/fat g/kg), \
                 convert_weight_unit (kg/lb toggle, rewrites the weight text immediately). \
                 Outputs: get_goal_targets (maintenance, suggested intake, macro grams). \
                 recompute_now flushes pending edits; goal_status reports build and counters. \
                 Invalid metric text never errors: it clears the published targets until corrected."
                    .into(),
            ),
        }
    }
}
