//! Nutritrack MCP Server Implementation
//!
//! Implements the MCP server with all nutritrack tools.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::models::MealCreate;
use crate::store::PersistenceStore;
use crate::tools::goals::{self, GoalProfileUpdate, ManualGoals};
use crate::tools::meals;
use crate::tools::ToolError;
use crate::tools::status::StatusTracker;

/// Nutritrack MCP Service
#[derive(Clone)]
pub struct NutritrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    store: Arc<dyn PersistenceStore>,
    tool_router: ToolRouter<NutritrackService>,
}

impl NutritrackService {
    pub fn new(config: &AppConfig, store: Arc<dyn PersistenceStore>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config, store.backend_name()))),
            store,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Bad input becomes `invalid_params`; store failures stay internal errors
fn tool_error(e: ToolError) -> McpError {
    match e {
        ToolError::InvalidInput(e) => McpError::invalid_params(e.to_string(), None),
        ToolError::Store(message) => McpError::internal_error(message, None),
    }
}

fn parse_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>, McpError> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| McpError::invalid_params(format!("Invalid logged_at '{}': {}", s, e), None))
        })
        .transpose()
}

// ============================================================================
// Goal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateGoalsParams {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in whole years
    pub age_years: u32,
    /// "male" or "female"
    pub sex: String,
    /// sedentary, light, moderate, active or veryActive
    pub activity_level: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateGoalProfileParams {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<u32>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub auto_calculate: Option<bool>,
    pub water_goal_liters: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetManualGoalsParams {
    pub calorie_goal: u32,
    pub protein_goal: u32,
    pub carb_goal: u32,
    pub fat_goal: u32,
    pub fiber_goal: u32,
    pub water_goal_liters: f64,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    #[serde(default)]
    pub name: String,
    pub restaurant: Option<String>,
    pub calories: u32,
    pub protein: Option<u32>,
    pub carbs: Option<u32>,
    pub fat: Option<u32>,
    pub fiber: Option<u32>,
    /// RFC 3339 timestamp; defaults to now
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecentMealsParams {
    pub limit: Option<usize>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutritrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the nutritrack service including build info, store backend, and process information")]
    async fn nutritrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        to_json(&status)
    }

    #[tool(description = "Get instructions for setting nutrition goals and logging meals. Call this when starting a session or when unsure how the goal tools work.")]
    fn goal_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::GOAL_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(GOAL_INSTRUCTIONS)]))
    }

    // --- Goals ---

    #[tool(description = "Preview goals derived from biometrics and activity level (Mifflin-St Jeor BMR, TDEE, 30/45/25 macro split, fiber). Nothing is saved.")]
    fn calculate_goals(&self, Parameters(p): Parameters<CalculateGoalsParams>) -> Result<CallToolResult, McpError> {
        let result = goals::calculate_goals(p.weight_kg, p.height_cm, p.age_years, &p.sex, &p.activity_level)
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get the current nutrition goals, biometrics and activity level. Returns defaults when nothing has been saved.")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::get_goals(self.store.as_ref())
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Update biometrics, activity level, water goal or the auto_calculate flag. When auto_calculate is on, calorie, macro and fiber goals are recomputed and saved.")]
    fn update_goal_profile(&self, Parameters(p): Parameters<UpdateGoalProfileParams>) -> Result<CallToolResult, McpError> {
        let update = GoalProfileUpdate {
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age_years: p.age_years,
            sex: p.sex,
            activity_level: p.activity_level,
            auto_calculate: p.auto_calculate,
            water_goal_liters: p.water_goal_liters,
        };
        let result = goals::update_goal_profile(self.store.as_ref(), update)
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Set calorie, protein, carb, fat, fiber and water goals manually. Rejected while auto_calculate is on or when a value is outside its range.")]
    fn set_manual_goals(&self, Parameters(p): Parameters<SetManualGoalsParams>) -> Result<CallToolResult, McpError> {
        let manual = ManualGoals {
            calorie_goal: p.calorie_goal,
            protein_goal: p.protein_goal,
            carb_goal: p.carb_goal,
            fat_goal: p.fat_goal,
            fiber_goal: p.fiber_goal,
            water_goal_liters: p.water_goal_liters,
        };
        let result = goals::set_manual_goals(self.store.as_ref(), manual)
            .map_err(tool_error)?;
        to_json(&result)
    }

    // --- Meals ---

    #[tool(description = "Log a meal with calories and optional protein, carbs, fat and fiber in grams")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let logged_at = parse_timestamp(p.logged_at)?;
        let data = MealCreate {
            name: p.name,
            restaurant: p.restaurant,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            fiber: p.fiber,
        };
        let result = meals::log_meal(self.store.as_ref(), data, logged_at)
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "List the most recently logged meals, newest first (default 10)")]
    fn list_recent_meals(&self, Parameters(p): Parameters<ListRecentMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_recent_meals(self.store.as_ref(), p.limit)
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get today's nutrition totals, progress toward each goal, remaining amounts and macro split")]
    fn get_daily_summary(&self) -> Result<CallToolResult, McpError> {
        let result = meals::get_daily_summary(self.store.as_ref())
            .map_err(tool_error)?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutritrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutritrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrition Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrition Tracker - daily nutrition goals and meal logging. \
                 IMPORTANT: Call goal_instructions before changing goals. \
                 Goals: calculate_goals (preview only), get_goals, update_goal_profile, set_manual_goals. \
                 set_manual_goals requires auto_calculate to be off. \
                 Meals: log_meal, list_recent_meals, get_daily_summary."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp(None).unwrap(), None);

        let parsed = parse_timestamp(Some("2026-03-02T08:00:00-05:00".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(parsed, "2026-03-02T13:00:00Z".parse::<DateTime<Utc>>().unwrap());

        assert!(parse_timestamp(Some("yesterday".to_string())).is_err());
    }

    #[test]
    fn test_tool_error_codes() {
        use crate::error::NutritionError;
        use rmcp::model::ErrorCode;

        let invalid = tool_error(ToolError::from(NutritionError::invalid("fiber goal must be between 10 and 50")));
        assert_eq!(invalid.code, ErrorCode::INVALID_PARAMS);

        let store = tool_error(ToolError::store("Failed to save goals", "database is locked"));
        assert_eq!(store.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_manual_goals_while_auto_is_invalid_params() {
        use crate::store::MemoryStore;

        let store = MemoryStore::new();
        goals::update_goal_profile(
            &store,
            GoalProfileUpdate {
                auto_calculate: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        let manual = ManualGoals {
            calorie_goal: 2000,
            protein_goal: 120,
            carb_goal: 250,
            fat_goal: 65,
            fiber_goal: 30,
            water_goal_liters: 2.5,
        };
        let err = goals::set_manual_goals(&store, manual).map_err(tool_error).unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }
}
