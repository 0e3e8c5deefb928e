//! Meal MCP Tools
//!
//! Tools for logging meals and summarising the day.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::models::{Meal, MealCreate, NutritionGoals};
use crate::nutrition::{
    aggregate, goal_macro_percentages, macro_energy_split, meals_for_day, start_of_day,
    DailyProgress, MacroSplit,
};
use crate::store::{PersistenceStore, DEFAULT_RECENT_MEALS_LIMIT};
use super::goals::current_profile;
use super::{ToolError, ToolResult};

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub meal: Meal,
}

/// Response for list_recent_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub meals: Vec<Meal>,
    pub count: usize,
    pub limit: usize,
}

/// Summed nutrition for the day
#[derive(Debug, Serialize)]
pub struct DayTotals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub fiber: u32,
}

/// Response for get_daily_summary
#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub date: String,
    pub totals: DayTotals,
    pub meal_count: usize,
    pub meals: Vec<Meal>,
    pub goals: NutritionGoals,
    pub goals_saved: bool,
    pub progress: DailyProgress,
    pub macro_split: MacroSplit,      // share of calories eaten
    pub goal_macro_split: MacroSplit, // share of the calorie goal
}

// ============================================================================
// Meal Tools
// ============================================================================

/// Log a meal, timestamped now unless a time is given
pub fn log_meal(
    store: &dyn PersistenceStore,
    meal: MealCreate,
    logged_at: Option<DateTime<Utc>>,
) -> ToolResult<LogMealResponse> {
    let logged_at = logged_at.unwrap_or_else(Utc::now);
    let meal = store
        .save_meal(&meal, logged_at)
        .map_err(|e| ToolError::store("Failed to log meal", e))?;

    tracing::info!(id = meal.id, name = %meal.name, calories = meal.calories, "Logged meal");
    Ok(LogMealResponse { meal })
}

/// List the most recently logged meals
pub fn list_recent_meals(
    store: &dyn PersistenceStore,
    limit: Option<usize>,
) -> ToolResult<ListMealsResponse> {
    let limit = limit.unwrap_or(DEFAULT_RECENT_MEALS_LIMIT);
    let meals = store
        .load_recent_meals(limit)
        .map_err(|e| ToolError::store("Failed to load meals", e))?;

    Ok(ListMealsResponse {
        count: meals.len(),
        meals,
        limit,
    })
}

/// Summarise today's meals against the current goals
pub fn get_daily_summary(store: &dyn PersistenceStore) -> ToolResult<DailySummaryResponse> {
    daily_summary_for(store, Local::now().date_naive(), &Local)
}

/// Summarise the meals of `day` in time zone `tz`
pub fn daily_summary_for<Tz: TimeZone>(
    store: &dyn PersistenceStore,
    day: NaiveDate,
    tz: &Tz,
) -> ToolResult<DailySummaryResponse> {
    let (profile, goals_saved) = current_profile(store)?;

    let loaded = store
        .load_meals_since(start_of_day(day, tz))
        .map_err(|e| ToolError::store("Failed to load meals", e))?;
    let totals = aggregate(&meals_for_day(&loaded, day, tz));

    tracing::debug!(date = %day, meals = totals.meal_count(), "Built daily summary");

    Ok(DailySummaryResponse {
        date: day.format("%Y-%m-%d").to_string(),
        totals: DayTotals {
            calories: totals.calories,
            protein: totals.protein,
            carbs: totals.carbs,
            fat: totals.fat,
            fiber: totals.fiber,
        },
        meal_count: totals.meal_count(),
        progress: DailyProgress::new(&totals, &profile.goals),
        macro_split: macro_energy_split(&totals),
        goal_macro_split: goal_macro_percentages(&profile.goals),
        goals: profile.goals,
        goals_saved,
        meals: totals.meals,
    })
}
