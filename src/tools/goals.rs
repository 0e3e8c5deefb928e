//! Goal MCP Tools
//!
//! Tools for previewing, reading and saving nutrition goals.

use serde::{Deserialize, Serialize};

use crate::error::NutritionError;
use crate::models::{
    validate_water, ActivityLevel, Biometrics, GoalProfile, NutritionGoals, Sex,
};
use crate::nutrition::{self, goal_macro_percentages, MacroSplit};
use crate::store::PersistenceStore;
use super::{ToolError, ToolResult};

/// Response for get_goals, update_goal_profile and set_manual_goals
#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub goals: NutritionGoals,
    pub activity_level: ActivityLevel,
    pub biometrics: Biometrics,
    pub macro_percentages: MacroSplit,
    pub saved: bool, // false when showing defaults because nothing is stored
}

impl GoalsResponse {
    fn new(profile: GoalProfile, saved: bool) -> Self {
        Self {
            macro_percentages: goal_macro_percentages(&profile.goals),
            goals: profile.goals,
            activity_level: profile.activity_level,
            biometrics: profile.biometrics,
            saved,
        }
    }
}

/// Response for calculate_goals
#[derive(Debug, Serialize)]
pub struct CalculateGoalsResponse {
    pub bmr: f64,
    pub tdee: u32,
    pub activity_multiplier: f64,
    pub goals: NutritionGoals,
    pub macro_percentages: MacroSplit,
}

/// Changes to biometrics, activity level or mode; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalProfileUpdate {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<u32>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub auto_calculate: Option<bool>,
    pub water_goal_liters: Option<f64>,
}

/// A full set of manually chosen goals
#[derive(Debug, Clone, Deserialize)]
pub struct ManualGoals {
    pub calorie_goal: u32,
    pub protein_goal: u32,
    pub carb_goal: u32,
    pub fat_goal: u32,
    pub fiber_goal: u32,
    pub water_goal_liters: f64,
}

/// Load the stored profile, falling back to defaults when nothing is saved.
///
/// The flag is true when the profile came from the store.
pub fn current_profile(store: &dyn PersistenceStore) -> ToolResult<(GoalProfile, bool)> {
    match store.load_goals() {
        Ok(Some(profile)) => Ok((profile, true)),
        Ok(None) => {
            tracing::warn!("No saved goals found, using defaults");
            Ok((GoalProfile::default(), false))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load goals");
            Err(ToolError::store("Failed to load goals", e))
        }
    }
}

fn save_profile(store: &dyn PersistenceStore, profile: &GoalProfile) -> ToolResult<()> {
    store
        .save_goals(profile)
        .map_err(|e| ToolError::store("Failed to save goals", e))?;
    tracing::info!(
        calorie_goal = profile.goals.calorie_goal,
        auto_calculate = profile.goals.auto_calculate,
        "Saved goals"
    );
    Ok(())
}

// ============================================================================
// Goal Tools
// ============================================================================

/// Get the current goals
pub fn get_goals(store: &dyn PersistenceStore) -> ToolResult<GoalsResponse> {
    let (profile, saved) = current_profile(store)?;
    Ok(GoalsResponse::new(profile, saved))
}

/// Preview auto-calculated goals without saving anything
pub fn calculate_goals(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: &str,
    activity_level: &str,
) -> ToolResult<CalculateGoalsResponse> {
    let sex: Sex = sex.parse()?;
    let activity_level: ActivityLevel = activity_level.parse()?;
    let biometrics = Biometrics::new(weight_kg, height_cm, age_years, sex)?;

    let bmr = nutrition::bmr(&biometrics)?;
    let goals = nutrition::compute_goals(&biometrics, activity_level)?;

    Ok(CalculateGoalsResponse {
        bmr,
        tdee: goals.calorie_goal,
        activity_multiplier: activity_level.multiplier(),
        macro_percentages: goal_macro_percentages(&goals),
        goals,
    })
}

/// Update biometrics, activity level, water goal or the auto-calculate flag.
///
/// With auto-calculate on, the derived goals are recomputed before saving.
pub fn update_goal_profile(
    store: &dyn PersistenceStore,
    update: GoalProfileUpdate,
) -> ToolResult<GoalsResponse> {
    let (mut profile, _) = current_profile(store)?;

    if let Some(weight) = update.weight_kg {
        profile.biometrics.weight_kg = weight;
    }
    if let Some(height) = update.height_cm {
        profile.biometrics.height_cm = height;
    }
    if let Some(age) = update.age_years {
        profile.biometrics.age_years = age;
    }
    if let Some(sex) = update.sex {
        profile.biometrics.sex = sex.parse()?;
    }
    if let Some(level) = update.activity_level {
        profile.activity_level = level.parse()?;
    }
    if let Some(water) = update.water_goal_liters {
        validate_water(water)?;
        profile.goals.water_goal_liters = water;
    }
    if let Some(auto) = update.auto_calculate {
        profile.goals.auto_calculate = auto;
    }

    profile.biometrics.validate()?;
    let profile = profile.with_auto_goals()?;

    save_profile(store, &profile)?;
    Ok(GoalsResponse::new(profile, true))
}

/// Save manually chosen goals.
///
/// Rejected while auto-calculate is on, and when any value is outside the
/// accepted range.
pub fn set_manual_goals(
    store: &dyn PersistenceStore,
    manual: ManualGoals,
) -> ToolResult<GoalsResponse> {
    let (profile, _) = current_profile(store)?;

    if profile.goals.auto_calculate {
        return Err(NutritionError::invalid(
            "goals are auto-calculated; turn off auto_calculate before setting them manually",
        )
        .into());
    }

    let goals = NutritionGoals {
        calorie_goal: manual.calorie_goal,
        protein_goal: manual.protein_goal,
        carb_goal: manual.carb_goal,
        fat_goal: manual.fat_goal,
        fiber_goal: manual.fiber_goal,
        water_goal_liters: manual.water_goal_liters,
        auto_calculate: false,
    };
    goals.validate_manual()?;

    let profile = GoalProfile { goals, ..profile };
    save_profile(store, &profile)?;
    Ok(GoalsResponse::new(profile, true))
}
