//! Nutrition goals model
//!
//! Daily targets, the persisted goal profile, and the central defaults
//! table used whenever a stored value is missing.

use serde::{Deserialize, Serialize};

use crate::error::{NutritionError, NutritionResult};
use crate::nutrition::compute_goals;
use super::{ActivityLevel, Biometrics, Sex};

/// Values used when nothing (or only part of a record) has been stored.
pub mod defaults {
    use super::{ActivityLevel, Sex};

    pub const CALORIE_GOAL: u32 = 2000;
    pub const PROTEIN_GOAL: u32 = 120;
    pub const CARB_GOAL: u32 = 250;
    pub const FAT_GOAL: u32 = 65;
    pub const FIBER_GOAL: u32 = 30;
    pub const WATER_GOAL_LITERS: f64 = 2.5;
    pub const AUTO_CALCULATE: bool = false;
    pub const ACTIVITY_LEVEL: ActivityLevel = ActivityLevel::Moderate;
    pub const WEIGHT_KG: f64 = 70.0;
    pub const HEIGHT_CM: f64 = 170.0;
    pub const AGE_YEARS: u32 = 30;
    pub const SEX: Sex = Sex::Female;
}

/// Accepted ranges for manually set goals (the dashboard slider bounds)
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const CALORIES: RangeInclusive<u32> = 1200..=4000;
    pub const PROTEIN: RangeInclusive<u32> = 50..=250;
    pub const CARBS: RangeInclusive<u32> = 50..=400;
    pub const FAT: RangeInclusive<u32> = 20..=150;
    pub const FIBER: RangeInclusive<u32> = 10..=50;
    pub const WATER_LITERS: RangeInclusive<f64> = 1.0..=5.0;
}

/// Daily nutrition targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub calorie_goal: u32,
    pub protein_goal: u32,  // grams
    pub carb_goal: u32,     // grams
    pub fat_goal: u32,      // grams
    pub fiber_goal: u32,    // grams
    pub water_goal_liters: f64,
    pub auto_calculate: bool,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calorie_goal: defaults::CALORIE_GOAL,
            protein_goal: defaults::PROTEIN_GOAL,
            carb_goal: defaults::CARB_GOAL,
            fat_goal: defaults::FAT_GOAL,
            fiber_goal: defaults::FIBER_GOAL,
            water_goal_liters: defaults::WATER_GOAL_LITERS,
            auto_calculate: defaults::AUTO_CALCULATE,
        }
    }
}

impl NutritionGoals {
    /// Re-derive calorie, macro and fiber goals, keeping the user's water goal
    pub fn recalculated(&self, biometrics: &Biometrics, activity_level: ActivityLevel) -> NutritionResult<Self> {
        let derived = compute_goals(biometrics, activity_level)?;
        Ok(Self {
            water_goal_liters: self.water_goal_liters,
            ..derived
        })
    }

    /// Check a manual edit against the accepted ranges.
    ///
    /// Out-of-range values are rejected, not clamped.
    pub fn validate_manual(&self) -> NutritionResult<()> {
        check_range("calorie goal", self.calorie_goal, &ranges::CALORIES)?;
        check_range("protein goal", self.protein_goal, &ranges::PROTEIN)?;
        check_range("carb goal", self.carb_goal, &ranges::CARBS)?;
        check_range("fat goal", self.fat_goal, &ranges::FAT)?;
        check_range("fiber goal", self.fiber_goal, &ranges::FIBER)?;
        validate_water(self.water_goal_liters)
    }
}

fn check_range(field: &str, value: u32, range: &std::ops::RangeInclusive<u32>) -> NutritionResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(NutritionError::invalid(format!(
            "{} must be between {} and {}, got {}",
            field,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Water is always user-set, so it is checked in both modes
pub fn validate_water(liters: f64) -> NutritionResult<()> {
    if liters.is_finite() && ranges::WATER_LITERS.contains(&liters) {
        Ok(())
    } else {
        Err(NutritionError::invalid(format!(
            "water goal must be between {} and {} liters, got {}",
            ranges::WATER_LITERS.start(),
            ranges::WATER_LITERS.end(),
            liters
        )))
    }
}

/// Goals together with the inputs they are derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProfile {
    pub goals: NutritionGoals,
    pub activity_level: ActivityLevel,
    pub biometrics: Biometrics,
}

impl Default for GoalProfile {
    fn default() -> Self {
        Self {
            goals: NutritionGoals::default(),
            activity_level: defaults::ACTIVITY_LEVEL,
            biometrics: Biometrics {
                weight_kg: defaults::WEIGHT_KG,
                height_cm: defaults::HEIGHT_CM,
                age_years: defaults::AGE_YEARS,
                sex: defaults::SEX,
            },
        }
    }
}

impl GoalProfile {
    /// Enforce the auto-calculate invariant.
    ///
    /// With auto-calculate on, the derived goals always match the current
    /// biometrics and activity level. Manual profiles are returned unchanged.
    pub fn with_auto_goals(self) -> NutritionResult<Self> {
        if !self.goals.auto_calculate {
            return Ok(self);
        }
        let goals = self.goals.recalculated(&self.biometrics, self.activity_level)?;
        Ok(Self { goals, ..self })
    }
}

/// Storage shape of a goal profile; every column may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalProfileRecord {
    pub calorie_goal: Option<u32>,
    pub protein_goal: Option<u32>,
    pub carb_goal: Option<u32>,
    pub fat_goal: Option<u32>,
    pub fiber_goal: Option<u32>,
    pub water_goal: Option<f64>,
    pub auto_calculate: Option<bool>,
    pub activity_level: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<u32>,
    pub sex: Option<String>,
}

impl GoalProfileRecord {
    /// Fill missing fields from [`defaults`] and validate the rest.
    ///
    /// Present but unrecognised activity levels or sexes are errors; only a
    /// missing value falls back to its default.
    pub fn into_profile(self) -> NutritionResult<GoalProfile> {
        let activity_level = match self.activity_level {
            Some(s) => s.parse()?,
            None => defaults::ACTIVITY_LEVEL,
        };
        let sex = match self.sex {
            Some(s) => s.parse()?,
            None => defaults::SEX,
        };
        let biometrics = Biometrics::new(
            self.weight.unwrap_or(defaults::WEIGHT_KG),
            self.height.unwrap_or(defaults::HEIGHT_CM),
            self.age.unwrap_or(defaults::AGE_YEARS),
            sex,
        )?;

        let profile = GoalProfile {
            goals: NutritionGoals {
                calorie_goal: self.calorie_goal.unwrap_or(defaults::CALORIE_GOAL),
                protein_goal: self.protein_goal.unwrap_or(defaults::PROTEIN_GOAL),
                carb_goal: self.carb_goal.unwrap_or(defaults::CARB_GOAL),
                fat_goal: self.fat_goal.unwrap_or(defaults::FAT_GOAL),
                fiber_goal: self.fiber_goal.unwrap_or(defaults::FIBER_GOAL),
                water_goal_liters: self.water_goal.unwrap_or(defaults::WATER_GOAL_LITERS),
                auto_calculate: self.auto_calculate.unwrap_or(defaults::AUTO_CALCULATE),
            },
            activity_level,
            biometrics,
        };

        profile.with_auto_goals()
    }
}

impl From<&GoalProfile> for GoalProfileRecord {
    fn from(profile: &GoalProfile) -> Self {
        Self {
            calorie_goal: Some(profile.goals.calorie_goal),
            protein_goal: Some(profile.goals.protein_goal),
            carb_goal: Some(profile.goals.carb_goal),
            fat_goal: Some(profile.goals.fat_goal),
            fiber_goal: Some(profile.goals.fiber_goal),
            water_goal: Some(profile.goals.water_goal_liters),
            auto_calculate: Some(profile.goals.auto_calculate),
            activity_level: Some(profile.activity_level.as_str().to_string()),
            weight: Some(profile.biometrics.weight_kg),
            height: Some(profile.biometrics.height_cm),
            age: Some(profile.biometrics.age_years),
            sex: Some(profile.biometrics.sex.as_str().to_string()),
        }
    }
}
