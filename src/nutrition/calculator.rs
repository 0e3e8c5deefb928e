//! Goal calculator
//!
//! Derives daily calorie, macro and fiber goals from biometrics using the
//! Mifflin-St Jeor equation and a fixed 30/45/25 macro split.

use serde::Serialize;

use crate::error::{NutritionError, NutritionResult};
use crate::models::{defaults, ActivityLevel, Biometrics, NutritionGoals, Sex};

/// Share of calories allocated to protein
pub const PROTEIN_RATIO: f64 = 0.30;
/// Share of calories allocated to carbohydrates
pub const CARB_RATIO: f64 = 0.45;
/// Share of calories allocated to fat
pub const FAT_RATIO: f64 = 0.25;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Recommended grams of fiber per 1000 kcal
pub const FIBER_G_PER_1000_KCAL: u32 = 14;

/// Gram targets for the three macronutrients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroGrams {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Percent of energy from each macronutrient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MacroSplit {
    pub protein_percent: i64,
    pub carb_percent: i64,
    pub fat_percent: i64,
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor)
pub fn bmr(biometrics: &Biometrics) -> NutritionResult<f64> {
    biometrics.validate()?;

    let base = 10.0 * biometrics.weight_kg + 6.25 * biometrics.height_cm
        - 5.0 * f64::from(biometrics.age_years);

    Ok(match biometrics.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    })
}

/// Total daily energy expenditure, rounded to whole kcal
pub fn tdee(biometrics: &Biometrics, activity_level: ActivityLevel) -> NutritionResult<u32> {
    energy_expenditure(bmr(biometrics)?, activity_level)
}

/// Scale a BMR by the activity multiplier and round to whole kcal
pub fn energy_expenditure(bmr: f64, activity_level: ActivityLevel) -> NutritionResult<u32> {
    let expenditure = (bmr * activity_level.multiplier()).round();

    // Only reachable with extreme inputs (e.g. very low weight at high age)
    if expenditure < 1.0 {
        return Err(NutritionError::invalid(format!(
            "biometrics produce a non-positive energy expenditure ({} kcal)",
            expenditure
        )));
    }
    if !expenditure.is_finite() || expenditure > f64::from(u32::MAX) {
        return Err(NutritionError::invalid(format!(
            "biometrics produce an energy expenditure too large to represent ({} kcal)",
            expenditure
        )));
    }

    Ok(expenditure as u32)
}

/// Split a calorie target into gram targets.
///
/// Each macro is rounded on its own, so the grams converted back to kcal
/// need not add up to exactly `calories`.
pub fn macro_split(calories: u32) -> MacroGrams {
    let kcal = f64::from(calories);
    MacroGrams {
        protein: (kcal * PROTEIN_RATIO / KCAL_PER_G_PROTEIN).round() as u32,
        carbs: (kcal * CARB_RATIO / KCAL_PER_G_CARBS).round() as u32,
        fat: (kcal * FAT_RATIO / KCAL_PER_G_FAT).round() as u32,
    }
}

/// Fiber target: whole thousands of kcal (rounded) times 14 g
pub fn fiber_goal(calories: u32) -> u32 {
    let thousands = (f64::from(calories) / 1000.0).round() as u32;
    thousands * FIBER_G_PER_1000_KCAL
}

/// Derive a full set of goals from biometrics and activity level.
///
/// The water goal is not derived and is set to the default; use
/// [`NutritionGoals::recalculated`] to keep an existing one.
pub fn compute_goals(biometrics: &Biometrics, activity_level: ActivityLevel) -> NutritionResult<NutritionGoals> {
    let calorie_goal = tdee(biometrics, activity_level)?;
    let macros = macro_split(calorie_goal);

    Ok(NutritionGoals {
        calorie_goal,
        protein_goal: macros.protein,
        carb_goal: macros.carbs,
        fat_goal: macros.fat,
        fiber_goal: fiber_goal(calorie_goal),
        water_goal_liters: defaults::WATER_GOAL_LITERS,
        auto_calculate: true,
    })
}

/// Share of the calorie goal covered by each macro goal
pub fn goal_macro_percentages(goals: &NutritionGoals) -> MacroSplit {
    if goals.calorie_goal == 0 {
        return MacroSplit::default();
    }
    let total = f64::from(goals.calorie_goal);
    let share = |grams: u32, kcal_per_g: f64| (f64::from(grams) * kcal_per_g / total * 100.0).round() as i64;

    MacroSplit {
        protein_percent: share(goals.protein_goal, KCAL_PER_G_PROTEIN),
        carb_percent: share(goals.carb_goal, KCAL_PER_G_CARBS),
        fat_percent: share(goals.fat_goal, KCAL_PER_G_FAT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male_70_170_30() -> Biometrics {
        Biometrics::new(70.0, 170.0, 30, Sex::Male).unwrap()
    }

    fn female_60_165_25() -> Biometrics {
        Biometrics::new(60.0, 165.0, 25, Sex::Female).unwrap()
    }

    #[test]
    fn test_bmr_male() {
        // 700 + 1062.5 - 150 + 5
        assert!((bmr(&male_70_170_30()).unwrap() - 1617.5).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_female() {
        // 600 + 1031.25 - 125 - 161
        assert!((bmr(&female_60_165_25()).unwrap() - 1345.25).abs() < 1e-9);
    }

    #[test]
    fn test_tdee_male_moderate() {
        // 1617.5 * 1.55 = 2507.125
        assert_eq!(tdee(&male_70_170_30(), ActivityLevel::Moderate).unwrap(), 2507);
    }

    #[test]
    fn test_tdee_female_sedentary() {
        // 1345.25 * 1.2 = 1614.3
        assert_eq!(tdee(&female_60_165_25(), ActivityLevel::Sedentary).unwrap(), 1614);
    }

    #[test]
    fn test_energy_expenditure_from_bmr() {
        // 1527.5 * 1.55 = 2367.625, 645.25 * 1.2 = 774.3
        assert_eq!(energy_expenditure(1527.5, ActivityLevel::Moderate).unwrap(), 2368);
        assert_eq!(energy_expenditure(645.25, ActivityLevel::Sedentary).unwrap(), 774);
        assert!(energy_expenditure(-10.0, ActivityLevel::Active).is_err());
    }

    #[test]
    fn test_tdee_scales_with_activity() {
        let bio = male_70_170_30();
        let values: Vec<u32> = ActivityLevel::ALL
            .iter()
            .map(|level| tdee(&bio, *level).unwrap())
            .collect();
        assert_eq!(values, vec![1941, 2224, 2507, 2790, 3073]);
    }

    #[test]
    fn test_macro_split_2368() {
        let macros = macro_split(2368);
        assert_eq!(macros.protein, 178);
        assert_eq!(macros.carbs, 266);
        assert_eq!(macros.fat, 66);
    }

    #[test]
    fn test_fiber_goal() {
        assert_eq!(fiber_goal(2368), 28);
        assert_eq!(fiber_goal(2500), 42); // 2.5 rounds up
        assert_eq!(fiber_goal(1499), 14);
        assert_eq!(fiber_goal(400), 0);
    }

    #[test]
    fn test_compute_goals_male_moderate() {
        let goals = compute_goals(&male_70_170_30(), ActivityLevel::Moderate).unwrap();
        assert_eq!(goals.calorie_goal, 2507);
        assert_eq!(goals.protein_goal, 188);
        assert_eq!(goals.carb_goal, 282);
        assert_eq!(goals.fat_goal, 70);
        assert_eq!(goals.fiber_goal, 42);
        assert_eq!(goals.water_goal_liters, defaults::WATER_GOAL_LITERS);
        assert!(goals.auto_calculate);
    }

    #[test]
    fn test_compute_goals_is_deterministic() {
        let bio = female_60_165_25();
        for level in ActivityLevel::ALL {
            let a = compute_goals(&bio, level).unwrap();
            let b = compute_goals(&bio, level).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_compute_goals_rejects_invalid_biometrics() {
        let bad = Biometrics {
            weight_kg: 0.0,
            height_cm: 170.0,
            age_years: 30,
            sex: Sex::Male,
        };
        let err = compute_goals(&bad, ActivityLevel::Light).unwrap_err();
        assert!(matches!(err, NutritionError::InvalidInput(_)));

        let no_age = Biometrics { age_years: 0, ..male_70_170_30() };
        assert!(compute_goals(&no_age, ActivityLevel::Light).is_err());
    }

    #[test]
    fn test_compute_goals_rejects_non_positive_expenditure() {
        // 10*1 + 6.25*10 - 5*120 - 161 < 0
        let bio = Biometrics::new(1.0, 10.0, 120, Sex::Female).unwrap();
        assert!(matches!(
            compute_goals(&bio, ActivityLevel::Sedentary),
            Err(NutritionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_compute_goals_rejects_overflowing_expenditure() {
        let bio = Biometrics::new(1e12, 170.0, 30, Sex::Male).unwrap();
        assert!(matches!(
            compute_goals(&bio, ActivityLevel::Moderate),
            Err(NutritionError::InvalidInput(_))
        ));
        assert!(energy_expenditure(f64::from(u32::MAX), ActivityLevel::VeryActive).is_err());
        assert!(energy_expenditure(f64::MAX, ActivityLevel::Sedentary).is_err());
    }

    #[test]
    fn test_recalculated_keeps_water() {
        let current = NutritionGoals {
            water_goal_liters: 3.4,
            ..Default::default()
        };
        let goals = current
            .recalculated(&male_70_170_30(), ActivityLevel::Moderate)
            .unwrap();
        assert_eq!(goals.calorie_goal, 2507);
        assert_eq!(goals.water_goal_liters, 3.4);
        assert!(goals.auto_calculate);
    }

    #[test]
    fn test_goal_macro_percentages() {
        let goals = compute_goals(&male_70_170_30(), ActivityLevel::Moderate).unwrap();
        let split = goal_macro_percentages(&goals);
        // 188*4/2507 = 30.00%, 282*4/2507 = 44.99%, 70*9/2507 = 25.13%
        assert_eq!(split.protein_percent, 30);
        assert_eq!(split.carb_percent, 45);
        assert_eq!(split.fat_percent, 25);
    }

    #[test]
    fn test_goal_macro_percentages_zero_calories() {
        let goals = NutritionGoals {
            calorie_goal: 0,
            ..Default::default()
        };
        assert_eq!(goal_macro_percentages(&goals), MacroSplit::default());
    }
}
