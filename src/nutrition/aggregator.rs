//! Nutrition aggregator
//!
//! Reduces logged meals to daily totals and computes goal progress.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::models::{DailyTotals, Meal, NutritionGoals};
use super::calculator::{MacroSplit, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

/// Sum a set of meals into daily totals.
///
/// The totals do not depend on input order. The returned meal list is
/// sorted most recent first, with ties broken by descending id.
pub fn aggregate(meals: &[Meal]) -> DailyTotals {
    let mut totals = DailyTotals::zero();
    for meal in meals {
        totals.add_meal(meal);
    }

    let mut sorted = meals.to_vec();
    sort_most_recent_first(&mut sorted);
    totals.meals = sorted;

    totals
}

/// Order meals by `logged_at` descending, ties by descending id
pub fn sort_most_recent_first(meals: &mut [Meal]) {
    meals.sort_by(|a, b| {
        b.logged_at
            .cmp(&a.logged_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Percent of goal reached, clamped to `[0, 100]` for progress bars.
///
/// A goal of zero (or less) is defined as 0%.
pub fn progress_percent(current: f64, goal: f64) -> i64 {
    progress_percent_unclamped(current, goal).clamp(0, 100)
}

/// Percent of goal reached with no upper bound ("120% of goal").
///
/// A goal of zero (or less) is defined as 0%.
pub fn progress_percent_unclamped(current: f64, goal: f64) -> i64 {
    if !goal.is_finite() || goal <= 0.0 || !current.is_finite() {
        return 0;
    }
    (current / goal * 100.0).round() as i64
}

/// Amount left before the goal is reached; never negative
pub fn remaining(goal: f64, current: f64) -> f64 {
    (goal - current).max(0.0)
}

/// Earliest UTC instant that can fall on `day` in `tz`.
///
/// Used as the lower bound when loading a day's meals; callers still
/// filter with [`meals_for_day`].
pub fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Local midnight skipped by a DST change; offsets never exceed a day
        None => Utc.from_utc_datetime(&midnight) - Duration::days(1),
    }
}

/// Meals whose `logged_at` falls on `day` in time zone `tz`
pub fn meals_for_day<Tz: TimeZone>(meals: &[Meal], day: NaiveDate, tz: &Tz) -> Vec<Meal> {
    meals
        .iter()
        .filter(|meal| meal.logged_at.with_timezone(tz).date_naive() == day)
        .cloned()
        .collect()
}

/// Progress toward one nutrient goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NutrientProgress {
    pub current: u32,
    pub goal: u32,
    /// Clamped, for progress bars
    pub percent: i64,
    /// Unclamped, for labels
    pub percent_of_goal: i64,
    pub remaining: u32,
}

impl NutrientProgress {
    pub fn new(current: u32, goal: u32) -> Self {
        let (current_f, goal_f) = (f64::from(current), f64::from(goal));
        Self {
            current,
            goal,
            percent: progress_percent(current_f, goal_f),
            percent_of_goal: progress_percent_unclamped(current_f, goal_f),
            remaining: remaining(goal_f, current_f) as u32,
        }
    }
}

/// Per-nutrient progress for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyProgress {
    pub calories: NutrientProgress,
    pub protein: NutrientProgress,
    pub carbs: NutrientProgress,
    pub fat: NutrientProgress,
    pub fiber: NutrientProgress,
}

impl DailyProgress {
    pub fn new(totals: &DailyTotals, goals: &NutritionGoals) -> Self {
        Self {
            calories: NutrientProgress::new(totals.calories, goals.calorie_goal),
            protein: NutrientProgress::new(totals.protein, goals.protein_goal),
            carbs: NutrientProgress::new(totals.carbs, goals.carb_goal),
            fat: NutrientProgress::new(totals.fat, goals.fat_goal),
            fiber: NutrientProgress::new(totals.fiber, goals.fiber_goal),
        }
    }
}

/// Share of consumed calories from each macronutrient.
///
/// All zero when nothing has been eaten.
pub fn macro_energy_split(totals: &DailyTotals) -> MacroSplit {
    if totals.calories == 0 {
        return MacroSplit::default();
    }
    let total = f64::from(totals.calories);
    let share = |grams: u32, kcal_per_g: f64| (f64::from(grams) * kcal_per_g / total * 100.0).round() as i64;

    MacroSplit {
        protein_percent: share(totals.protein, KCAL_PER_G_PROTEIN),
        carb_percent: share(totals.carbs, KCAL_PER_G_CARBS),
        fat_percent: share(totals.fat, KCAL_PER_G_FAT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn meal(id: i64, calories: u32, protein: Option<u32>, fiber: Option<u32>, at: &str) -> Meal {
        Meal {
            id,
            name: format!("Meal {}", id),
            restaurant: None,
            calories,
            protein,
            carbs: Some(calories / 10),
            fat: None,
            fiber,
            logged_at: at.parse().unwrap(),
        }
    }

    fn sample_meals() -> Vec<Meal> {
        vec![
            meal(1, 420, Some(18), Some(2), "2026-03-02T08:15:00Z"),
            meal(2, 450, Some(30), Some(5), "2026-03-02T12:40:00Z"),
            meal(3, 610, None, None, "2026-03-02T19:05:00Z"),
        ]
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate(&[]);
        assert_eq!(totals, DailyTotals::zero());
        assert!(totals.meals.is_empty());
    }

    #[test]
    fn test_aggregate_sums_and_treats_missing_as_zero() {
        let totals = aggregate(&sample_meals());
        assert_eq!(totals.calories, 1480);
        assert_eq!(totals.protein, 48);
        assert_eq!(totals.carbs, 42 + 45 + 61);
        assert_eq!(totals.fat, 0);
        assert_eq!(totals.fiber, 7);
        assert_eq!(totals.meal_count(), 3);
    }

    #[test]
    fn test_aggregate_most_recent_first() {
        let totals = aggregate(&sample_meals());
        let ids: Vec<i64> = totals.meals.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let meals = sample_meals();
        let expected = aggregate(&meals);

        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in permutations {
            let shuffled: Vec<Meal> = order.iter().map(|&i| meals[i].clone()).collect();
            assert_eq!(aggregate(&shuffled), expected);
        }
    }

    #[test]
    fn test_aggregate_ties_broken_by_id() {
        let meals = vec![
            meal(4, 100, None, None, "2026-03-02T12:00:00Z"),
            meal(9, 200, None, None, "2026-03-02T12:00:00Z"),
        ];
        let ids: Vec<i64> = aggregate(&meals).meals.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![9, 4]);
    }

    #[test]
    fn test_progress_zero_goal() {
        assert_eq!(progress_percent(0.0, 0.0), 0);
        assert_eq!(progress_percent(500.0, 0.0), 0);
        assert_eq!(progress_percent_unclamped(500.0, 0.0), 0);
        assert_eq!(progress_percent_unclamped(500.0, -10.0), 0);
    }

    #[test]
    fn test_progress_clamped_and_unclamped() {
        assert_eq!(progress_percent(150.0, 100.0), 100);
        assert_eq!(progress_percent_unclamped(150.0, 100.0), 150);
        assert_eq!(progress_percent(40.0, 100.0), 40);
        assert_eq!(progress_percent(1000.0, 2000.0), 50);
    }

    #[test]
    fn test_remaining() {
        assert_eq!(remaining(100.0, 150.0), 0.0);
        assert_eq!(remaining(100.0, 40.0), 60.0);
        assert_eq!(remaining(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_meals_for_day_respects_time_zone() {
        let meals = vec![
            meal(1, 100, None, None, "2026-03-02T02:00:00Z"), // Mar 1, 21:00 at UTC-5
            meal(2, 200, None, None, "2026-03-02T15:00:00Z"),
            meal(3, 300, None, None, "2026-03-03T04:30:00Z"), // Mar 2, 23:30 at UTC-5
        ];
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        let utc_ids: Vec<i64> = meals_for_day(&meals, day, &Utc).iter().map(|m| m.id).collect();
        assert_eq!(utc_ids, vec![1, 2]);

        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let est_ids: Vec<i64> = meals_for_day(&meals, day, &est).iter().map(|m| m.id).collect();
        assert_eq!(est_ids, vec![2, 3]);
    }

    #[test]
    fn test_start_of_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let expected: DateTime<Utc> = "2026-03-02T05:00:00Z".parse().unwrap();
        assert_eq!(start_of_day(day, &est), expected);
    }

    #[test]
    fn test_daily_progress() {
        let totals = aggregate(&sample_meals());
        let goals = NutritionGoals::default();
        let progress = DailyProgress::new(&totals, &goals);

        assert_eq!(progress.calories.current, 1480);
        assert_eq!(progress.calories.percent, 74);
        assert_eq!(progress.calories.remaining, 520);
        assert_eq!(progress.protein.percent, 40);
        assert_eq!(progress.fiber.remaining, 23);
    }

    #[test]
    fn test_daily_progress_over_goal() {
        let totals = DailyTotals {
            calories: 2400,
            ..DailyTotals::zero()
        };
        let progress = DailyProgress::new(&totals, &NutritionGoals::default());
        assert_eq!(progress.calories.percent, 100);
        assert_eq!(progress.calories.percent_of_goal, 120);
        assert_eq!(progress.calories.remaining, 0);
    }

    #[test]
    fn test_macro_energy_split() {
        let totals = DailyTotals {
            calories: 870,
            protein: 48,
            carbs: 60,
            fat: 47,
            ..DailyTotals::zero()
        };
        let split = macro_energy_split(&totals);
        // 192/870, 240/870, 423/870
        assert_eq!(split.protein_percent, 22);
        assert_eq!(split.carb_percent, 28);
        assert_eq!(split.fat_percent, 49);
    }

    #[test]
    fn test_macro_energy_split_nothing_eaten() {
        assert_eq!(macro_energy_split(&DailyTotals::zero()), MacroSplit::default());
    }
}
