//! Daily nutrition totals
//!
//! Derived from the meals logged on a day; never stored.

use serde::{Deserialize, Serialize};

use super::Meal;

/// Summed nutrition for a set of meals, with the meals themselves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub calories: u32,
    pub protein: u32, // grams
    pub carbs: u32,   // grams
    pub fat: u32,     // grams
    pub fiber: u32,   // grams
    /// Most recent first
    pub meals: Vec<Meal>,
}

impl DailyTotals {
    /// Create totals with all zeros and no meals
    pub fn zero() -> Self {
        Self::default()
    }

    /// Add one meal's values. Missing macros count as zero.
    pub fn add_meal(&mut self, meal: &Meal) {
        self.calories = self.calories.saturating_add(meal.calories);
        self.protein = self.protein.saturating_add(meal.protein.unwrap_or(0));
        self.carbs = self.carbs.saturating_add(meal.carbs.unwrap_or(0));
        self.fat = self.fat.saturating_add(meal.fat.unwrap_or(0));
        self.fiber = self.fiber.saturating_add(meal.fiber.unwrap_or(0));
    }

    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_add_meal_missing_fields_are_zero() {
        let mut totals = DailyTotals::zero();
        totals.add_meal(&Meal {
            id: 1,
            name: "Coffee".to_string(),
            restaurant: None,
            calories: 5,
            protein: None,
            carbs: None,
            fat: None,
            fiber: None,
            logged_at: Utc::now(),
        });
        assert_eq!(totals.calories, 5);
        assert_eq!(totals.protein, 0);
        assert_eq!(totals.fiber, 0);
        // add_meal only sums; the meal list is owned by the aggregator
        assert_eq!(totals.meal_count(), 0);
    }
}
