//! Meal model
//!
//! A logged meal. Meals are immutable once stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name stored when a meal is logged without one
pub const UNNAMED_MEAL: &str = "Unnamed Meal";

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    pub restaurant: Option<String>,
    pub calories: u32,
    pub protein: Option<u32>, // grams
    pub carbs: Option<u32>,   // grams
    pub fat: Option<u32>,     // grams
    pub fiber: Option<u32>,   // grams
    pub logged_at: DateTime<Utc>,
}

/// Data for logging a meal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealCreate {
    pub name: String,
    pub restaurant: Option<String>,
    pub calories: u32,
    pub protein: Option<u32>,
    pub carbs: Option<u32>,
    pub fat: Option<u32>,
    pub fiber: Option<u32>,
}

impl MealCreate {
    /// Normalise user input before it is stored.
    ///
    /// Blank names become [`UNNAMED_MEAL`]; blank restaurants are dropped.
    pub fn sanitized(self) -> Self {
        let name = self.name.trim();
        let name = if name.is_empty() { UNNAMED_MEAL.to_string() } else { name.to_string() };

        let restaurant = self
            .restaurant
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Self {
            name,
            restaurant,
            ..self
        }
    }

    /// Build the stored meal once an id and timestamp are assigned
    pub fn into_meal(self, id: i64, logged_at: DateTime<Utc>) -> Meal {
        Meal {
            id,
            name: self.name,
            restaurant: self.restaurant,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            logged_at,
        }
    }
}
