//! In-memory store
//!
//! Used when no database is configured. Nothing survives a restart.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::models::{ActivityLevel, Biometrics, GoalProfile, Meal, MealCreate, NutritionGoals, Sex};
use crate::nutrition::sort_most_recent_first;
use super::{PersistenceStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    goals: Option<GoalProfile>,
    meals: Vec<Meal>,
    next_id: i64,
}

/// Goals and meals held behind a mutex
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with a manual profile and two meals logged now
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let now = Utc::now();

        let profile = GoalProfile {
            goals: NutritionGoals {
                calorie_goal: 2000,
                protein_goal: 120,
                carb_goal: 250,
                fat_goal: 65,
                fiber_goal: 30,
                water_goal_liters: 2.5,
                auto_calculate: false,
            },
            activity_level: ActivityLevel::Moderate,
            biometrics: Biometrics {
                weight_kg: 70.0,
                height_cm: 170.0,
                age_years: 30,
                sex: Sex::Female,
            },
        };

        let meals = [
            MealCreate {
                name: "Breakfast Sandwich".to_string(),
                restaurant: Some("Starbucks".to_string()),
                calories: 420,
                protein: Some(18),
                carbs: Some(40),
                fat: Some(22),
                fiber: Some(2),
            },
            MealCreate {
                name: "Chicken Caesar Salad".to_string(),
                restaurant: Some("Sweetgreen".to_string()),
                calories: 450,
                protein: Some(30),
                carbs: Some(20),
                fat: Some(25),
                fiber: Some(5),
            },
        ];

        if let Ok(mut state) = store.state.lock() {
            state.goals = Some(profile);
            for meal in meals {
                state.insert(meal, now);
            }
        }

        store
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl MemoryState {
    fn insert(&mut self, meal: MealCreate, logged_at: DateTime<Utc>) -> Meal {
        self.next_id += 1;
        let meal = meal.sanitized().into_meal(self.next_id, logged_at);
        self.meals.push(meal.clone());
        meal
    }
}

impl PersistenceStore for MemoryStore {
    fn load_goals(&self) -> StoreResult<Option<GoalProfile>> {
        let state = self.lock()?;
        match &state.goals {
            Some(profile) => Ok(Some(profile.clone().with_auto_goals()?)),
            None => Ok(None),
        }
    }

    fn save_goals(&self, profile: &GoalProfile) -> StoreResult<()> {
        self.lock()?.goals = Some(profile.clone());
        Ok(())
    }

    fn load_meals_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<Meal>> {
        let state = self.lock()?;
        let mut meals: Vec<Meal> = state
            .meals
            .iter()
            .filter(|m| m.logged_at >= since)
            .cloned()
            .collect();
        sort_most_recent_first(&mut meals);
        Ok(meals)
    }

    fn load_recent_meals(&self, limit: usize) -> StoreResult<Vec<Meal>> {
        let state = self.lock()?;
        let mut meals = state.meals.clone();
        sort_most_recent_first(&mut meals);
        meals.truncate(limit);
        Ok(meals)
    }

    fn save_meal(&self, meal: &MealCreate, logged_at: DateTime<Utc>) -> StoreResult<Meal> {
        Ok(self.lock()?.insert(meal.clone(), logged_at))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNNAMED_MEAL;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn meal(name: &str, calories: u32) -> MealCreate {
        MealCreate {
            name: name.to_string(),
            calories,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.load_goals().unwrap(), None);
        assert!(store.load_recent_meals(10).unwrap().is_empty());
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn test_demo_data() {
        let store = MemoryStore::with_demo_data();
        let profile = store.load_goals().unwrap().unwrap();
        assert_eq!(profile.goals.calorie_goal, 2000);
        assert!(!profile.goals.auto_calculate);

        let meals = store.load_recent_meals(10).unwrap();
        assert_eq!(meals.len(), 2);
        let total: u32 = meals.iter().map(|m| m.calories).sum();
        assert_eq!(total, 870);
        // Same timestamp, so the later id comes first
        assert_eq!(meals[0].name, "Chicken Caesar Salad");
    }

    #[test]
    fn test_save_and_load_goals() {
        let store = MemoryStore::new();
        let profile = GoalProfile {
            activity_level: ActivityLevel::Sedentary,
            ..Default::default()
        };
        store.save_goals(&profile).unwrap();
        assert_eq!(store.load_goals().unwrap(), Some(profile));
    }

    #[test]
    fn test_auto_profile_rederived_on_load() {
        let store = MemoryStore::new();
        let mut profile = GoalProfile::default();
        profile.goals.auto_calculate = true;
        profile.goals.calorie_goal = 1234;
        store.save_goals(&profile).unwrap();

        let loaded = store.load_goals().unwrap().unwrap();
        assert_ne!(loaded.goals.calorie_goal, 1234);
        assert_eq!(loaded.goals.water_goal_liters, profile.goals.water_goal_liters);
    }

    #[test]
    fn test_meals_since_and_ordering() {
        let store = MemoryStore::new();
        store.save_meal(&meal("Old", 900), at("2026-03-01T19:00:00Z")).unwrap();
        let late = store.save_meal(&meal("Dinner", 700), at("2026-03-02T19:00:00Z")).unwrap();
        let early = store.save_meal(&meal("Breakfast", 300), at("2026-03-02T07:00:00Z")).unwrap();

        let meals = store.load_meals_since(at("2026-03-02T00:00:00Z")).unwrap();
        assert_eq!(meals, vec![late, early]);
    }

    #[test]
    fn test_recent_meals_limit() {
        let store = MemoryStore::new();
        for hour in 1..=4 {
            store
                .save_meal(&meal(&format!("Snack {}", hour), 100), at(&format!("2026-03-02T0{}:00:00Z", hour)))
                .unwrap();
        }
        let meals = store.load_recent_meals(2).unwrap();
        let names: Vec<&str> = meals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Snack 4", "Snack 3"]);
    }

    #[test]
    fn test_save_meal_sanitizes() {
        let store = MemoryStore::new();
        let saved = store.save_meal(&meal("", 150), Utc::now()).unwrap();
        assert_eq!(saved.name, UNNAMED_MEAL);
        assert_eq!(saved.id, 1);
    }
}
