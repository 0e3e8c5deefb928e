//! Data models
//!
//! Plain records exchanged between the calculator, aggregator and stores.

mod biometrics;
mod goals;
mod meal;
mod nutrition;

pub use biometrics::{ActivityLevel, Biometrics, Sex};
pub use goals::{defaults, ranges, validate_water, GoalProfile, GoalProfileRecord, NutritionGoals};
pub use meal::{Meal, MealCreate, UNNAMED_MEAL};
pub use nutrition::DailyTotals;
