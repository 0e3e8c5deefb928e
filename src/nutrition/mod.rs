//! Nutrition calculation module
//!
//! Goal derivation and daily aggregation. Everything here is pure.

pub mod aggregator;
pub mod calculator;

pub use aggregator::{
    aggregate, macro_energy_split, meals_for_day, progress_percent, progress_percent_unclamped,
    remaining, sort_most_recent_first, start_of_day, DailyProgress, NutrientProgress,
};
pub use calculator::{
    bmr, compute_goals, energy_expenditure, fiber_goal, goal_macro_percentages, macro_split, tdee,
    MacroGrams, MacroSplit,
};
