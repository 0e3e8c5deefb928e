//! Core error types
//!
//! Errors raised by the goal calculator and model validation. Persistence
//! errors live in [`crate::store`] and [`crate::db`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    /// Malformed biometrics, unknown enum names, or goal values out of range
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NutritionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        NutritionError::InvalidInput(message.into())
    }
}

/// Result type for core calculations
pub type NutritionResult<T> = Result<T, NutritionError>;
