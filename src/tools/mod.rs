//! Nutritrack Tools module
//!
//! Tool implementations called by the MCP server. Each takes the store
//! explicitly and returns a serializable response or a [`ToolError`].

pub mod goals;
pub mod meals;
pub mod status;

use thiserror::Error;

use crate::error::NutritionError;

/// Tool failure, split so callers can tell bad input from a broken store
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    InvalidInput(#[from] NutritionError),

    #[error("{0}")]
    Store(String),
}

impl ToolError {
    pub fn store(context: &str, e: impl std::fmt::Display) -> Self {
        ToolError::Store(format!("{}: {}", context, e))
    }
}

/// Result type for tool functions
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_messages() {
        let invalid = ToolError::from(NutritionError::invalid("fat goal too high"));
        assert_eq!(invalid.to_string(), "Invalid input: fat goal too high");

        let store = ToolError::store("Failed to save goals", "disk full");
        assert_eq!(store.to_string(), "Failed to save goals: disk full");
    }
}
