//! Persistence layer
//!
//! The [`PersistenceStore`] trait is the only way the rest of the crate
//! loads or saves goals and meals. A store is built once from
//! [`AppConfig`](crate::config::AppConfig) and passed around explicitly.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::{AppConfig, StoreBackend};
use crate::db::{Database, DbError};
use crate::error::NutritionError;
use crate::models::{GoalProfile, Meal, MealCreate};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Number of meals returned by a recent-meals listing when no limit is given
pub const DEFAULT_RECENT_MEALS_LIMIT: usize = 10;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Stored data is invalid: {0}")]
    Invalid(#[from] NutritionError),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Db(DbError::Sqlite(e))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Load/save collaborator for goals and meals
pub trait PersistenceStore: Send + Sync {
    /// Load the saved goal profile, or `None` if nothing has been saved
    fn load_goals(&self) -> StoreResult<Option<GoalProfile>>;

    /// Insert or replace the goal profile
    fn save_goals(&self, profile: &GoalProfile) -> StoreResult<()>;

    /// Meals logged at or after `since`, most recent first
    fn load_meals_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<Meal>>;

    /// The `limit` most recent meals, most recent first
    fn load_recent_meals(&self, limit: usize) -> StoreResult<Vec<Meal>>;

    /// Sanitize and store a meal, returning it with its assigned id
    fn save_meal(&self, meal: &MealCreate, logged_at: DateTime<Utc>) -> StoreResult<Meal>;

    /// Short backend name for status output
    fn backend_name(&self) -> &'static str;
}

/// Build the store selected by the configuration
pub fn open_store(config: &AppConfig) -> StoreResult<Arc<dyn PersistenceStore>> {
    match config.store {
        StoreBackend::Sqlite => {
            if let Some(parent) = config.database_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let database = Database::new(&config.database_path)?;
            let store = SqliteStore::new(database)?;
            tracing::info!(path = %config.database_path.display(), "Using SQLite store");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("No database configured. Using in-memory store with demo data; nothing will be persisted.");
            Ok(Arc::new(MemoryStore::with_demo_data()))
        }
    }
}
