//! Nutritrack Status Tool
//!
//! Provides runtime status information about the nutritrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::{AppConfig, StoreBackend};

/// Goal setting and meal logging instructions for AI assistants
pub const GOAL_INSTRUCTIONS: &str = r#"
# Nutritrack Instructions

Nutritrack keeps one user's daily nutrition goals and a log of meals eaten.

## Goals

Goals are either **auto-calculated** from biometrics or **set manually**.

### Auto-calculated goals

Call `update_goal_profile` with `auto_calculate: true` plus any of
`weight_kg`, `height_cm`, `age_years`, `sex` (`male` | `female`) and
`activity_level`. Goals are derived as follows:

1. BMR (Mifflin-St Jeor)
   - male: 10 × weight + 6.25 × height − 5 × age + 5
   - female: 10 × weight + 6.25 × height − 5 × age − 161
2. Calories = round(BMR × activity multiplier)

| activity_level | multiplier |
|----------------|------------|
| sedentary      | 1.2        |
| light          | 1.375      |
| moderate       | 1.55       |
| active         | 1.725      |
| veryActive     | 1.9        |

3. Macros: 30% protein, 45% carbs, 25% fat of calories
   (4 kcal/g protein and carbs, 9 kcal/g fat), each rounded on its own
4. Fiber = round(calories / 1000) × 14 grams

Use `calculate_goals` to preview the result without saving anything.

### Manual goals

Call `set_manual_goals`. This is rejected while auto-calculate is on; turn it
off first with `update_goal_profile` (`auto_calculate: false`).

Accepted ranges:

| goal     | min  | max  |
|----------|------|------|
| calories | 1200 | 4000 |
| protein  | 50   | 250  |
| carbs    | 50   | 400  |
| fat      | 20   | 150  |
| fiber    | 10   | 50   |
| water L  | 1.0  | 5.0  |

Out-of-range values are rejected, never clamped.

## Meals

`log_meal` records a meal with calories and optional protein, carbs, fat and
fiber in grams. A blank name is stored as "Unnamed Meal". Meals cannot be
edited or deleted.

`get_daily_summary` returns today's totals, progress towards each goal
(bar percentage capped at 100, plus the uncapped percentage), the amount
remaining, and the share of calories from each macro.

## Notes

- Missing goal values fall back to 2000 kcal, 120 g protein, 250 g carbs,
  65 g fat, 30 g fiber and 2.5 L water.
- "Today" is the server's local calendar day.
"#;

/// Runtime status of the nutritrack service
#[derive(Debug, Clone, Serialize)]
pub struct NutritrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub build_profile: &'static str,

    /// Store information
    pub store_backend: &'static str,
    pub database_path: Option<String>,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    store_backend: &'static str,
    database_path: Option<PathBuf>,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(config: &AppConfig, store_backend: &'static str) -> Self {
        let database_path = match config.store {
            StoreBackend::Sqlite => Some(config.database_path.clone()),
            StoreBackend::Memory => None,
        };

        Self {
            start_time: Instant::now(),
            store_backend,
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NutritrackStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = self
            .database_path
            .as_ref()
            .and_then(|path| std::fs::metadata(path).ok())
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutritrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            build_profile: build_info.profile,
            store_backend: self.store_backend,
            database_path: self.database_path.as_ref().map(|p| p.display().to_string()),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
