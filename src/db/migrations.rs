//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    tracing::debug!(version = SCHEMA_VERSION, "Database schema up to date");
    Ok(())
}

/// Migration v1: goal profile and meal log
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER GOALS
        -- Single row (id = 1). Columns are nullable;
        -- missing values fall back to the defaults table.
        -- ============================================
        CREATE TABLE user_goals (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            calorie_goal INTEGER,
            protein_goal INTEGER,                -- grams
            carb_goal INTEGER,                   -- grams
            fat_goal INTEGER,                    -- grams
            fiber_goal INTEGER,                  -- grams
            water_goal REAL,                     -- liters
            auto_calculate INTEGER,              -- boolean
            activity_level TEXT,                 -- sedentary | light | moderate | active | veryActive
            weight REAL,                         -- kilograms
            height REAL,                         -- centimeters
            age INTEGER,                         -- years
            sex TEXT,                            -- male | female
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- USER MEALS
        -- Immutable log of meals
        -- ============================================
        CREATE TABLE user_meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            restaurant TEXT,
            calories INTEGER NOT NULL DEFAULT 0 CHECK (calories >= 0),
            protein INTEGER CHECK (protein >= 0),
            carbs INTEGER CHECK (carbs >= 0),
            fat INTEGER CHECK (fat >= 0),
            fiber INTEGER CHECK (fiber >= 0),
            logged_at TEXT NOT NULL,             -- RFC 3339 UTC, fixed width
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_user_meals_logged_at ON user_meals(logged_at);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_goals_table_is_single_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO user_goals (id) VALUES (1)", []).unwrap();
        assert!(conn.execute("INSERT INTO user_goals (id) VALUES (2)", []).is_err());
    }

    #[test]
    fn test_negative_calories_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO user_meals (name, calories, logged_at) VALUES ('x', -5, '2026-01-01T00:00:00.000000Z')",
            [],
        );
        assert!(result.is_err());
    }
}
