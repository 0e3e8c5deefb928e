//! SQLite-backed store
//!
//! Goals live in a single-row `user_goals` table; meals in `user_meals`.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};

use crate::db::{migrations, Database};
use crate::models::{GoalProfile, GoalProfileRecord, Meal, MealCreate};
use super::{PersistenceStore, StoreResult};

/// Persistence over an r2d2 SQLite pool
#[derive(Clone)]
pub struct SqliteStore {
    database: Database,
}

impl SqliteStore {
    /// Wrap a pool, running migrations first
    pub fn new(database: Database) -> StoreResult<Self> {
        database.with_conn(migrations::run_migrations)?;
        Ok(Self { database })
    }
}

/// Fixed-width RFC 3339 so stored timestamps compare correctly as text
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn goal_record_from_row(row: &Row) -> rusqlite::Result<GoalProfileRecord> {
    Ok(GoalProfileRecord {
        calorie_goal: row.get("calorie_goal")?,
        protein_goal: row.get("protein_goal")?,
        carb_goal: row.get("carb_goal")?,
        fat_goal: row.get("fat_goal")?,
        fiber_goal: row.get("fiber_goal")?,
        water_goal: row.get("water_goal")?,
        auto_calculate: row.get("auto_calculate")?,
        activity_level: row.get("activity_level")?,
        weight: row.get("weight")?,
        height: row.get("height")?,
        age: row.get("age")?,
        sex: row.get("sex")?,
    })
}

fn meal_from_row(row: &Row) -> rusqlite::Result<Meal> {
    let logged_at: String = row.get("logged_at")?;
    let logged_at = DateTime::parse_from_rfc3339(&logged_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Meal {
        id: row.get("id")?,
        name: row.get("name")?,
        restaurant: row.get("restaurant")?,
        calories: row.get("calories")?,
        protein: row.get("protein")?,
        carbs: row.get("carbs")?,
        fat: row.get("fat")?,
        fiber: row.get("fiber")?,
        logged_at,
    })
}

impl PersistenceStore for SqliteStore {
    fn load_goals(&self) -> StoreResult<Option<GoalProfile>> {
        let conn = self.database.get_conn()?;
        let mut stmt = conn.prepare("SELECT * FROM user_goals WHERE id = 1")?;

        let record = match stmt.query_row([], goal_record_from_row) {
            Ok(record) => record,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Loaded goal profile from SQLite");
        Ok(Some(record.into_profile()?))
    }

    fn save_goals(&self, profile: &GoalProfile) -> StoreResult<()> {
        let record = GoalProfileRecord::from(profile);
        let conn = self.database.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO user_goals (
                id, calorie_goal, protein_goal, carb_goal, fat_goal, fiber_goal,
                water_goal, auto_calculate, activity_level, weight, height, age, sex
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                calorie_goal = excluded.calorie_goal,
                protein_goal = excluded.protein_goal,
                carb_goal = excluded.carb_goal,
                fat_goal = excluded.fat_goal,
                fiber_goal = excluded.fiber_goal,
                water_goal = excluded.water_goal,
                auto_calculate = excluded.auto_calculate,
                activity_level = excluded.activity_level,
                weight = excluded.weight,
                height = excluded.height,
                age = excluded.age,
                sex = excluded.sex,
                updated_at = datetime('now')
            "#,
            params![
                record.calorie_goal,
                record.protein_goal,
                record.carb_goal,
                record.fat_goal,
                record.fiber_goal,
                record.water_goal,
                record.auto_calculate,
                record.activity_level,
                record.weight,
                record.height,
                record.age,
                record.sex,
            ],
        )?;

        Ok(())
    }

    fn load_meals_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<Meal>> {
        let conn = self.database.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM user_meals WHERE logged_at >= ?1 ORDER BY logged_at DESC, id DESC",
        )?;

        let meals = stmt
            .query_map([format_timestamp(&since)], meal_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    fn load_recent_meals(&self, limit: usize) -> StoreResult<Vec<Meal>> {
        let conn = self.database.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM user_meals ORDER BY logged_at DESC, id DESC LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let meals = stmt
            .query_map([limit], meal_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    fn save_meal(&self, meal: &MealCreate, logged_at: DateTime<Utc>) -> StoreResult<Meal> {
        let meal = meal.clone().sanitized();
        // Stored with microsecond precision; return exactly what a reload yields
        let logged_at = logged_at.trunc_subsecs(6);
        let conn = self.database.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO user_meals (name, restaurant, calories, protein, carbs, fat, fiber, logged_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                meal.name,
                meal.restaurant,
                meal.calories,
                meal.protein,
                meal.carbs,
                meal.fat,
                meal.fiber,
                format_timestamp(&logged_at),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Ok(meal.into_meal(id, logged_at))
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
