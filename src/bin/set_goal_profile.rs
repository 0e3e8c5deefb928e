//! Utility to set the goal profile in the database
//!
//! Usage: set_goal_profile <weight_kg> <height_cm> <age_years> <male|female> <activity_level>
//!
//! Turns auto-calculation on and prints the derived goals.

use nutritrack::config::AppConfig;
use nutritrack::db::Database;
use nutritrack::models::{ActivityLevel, Biometrics, GoalProfile, Sex};
use nutritrack::store::{PersistenceStore, SqliteStore};

const USAGE: &str = "Usage: set_goal_profile <weight_kg> <height_cm> <age_years> <male|female> <activity_level>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 5 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let weight_kg = args[0].parse::<f64>().map_err(|e| format!("Invalid weight '{}': {}", args[0], e))?;
    let height_cm = args[1].parse::<f64>().map_err(|e| format!("Invalid height '{}': {}", args[1], e))?;
    let age_years = args[2].parse::<u32>().map_err(|e| format!("Invalid age '{}': {}", args[2], e))?;
    let biometrics = Biometrics::new(weight_kg, height_cm, age_years, args[3].parse::<Sex>()?)?;
    let activity_level: ActivityLevel = args[4].parse()?;

    let config = AppConfig::from_env()?;
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let store = SqliteStore::new(Database::new(&config.database_path)?)?;

    // Keep the stored water goal; everything else is re-derived
    let mut profile = store.load_goals()?.unwrap_or_else(GoalProfile::default);
    profile.biometrics = biometrics;
    profile.activity_level = activity_level;
    profile.goals.auto_calculate = true;
    let profile = profile.with_auto_goals()?;

    store.save_goals(&profile)?;

    let goals = &profile.goals;
    println!("Goal profile set:");
    println!("  Activity level: {}", profile.activity_level);
    println!("  Calories: {} kcal", goals.calorie_goal);
    println!("  Protein:  {} g", goals.protein_goal);
    println!("  Carbs:    {} g", goals.carb_goal);
    println!("  Fat:      {} g", goals.fat_goal);
    println!("  Fiber:    {} g", goals.fiber_goal);
    println!("  Water:    {} L", goals.water_goal_liters);

    Ok(())
}
