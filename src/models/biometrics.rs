//! Biometrics model
//!
//! Body measurements and activity level used to derive calorie goals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NutritionError, NutritionResult};

/// Biological sex, selects the Mifflin-St Jeor constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(NutritionError::invalid(format!("unknown sex '{}'", other))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity level with its fixed TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise and a physical job
    #[serde(alias = "very_active")]
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "veryActive",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = NutritionError;

    /// Exact names only. An unknown level is an error, never a guess.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "veryActive" | "very_active" => Ok(ActivityLevel::VeryActive),
            other => Err(NutritionError::invalid(format!(
                "unknown activity level '{}' (expected one of: sedentary, light, moderate, active, veryActive)",
                other
            ))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body measurements for a single calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
}

impl Biometrics {
    /// Create validated biometrics
    pub fn new(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> NutritionResult<Self> {
        let biometrics = Self {
            weight_kg,
            height_cm,
            age_years,
            sex,
        };
        biometrics.validate()?;
        Ok(biometrics)
    }

    /// Check that every measurement is positive and finite
    pub fn validate(&self) -> NutritionResult<()> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(NutritionError::invalid(format!(
                "weight must be a positive number of kilograms, got {}",
                self.weight_kg
            )));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(NutritionError::invalid(format!(
                "height must be a positive number of centimeters, got {}",
                self.height_cm
            )));
        }
        if self.age_years == 0 {
            return Err(NutritionError::invalid("age must be at least 1 year"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::Light.multiplier(), 1.375);
        assert_eq!(ActivityLevel::Moderate.multiplier(), 1.55);
        assert_eq!(ActivityLevel::Active.multiplier(), 1.725);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.9);
    }

    #[test]
    fn test_activity_level_parse_roundtrip() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.as_str().parse::<ActivityLevel>(), Ok(level));
        }
        assert_eq!("very_active".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryActive));
    }

    #[test]
    fn test_unknown_activity_level_is_invalid() {
        let err = "extreme".parse::<ActivityLevel>().unwrap_err();
        assert!(matches!(err, NutritionError::InvalidInput(_)));
        // No case folding or closest match
        assert!("Moderate".parse::<ActivityLevel>().is_err());
        assert!("".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_activity_level_serde_names() {
        let json = serde_json::to_string(&ActivityLevel::VeryActive).unwrap();
        assert_eq!(json, "\"veryActive\"");
        let level: ActivityLevel = serde_json::from_str("\"very_active\"").unwrap();
        assert_eq!(level, ActivityLevel::VeryActive);
        assert!(serde_json::from_str::<ActivityLevel>("\"couch\"").is_err());
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!("male".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!(" Female ".parse::<Sex>(), Ok(Sex::Female));
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_biometrics_validation() {
        assert!(Biometrics::new(70.0, 170.0, 30, Sex::Male).is_ok());
        assert!(Biometrics::new(0.0, 170.0, 30, Sex::Male).is_err());
        assert!(Biometrics::new(-5.0, 170.0, 30, Sex::Male).is_err());
        assert!(Biometrics::new(70.0, 0.0, 30, Sex::Female).is_err());
        assert!(Biometrics::new(70.0, f64::NAN, 30, Sex::Female).is_err());
        assert!(Biometrics::new(f64::INFINITY, 170.0, 30, Sex::Female).is_err());
        assert!(Biometrics::new(70.0, 170.0, 0, Sex::Female).is_err());
    }
}
