//! Calorie and macronutrient targets from body metrics.
//!
//! BMR uses the Mifflin-St Jeor equation, TDEE scales it by an activity
//! factor, and the goal type shifts calories by a fixed 500 kcal/day
//! (roughly 0.5 kg per week) before splitting them into macros.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

/// Daily calorie offset applied for lose/gain goals.
pub const CALORIE_ADJUSTMENT: f64 = 500.0;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("missing required profile data: {0}; complete your profile or pass it in the request")]
    MissingBiometric(&'static str),
    #[error("gender must be 1 (male) or 2 (female), got {0}")]
    InvalidGender(i32),
    #[error("{0} must be positive")]
    NotPositive(&'static str),
    #[error("activity_level must be between 1 and 5, got {0}")]
    InvalidActivityLevel(i32),
    #[error("goal_type must be one of maintain, lose, gain (got {0:?})")]
    InvalidGoalType(String),
}

impl From<CalcError> for AppError {
    fn from(e: CalcError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Stored profile code: 1 male, 2 female (0 means unknown).
    pub fn from_code(code: i32) -> Result<Self, CalcError> {
        match code {
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            0 => Err(CalcError::MissingBiometric("gender")),
            other => Err(CalcError::InvalidGender(other)),
        }
    }

    fn bmr_offset(self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Maintain,
    Lose,
    Gain,
}

impl FromStr for GoalType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "maintain" => Ok(GoalType::Maintain),
            "lose" => Ok(GoalType::Lose),
            "gain" => Ok(GoalType::Gain),
            other => Err(CalcError::InvalidGoalType(other.to_string())),
        }
    }
}

/// Share of total calories per macronutrient; always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

impl GoalType {
    pub fn calorie_offset(self) -> f64 {
        match self {
            GoalType::Maintain => 0.0,
            GoalType::Lose => -CALORIE_ADJUSTMENT,
            GoalType::Gain => CALORIE_ADJUSTMENT,
        }
    }

    pub fn macro_split(self) -> MacroSplit {
        match self {
            GoalType::Maintain => MacroSplit {
                protein: 0.20,
                carbohydrates: 0.50,
                fat: 0.30,
            },
            // more protein while in a deficit
            GoalType::Lose => MacroSplit {
                protein: 0.25,
                carbohydrates: 0.45,
                fat: 0.30,
            },
            GoalType::Gain => MacroSplit {
                protein: 0.20,
                carbohydrates: 0.55,
                fat: 0.25,
            },
        }
    }
}

/// TDEE multiplier for activity levels 1 (sedentary) through 5 (very active).
pub fn activity_factor(level: i32) -> Result<f64, CalcError> {
    match level {
        1 => Ok(1.2),
        2 => Ok(1.375),
        3 => Ok(1.55),
        4 => Ok(1.725),
        5 => Ok(1.9),
        other => Err(CalcError::InvalidActivityLevel(other)),
    }
}

pub fn mifflin_st_jeor(gender: Gender, age: i32, height_cm: f64, weight_kg: f64) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + gender.bmr_offset()
}

/// Raw body metrics as stored on a profile or sent with a request.
/// Zero means "not provided".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Biometrics {
    pub gender: i32,
    pub age: i32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: i32,
}

impl Biometrics {
    /// A field of `overrides` replaces the stored value only when it is set:
    /// gender non-zero, age/height/weight positive, activity level in 1..=5.
    pub fn with_overrides(self, overrides: &Biometrics) -> Biometrics {
        Biometrics {
            gender: if overrides.gender != 0 { overrides.gender } else { self.gender },
            age: if overrides.age > 0 { overrides.age } else { self.age },
            height_cm: if overrides.height_cm > 0.0 {
                overrides.height_cm
            } else {
                self.height_cm
            },
            weight_kg: if overrides.weight_kg > 0.0 {
                overrides.weight_kg
            } else {
                self.weight_kg
            },
            activity_level: if (1..=5).contains(&overrides.activity_level) {
                overrides.activity_level
            } else {
                self.activity_level
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroTargets {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

impl MacroTargets {
    pub fn from_calories(calories: f64, split: MacroSplit) -> Self {
        Self {
            calories,
            protein: calories * split.protein / KCAL_PER_G_PROTEIN,
            carbohydrates: calories * split.carbohydrates / KCAL_PER_G_CARBS,
            fat: calories * split.fat / KCAL_PER_G_FAT,
        }
    }

    /// Energy implied by the macro grams.
    pub fn macro_calories(&self) -> f64 {
        self.protein * KCAL_PER_G_PROTEIN
            + self.carbohydrates * KCAL_PER_G_CARBS
            + self.fat * KCAL_PER_G_FAT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalCalculation {
    pub bmr: f64,
    pub tdee: f64,
    pub targets: MacroTargets,
}

pub fn calculate(bio: &Biometrics, goal: GoalType) -> Result<GoalCalculation, CalcError> {
    let gender = Gender::from_code(bio.gender)?;
    check_positive("age", f64::from(bio.age))?;
    check_positive("height", bio.height_cm)?;
    check_positive("weight", bio.weight_kg)?;
    if bio.activity_level == 0 {
        return Err(CalcError::MissingBiometric("activity_level"));
    }
    let factor = activity_factor(bio.activity_level)?;

    let bmr = mifflin_st_jeor(gender, bio.age, bio.height_cm, bio.weight_kg);
    let tdee = bmr * factor;
    let calories = tdee + goal.calorie_offset();

    Ok(GoalCalculation {
        bmr,
        tdee,
        targets: MacroTargets::from_calories(calories, goal.macro_split()),
    })
}

fn check_positive(field: &'static str, value: f64) -> Result<(), CalcError> {
    if value == 0.0 {
        Err(CalcError::MissingBiometric(field))
    } else if value < 0.0 {
        Err(CalcError::NotPositive(field))
    } else {
        Ok(())
    }
}
