use serde::Deserialize;

use super::calculator::{Biometrics, MacroTargets};

/// Manually chosen targets.
#[derive(Debug, Deserialize)]
pub struct SetGoalRequest {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

impl From<&SetGoalRequest> for MacroTargets {
    fn from(req: &SetGoalRequest) -> Self {
        MacroTargets {
            calories: req.calories,
            protein: req.protein,
            carbohydrates: req.carbohydrates,
            fat: req.fat,
        }
    }
}

/// Biometric fields override the stored profile when non-zero.
#[derive(Debug, Deserialize)]
pub struct CalculateGoalRequest {
    #[serde(default)]
    pub gender: i32,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub activity_level: i32,
    #[serde(default)]
    pub goal_type: String,
}

impl CalculateGoalRequest {
    pub fn overrides(&self) -> Biometrics {
        Biometrics {
            gender: self.gender,
            age: self.age,
            height_cm: self.height,
            weight_kg: self.weight,
            activity_level: self.activity_level,
        }
    }
}
