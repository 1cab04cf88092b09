use std::{iter::Sum, ops::Add};

use serde::Serialize;

use crate::{foods::repo_types::Food, goals::repo_types::NutritionGoal};

/// Base unit of the food catalogue: nutrients are stored per 100 g (or ml).
pub const BASE_QUANTITY: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Nutrients {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

impl Nutrients {
    /// Nutrients of `quantity` units of `food`.
    pub fn scaled(food: &Food, quantity: f64) -> Self {
        let factor = quantity / BASE_QUANTITY;
        Self {
            calories: factor * food.calories,
            protein: factor * food.protein,
            carbohydrates: factor * food.carbohydrates,
            fat: factor * food.fat,
        }
    }

    pub fn from_goal(goal: &NutritionGoal) -> Self {
        Self {
            calories: goal.calories,
            protein: goal.protein,
            carbohydrates: goal.carbohydrates,
            fat: goal.fat,
        }
    }

    /// What is left of `self` once `consumed` is eaten; negative when over.
    pub fn remaining(&self, consumed: &Nutrients) -> Self {
        Self {
            calories: self.calories - consumed.calories,
            protein: self.protein - consumed.protein,
            carbohydrates: self.carbohydrates - consumed.carbohydrates,
            fat: self.fat - consumed.fat,
        }
    }
}

impl Add for Nutrients {
    type Output = Nutrients;

    fn add(self, rhs: Nutrients) -> Nutrients {
        Nutrients {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbohydrates: self.carbohydrates + rhs.carbohydrates,
            fat: self.fat + rhs.fat,
        }
    }
}

impl Sum for Nutrients {
    fn sum<I: Iterator<Item = Nutrients>>(iter: I) -> Self {
        iter.fold(Nutrients::default(), Add::add)
    }
}

/// Values written to a food record: the food's name and its nutrients scaled to
/// `quantity`, as read at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSnapshot {
    pub food_name: String,
    pub quantity: f64,
    pub unit: String,
    pub nutrients: Nutrients,
}

impl RecordSnapshot {
    pub fn take(food: &Food, quantity: f64, unit: &str) -> Self {
        Self {
            food_name: food.name.clone(),
            quantity,
            unit: unit.to_string(),
            nutrients: Nutrients::scaled(food, quantity),
        }
    }
}
