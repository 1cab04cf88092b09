use serde::{Deserialize, Serialize};
use time::Date;

use super::{meal_type::MealType, repo_types::MealRecord};
use crate::{
    date::iso_date,
    food_records::{aggregator::Nutrients, repo_types::FoodRecord},
};

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    #[serde(with = "iso_date", alias = "date")]
    pub record_date: Date,
    pub meal_type: MealType,
}

/// Both fields optional; missing ones keep the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMealRequest {
    #[serde(default, with = "iso_date::option", alias = "date")]
    pub record_date: Option<Date>,
    #[serde(default)]
    pub meal_type: Option<MealType>,
}

/// A meal with its food records and their summed nutrients.
#[derive(Debug, Serialize)]
pub struct MealDetails {
    #[serde(flatten)]
    pub meal: MealRecord,
    pub food_records: Vec<FoodRecord>,
    pub totals: Nutrients,
}

impl MealDetails {
    pub fn new(meal: MealRecord, food_records: Vec<FoodRecord>) -> Self {
        let totals = food_records.iter().map(FoodRecord::nutrients).sum();
        Self {
            meal,
            food_records,
            totals,
        }
    }
}
