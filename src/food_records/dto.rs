use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::aggregator::Nutrients;
use crate::date::iso_date;

#[derive(Debug, Deserialize)]
pub struct CreateFoodRecordRequest {
    pub meal_record_id: Uuid,
    pub food_id: Uuid,
    pub quantity: f64,
    pub unit: String,
}

/// Quantity is required; the unit is kept when omitted.
#[derive(Debug, Deserialize)]
pub struct UpdateFoodRecordRequest {
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MealQuery {
    pub meal_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub record_count: usize,
    pub totals: Nutrients,
    pub goal: Option<Nutrients>,
    pub remaining: Option<Nutrients>,
}
