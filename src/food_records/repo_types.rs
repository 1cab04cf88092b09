use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::aggregator::Nutrients;

/// One food eaten within a meal. Name and nutrients are a snapshot of the food
/// taken on the record's last write.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodRecord {
    pub id: Uuid,
    pub meal_record_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl FoodRecord {
    pub fn nutrients(&self) -> Nutrients {
        Nutrients {
            calories: self.calories,
            protein: self.protein,
            carbohydrates: self.carbohydrates,
            fat: self.fat,
        }
    }
}
