use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct FoodSearch {
    pub name: Option<String>,
}
