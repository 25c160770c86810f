//! Meal Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MealId, RestaurantId};

/// Meal offered by a restaurant, optionally pre-ordered with a reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: MealId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: Decimal,
}

impl Meal {
    pub fn summary(&self) -> MealSummary {
        MealSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
        }
    }
}

/// Meal fields embedded in reservation listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub id: MealId,
    pub name: String,
    pub price: Decimal,
}

/// Create meal payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPayload {
    pub meal: Meal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealsPayload {
    pub meals: Vec<Meal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_travels_as_a_number() {
        let meal = MealSummary {
            id: MealId(3),
            name: "Paella".into(),
            price: Decimal::new(1850, 2),
        };
        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["price"], serde_json::json!(18.5));

        let create: MealCreate = serde_json::from_str(r#"{"name":"Soup","price":4.25}"#).unwrap();
        assert_eq!(create.price, Decimal::new(425, 2));
    }
}
