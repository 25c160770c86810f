//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::{RestaurantId, UserId};

/// Restaurant entity; `owned_by` is the authorization root for
/// restaurant-scoped operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub owned_by: UserId,
    pub created_at: i64,
}

impl Restaurant {
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owned_by == user
    }

    pub fn summary(&self) -> RestaurantSummary {
        RestaurantSummary {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }
}

/// Restaurant fields embedded in reservation listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummary {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// `{"restaurant": ...}` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantPayload {
    pub restaurant: Restaurant,
}
