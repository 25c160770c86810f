//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::{RestaurantId, TableId};

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: TableId,
    pub restaurant_id: RestaurantId,
    pub table_number: i32,
    pub capacity: i32,
}

impl DiningTable {
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            id: self.id,
            table_number: self.table_number,
            capacity: self.capacity,
        }
    }
}

/// Table fields embedded in reservation listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub id: TableId,
    pub table_number: i32,
    pub capacity: i32,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableCreate {
    pub table_number: i32,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePayload {
    pub table: DiningTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesPayload {
    pub tables: Vec<DiningTable>,
}
