//! Reservation Model

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::serde_helpers;
use super::{
    MealId, MealSummary, ReservationId, RestaurantId, RestaurantSummary, TableId, TableSummary,
    UserId, UserSummary,
};

/// Reservation lifecycle state
///
/// `Reserved` is the only state that holds a slot. Transitions go
/// reserved → canceled and reserved → completed; nothing re-opens a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "reservation_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Reserved,
    Canceled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
        }
    }

    /// Whether a reservation in this state occupies its slot
    pub fn holds_slot(&self) -> bool {
        matches!(self, Self::Reserved)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reservation status: {}", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

impl FromStr for ReservationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reserved" => Ok(Self::Reserved),
            "canceled" => Ok(Self::Canceled),
            "completed" => Ok(Self::Completed),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// The (table, date, time) tuple a reservation occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub table_id: TableId,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    /// Creator of the reservation
    pub user_id: UserId,
    pub table_id: TableId,
    pub meal_id: Option<MealId>,
    pub restaurant_id: RestaurantId,
    #[cfg_attr(feature = "db", sqlx(rename = "reservation_date"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "db", sqlx(rename = "reservation_time"))]
    #[serde(with = "serde_helpers::hhmm")]
    pub time: NaiveTime,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    pub fn slot(&self) -> Slot {
        Slot {
            table_id: self.table_id,
            date: self.date,
            time: self.time,
        }
    }

    pub fn is_created_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// Create reservation payload
///
/// Every field is optional at the wire level so a missing field produces a
/// field-specific error instead of a generic body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub table_id: Option<TableId>,
    pub meal_id: Option<MealId>,
    pub restaurant_id: Option<RestaurantId>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Update reservation payload; absent or `null` means "leave unchanged"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
}

/// Restaurant-owner status change payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: Option<String>,
}

/// Reservation with the related records a listing asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub restaurant: Option<RestaurantSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub table: Option<TableSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meal: Option<MealSummary>,
}

impl From<Reservation> for ReservationDetail {
    fn from(reservation: Reservation) -> Self {
        Self {
            reservation,
            user: None,
            restaurant: None,
            table: None,
            meal: None,
        }
    }
}

/// `{"reservation": ...}` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationPayload<T = Reservation> {
    pub reservation: T,
}

/// `{"reservations": [...]}` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationsPayload<T = ReservationDetail> {
    pub reservations: Vec<T>,
}
