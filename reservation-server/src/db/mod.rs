//! Database Module
//!
//! Per-entity repository traits composed into [`Store`], with two backends:
//! - [`MemoryStore`]: process-local maps, used when no `DATABASE_URL` is set
//! - [`PgStore`]: PostgreSQL via `sqlx`
//!
//! Both backends enforce the live-slot rule on write: at most one
//! `reserved` reservation per (table, date, time). A losing writer gets
//! [`RepoError::Duplicate`].

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use shared::error::AppError;
use shared::models::{
    DiningTable, Meal, MealId, Reservation, ReservationId, Restaurant, RestaurantId, Slot, TableId,
    User, UserId,
};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.constraint().unwrap_or("unique").to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                RepoError::Validation(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Storage failures never leak their cause to the client
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::already_exists(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database operation failed");
                AppError::database("Database error")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Which reservations a listing selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationFilter {
    Restaurant(RestaurantId),
    User(UserId),
    Table(TableId),
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        match self {
            Self::Restaurant(id) => reservation.restaurant_id == *id,
            Self::User(id) => reservation.user_id == *id,
            Self::Table(id) => reservation.table_id == *id,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Duplicate` when the email is taken
    async fn insert_user(&self, user: User) -> RepoResult<User>;
    async fn find_user(&self, id: UserId) -> RepoResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn insert_restaurant(&self, restaurant: Restaurant) -> RepoResult<Restaurant>;
    async fn find_restaurant(&self, id: RestaurantId) -> RepoResult<Option<Restaurant>>;
}

#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Fails with `Duplicate` when the table number is taken in the restaurant
    async fn insert_table(&self, table: DiningTable) -> RepoResult<DiningTable>;
    async fn find_table(&self, id: TableId) -> RepoResult<Option<DiningTable>>;
    /// Table by id, only if it belongs to `restaurant_id`
    async fn find_table_in_restaurant(
        &self,
        id: TableId,
        restaurant_id: RestaurantId,
    ) -> RepoResult<Option<DiningTable>>;
    /// Ordered by table number
    async fn list_tables(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<DiningTable>>;
}

#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn insert_meal(&self, meal: Meal) -> RepoResult<Meal>;
    async fn find_meal(&self, id: MealId) -> RepoResult<Option<Meal>>;
    /// Meal by id, only if it belongs to `restaurant_id`
    async fn find_meal_in_restaurant(
        &self,
        id: MealId,
        restaurant_id: RestaurantId,
    ) -> RepoResult<Option<Meal>>;
    /// Ordered by name
    async fn list_meals(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<Meal>>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Fails with `Duplicate` when a `reserved` record already holds the slot
    async fn insert_reservation(&self, reservation: Reservation) -> RepoResult<Reservation>;
    /// Replace the stored record; `NotFound` if it was deleted,
    /// `Duplicate` if the new slot is held by another `reserved` record
    async fn update_reservation(&self, reservation: Reservation) -> RepoResult<Reservation>;
    /// Returns whether a record was removed
    async fn delete_reservation(&self, id: ReservationId) -> RepoResult<bool>;
    async fn find_reservation(&self, id: ReservationId) -> RepoResult<Option<Reservation>>;
    /// The `reserved` record holding `slot`, ignoring `exclude`
    async fn find_active_in_slot(
        &self,
        slot: Slot,
        exclude: Option<ReservationId>,
    ) -> RepoResult<Option<Reservation>>;
    /// Ordered by date, then time, then creation
    async fn list_reservations(&self, filter: ReservationFilter) -> RepoResult<Vec<Reservation>>;
}

/// The full persistence interface the services run against
pub trait Store:
    UserRepository + RestaurantRepository + TableRepository + MealRepository + ReservationRepository
{
    /// Backend name for logs and health checks
    fn backend(&self) -> &'static str;
}

impl std::fmt::Debug for dyn Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Store({})", self.backend())
    }
}

/// Listing order shared by both backends
pub(crate) fn sort_reservations(reservations: &mut [Reservation]) {
    reservations.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.time.cmp(&b.time))
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}
