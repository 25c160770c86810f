//! PostgreSQL store (normalized columns, runtime-checked queries)

use async_trait::async_trait;
use shared::models::{
    DiningTable, Meal, MealId, Reservation, ReservationId, Restaurant, RestaurantId, Slot, TableId,
    User, UserId,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{
    MealRepository, RepoResult, ReservationFilter, ReservationRepository, RestaurantRepository,
    Store, TableRepository, UserRepository,
};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const RESTAURANT_COLUMNS: &str = "id, name, address, owned_by, created_at";
const TABLE_COLUMNS: &str = "id, restaurant_id, table_number, capacity";
const MEAL_COLUMNS: &str = "id, restaurant_id, name, price";
const RESERVATION_COLUMNS: &str = "id, user_id, table_id, meal_id, restaurant_id, \
     reservation_date, reservation_time, status, created_at, updated_at";
const RESERVATION_ORDER: &str =
    "ORDER BY reservation_date, reservation_time, created_at, id";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and apply embedded migrations
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        tracing::info!("Database connection established (PostgreSQL)");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: User) -> RepoResult<User> {
        let row: User = sqlx::query_as(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl RestaurantRepository for PgStore {
    async fn insert_restaurant(&self, restaurant: Restaurant) -> RepoResult<Restaurant> {
        let row: Restaurant = sqlx::query_as(&format!(
            "INSERT INTO restaurants ({RESTAURANT_COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {RESTAURANT_COLUMNS}"
        ))
        .bind(restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(restaurant.owned_by)
        .bind(restaurant.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_restaurant(&self, id: RestaurantId) -> RepoResult<Option<Restaurant>> {
        let row = sqlx::query_as(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl TableRepository for PgStore {
    async fn insert_table(&self, table: DiningTable) -> RepoResult<DiningTable> {
        let row: DiningTable = sqlx::query_as(&format!(
            "INSERT INTO dining_tables ({TABLE_COLUMNS}) VALUES ($1, $2, $3, $4) \
             RETURNING {TABLE_COLUMNS}"
        ))
        .bind(table.id)
        .bind(table.restaurant_id)
        .bind(table.table_number)
        .bind(table.capacity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_table(&self, id: TableId) -> RepoResult<Option<DiningTable>> {
        let row = sqlx::query_as(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_table_in_restaurant(
        &self,
        id: TableId,
        restaurant_id: RestaurantId,
    ) -> RepoResult<Option<DiningTable>> {
        let row = sqlx::query_as(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = $1 AND restaurant_id = $2"
        ))
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_tables(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<DiningTable>> {
        let rows = sqlx::query_as(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE restaurant_id = $1 \
             ORDER BY table_number"
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl MealRepository for PgStore {
    async fn insert_meal(&self, meal: Meal) -> RepoResult<Meal> {
        let row: Meal = sqlx::query_as(&format!(
            "INSERT INTO meals ({MEAL_COLUMNS}) VALUES ($1, $2, $3, $4) RETURNING {MEAL_COLUMNS}"
        ))
        .bind(meal.id)
        .bind(meal.restaurant_id)
        .bind(&meal.name)
        .bind(meal.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_meal(&self, id: MealId) -> RepoResult<Option<Meal>> {
        let row = sqlx::query_as(&format!("SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_meal_in_restaurant(
        &self,
        id: MealId,
        restaurant_id: RestaurantId,
    ) -> RepoResult<Option<Meal>> {
        let row = sqlx::query_as(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND restaurant_id = $2"
        ))
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_meals(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<Meal>> {
        let rows = sqlx::query_as(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE restaurant_id = $1 ORDER BY name, id"
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ReservationRepository for PgStore {
    async fn insert_reservation(&self, reservation: Reservation) -> RepoResult<Reservation> {
        // uq_reservations_active_slot turns a lost race into a unique violation
        let row: Reservation = sqlx::query_as(&format!(
            "INSERT INTO reservations ({RESERVATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(reservation.id)
        .bind(reservation.user_id)
        .bind(reservation.table_id)
        .bind(reservation.meal_id)
        .bind(reservation.restaurant_id)
        .bind(reservation.date)
        .bind(reservation.time)
        .bind(reservation.status)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_reservation(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let row: Reservation = sqlx::query_as(&format!(
            "UPDATE reservations \
             SET reservation_date = $2, reservation_time = $3, status = $4, updated_at = $5 \
             WHERE id = $1 \
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(reservation.id)
        .bind(reservation.date)
        .bind(reservation.time)
        .bind(reservation.status)
        .bind(reservation.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_reservation(&self, id: ReservationId) -> RepoResult<Option<Reservation>> {
        let row = sqlx::query_as(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_active_in_slot(
        &self,
        slot: Slot,
        exclude: Option<ReservationId>,
    ) -> RepoResult<Option<Reservation>> {
        let row = sqlx::query_as(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE table_id = $1 AND reservation_date = $2 AND reservation_time = $3 \
               AND status = 'reserved' \
               AND ($4::BIGINT IS NULL OR id <> $4) \
             LIMIT 1"
        ))
        .bind(slot.table_id)
        .bind(slot.date)
        .bind(slot.time)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_reservations(&self, filter: ReservationFilter) -> RepoResult<Vec<Reservation>> {
        let (column, id) = match filter {
            ReservationFilter::Restaurant(id) => ("restaurant_id", id.value()),
            ReservationFilter::User(id) => ("user_id", id.value()),
            ReservationFilter::Table(id) => ("table_id", id.value()),
        };
        let rows = sqlx::query_as(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE {column} = $1 {RESERVATION_ORDER}"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}
