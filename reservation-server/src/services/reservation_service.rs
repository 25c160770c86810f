//! Reservation Service - booking lifecycle, ownership checks and slot rules
//!
//! Every operation takes the caller identity explicitly and either returns
//! the result or fails before anything is written.

use std::collections::HashMap;
use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    MealId, MealSummary, Reservation, ReservationCreate, ReservationDetail, ReservationId,
    ReservationStatus, ReservationStatusUpdate, ReservationUpdate, Restaurant, RestaurantId,
    RestaurantSummary, Slot, TableId, TableSummary, UserId, UserSummary,
};

use crate::auth::CurrentUser;
use crate::db::{RepoError, ReservationFilter, Store};
use crate::utils::validation::{require, require_date, require_time, supplied_date, supplied_time};

/// Which related records a listing embeds
#[derive(Debug, Clone, Copy)]
struct Embed {
    user: bool,
    restaurant: bool,
    table: bool,
    meal: bool,
}

impl Embed {
    const FOR_RESTAURANT: Self = Self {
        user: true,
        restaurant: false,
        table: true,
        meal: true,
    };
    const FOR_USER: Self = Self {
        user: false,
        restaurant: true,
        table: true,
        meal: true,
    };
    const FOR_TABLE: Self = Self {
        user: true,
        restaurant: true,
        table: false,
        meal: false,
    };
    const FULL: Self = Self {
        user: true,
        restaurant: true,
        table: true,
        meal: true,
    };
}

/// Per-call lookup cache for join summaries
///
/// A listing usually repeats the same table, user and restaurant; each id is
/// fetched once. Dangling references embed as absent.
struct Relations<'a> {
    store: &'a dyn Store,
    users: HashMap<UserId, Option<UserSummary>>,
    restaurants: HashMap<RestaurantId, Option<RestaurantSummary>>,
    tables: HashMap<TableId, Option<TableSummary>>,
    meals: HashMap<MealId, Option<MealSummary>>,
}

impl<'a> Relations<'a> {
    fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            users: HashMap::new(),
            restaurants: HashMap::new(),
            tables: HashMap::new(),
            meals: HashMap::new(),
        }
    }

    fn with_restaurant(mut self, restaurant: &Restaurant) -> Self {
        self.restaurants
            .insert(restaurant.id, Some(restaurant.summary()));
        self
    }

    async fn user(&mut self, id: UserId) -> AppResult<Option<UserSummary>> {
        if let Some(hit) = self.users.get(&id) {
            return Ok(hit.clone());
        }
        let found = self.store.find_user(id).await?.map(|u| u.summary());
        self.users.insert(id, found.clone());
        Ok(found)
    }

    async fn restaurant(&mut self, id: RestaurantId) -> AppResult<Option<RestaurantSummary>> {
        if let Some(hit) = self.restaurants.get(&id) {
            return Ok(hit.clone());
        }
        let found = self.store.find_restaurant(id).await?.map(|r| r.summary());
        self.restaurants.insert(id, found.clone());
        Ok(found)
    }

    async fn table(&mut self, id: TableId) -> AppResult<Option<TableSummary>> {
        if let Some(hit) = self.tables.get(&id) {
            return Ok(hit.clone());
        }
        let found = self.store.find_table(id).await?.map(|t| t.summary());
        self.tables.insert(id, found.clone());
        Ok(found)
    }

    async fn meal(&mut self, id: MealId) -> AppResult<Option<MealSummary>> {
        if let Some(hit) = self.meals.get(&id) {
            return Ok(hit.clone());
        }
        let found = self.store.find_meal(id).await?.map(|m| m.summary());
        self.meals.insert(id, found.clone());
        Ok(found)
    }

    async fn detail(&mut self, reservation: Reservation, embed: Embed) -> AppResult<ReservationDetail> {
        let user = if embed.user {
            self.user(reservation.user_id).await?
        } else {
            None
        };
        let restaurant = if embed.restaurant {
            self.restaurant(reservation.restaurant_id).await?
        } else {
            None
        };
        let table = if embed.table {
            self.table(reservation.table_id).await?
        } else {
            None
        };
        let meal = match reservation.meal_id {
            Some(id) if embed.meal => self.meal(id).await?,
            _ => None,
        };

        Ok(ReservationDetail {
            reservation,
            user,
            restaurant,
            table,
            meal,
        })
    }

    async fn details(
        &mut self,
        reservations: Vec<Reservation>,
        embed: Embed,
    ) -> AppResult<Vec<ReservationDetail>> {
        let mut out = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            out.push(self.detail(reservation, embed).await?);
        }
        Ok(out)
    }
}

/// Parse a status for a caller-driven change; only terminal states are allowed
fn parse_target_status(raw: &str) -> AppResult<ReservationStatus> {
    match raw.parse::<ReservationStatus>() {
        Ok(status @ (ReservationStatus::Canceled | ReservationStatus::Completed)) => Ok(status),
        _ => Err(AppError::with_message(
            ErrorCode::ReservationInvalidStatus,
            "status must be one of: canceled, completed",
        )
        .with_detail("status", raw)),
    }
}

/// Only a `reserved` record may change state; repeating the current state is a no-op
fn check_transition(current: ReservationStatus, target: ReservationStatus) -> AppResult<()> {
    if current == target || current == ReservationStatus::Reserved {
        return Ok(());
    }
    Err(AppError::with_message(
        ErrorCode::ReservationStatusLocked,
        format!("Reservation is already {current}"),
    )
    .with_detail("status", current.as_str()))
}

fn slot_taken(slot: Slot) -> AppError {
    AppError::slot_taken()
        .with_detail("tableId", slot.table_id.value())
        .with_detail("date", slot.date.to_string())
        .with_detail("time", slot.time.format("%H:%M").to_string())
}

#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for ReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationService")
            .field("backend", &self.store.backend())
            .finish()
    }
}

impl ReservationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn load(&self, id: ReservationId) -> AppResult<Reservation> {
        self.store
            .find_reservation(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.value()))
    }

    async fn load_restaurant(&self, id: RestaurantId) -> AppResult<Restaurant> {
        self.store
            .find_restaurant(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound).with_detail("id", id.value()))
    }

    /// Book a table.
    ///
    /// Checks run in a fixed order: required fields, restaurant, table
    /// membership, live slot, meal membership. The store re-checks the slot
    /// atomically on insert.
    pub async fn create(
        &self,
        caller: &CurrentUser,
        req: ReservationCreate,
    ) -> AppResult<Reservation> {
        let table_id = require(req.table_id, "tableId")?;
        let restaurant_id = require(req.restaurant_id, "restaurantId")?;
        let date = require_date(req.date.as_deref(), "date")?;
        let time = require_time(req.time.as_deref(), "time")?;

        let restaurant = self.load_restaurant(restaurant_id).await?;

        let table = self
            .store
            .find_table_in_restaurant(table_id, restaurant.id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::TableNotFound)
                    .with_detail("tableId", table_id.value())
                    .with_detail("restaurantId", restaurant.id.value())
            })?;

        let slot = Slot {
            table_id: table.id,
            date,
            time,
        };
        if self.store.find_active_in_slot(slot, None).await?.is_some() {
            return Err(slot_taken(slot));
        }

        if let Some(meal_id) = req.meal_id {
            self.store
                .find_meal_in_restaurant(meal_id, restaurant.id)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::MealNotFound)
                        .with_detail("mealId", meal_id.value())
                        .with_detail("restaurantId", restaurant.id.value())
                })?;
        }

        let now = shared::util::now_millis();
        let reservation = Reservation {
            id: ReservationId::generate(),
            user_id: caller.id,
            table_id: table.id,
            meal_id: req.meal_id,
            restaurant_id: restaurant.id,
            date,
            time,
            status: ReservationStatus::Reserved,
            created_at: now,
            updated_at: now,
        };

        let created = match self.store.insert_reservation(reservation).await {
            Ok(created) => created,
            Err(RepoError::Duplicate(_)) => return Err(slot_taken(slot)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            reservation_id = %created.id,
            user_id = %caller.id,
            table_id = %created.table_id,
            date = %created.date,
            time = %created.time,
            "Reservation created"
        );
        Ok(created)
    }

    /// Change date, time or status of the caller's own reservation
    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: ReservationId,
        req: ReservationUpdate,
    ) -> AppResult<Reservation> {
        let existing = self.load(id).await?;
        if !existing.is_created_by(caller.id) {
            return Err(AppError::new(ErrorCode::NotReservationOwner));
        }

        let date = req
            .date
            .as_deref()
            .map(|v| supplied_date(v, "date"))
            .transpose()?;
        let time = req
            .time
            .as_deref()
            .map(|v| supplied_time(v, "time"))
            .transpose()?;
        let status = match req.status.as_deref() {
            None => None,
            // Re-opening a closed booking is not a transition we allow
            Some(raw) if raw.trim() == ReservationStatus::Reserved.as_str() => {
                check_transition(existing.status, ReservationStatus::Reserved)?;
                Some(ReservationStatus::Reserved)
            }
            Some(raw) => {
                let target = parse_target_status(raw)?;
                check_transition(existing.status, target)?;
                Some(target)
            }
        };

        let mut updated = existing.clone();
        if let Some(date) = date {
            updated.date = date;
        }
        if let Some(time) = time {
            updated.time = time;
        }
        if let Some(status) = status {
            updated.status = status;
        }

        // A record closed in the same request no longer claims the slot
        let slot = updated.slot();
        if (date.is_some() || time.is_some())
            && updated.status.holds_slot()
            && self.store.find_active_in_slot(slot, Some(id)).await?.is_some()
        {
            return Err(slot_taken(slot));
        }

        updated.updated_at = shared::util::now_millis();
        let saved = self.persist(updated, slot).await?;

        tracing::info!(
            reservation_id = %saved.id,
            user_id = %caller.id,
            status = %saved.status,
            "Reservation updated"
        );
        Ok(saved)
    }

    /// Permanently remove the caller's own reservation
    pub async fn delete(&self, caller: &CurrentUser, id: ReservationId) -> AppResult<()> {
        let existing = self.load(id).await?;
        if !existing.is_created_by(caller.id) {
            return Err(AppError::new(ErrorCode::NotReservationOwner));
        }

        if !self.store.delete_reservation(id).await? {
            return Err(AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.value()));
        }

        tracing::info!(reservation_id = %id, user_id = %caller.id, "Reservation deleted");
        Ok(())
    }

    /// All reservations of a restaurant, for its owner
    pub async fn list_for_restaurant(
        &self,
        caller: &CurrentUser,
        restaurant_id: RestaurantId,
    ) -> AppResult<Vec<ReservationDetail>> {
        let restaurant = self.load_restaurant(restaurant_id).await?;
        if !restaurant.is_owned_by(caller.id) {
            return Err(AppError::new(ErrorCode::NotRestaurantOwner));
        }

        let reservations = self
            .store
            .list_reservations(ReservationFilter::Restaurant(restaurant.id))
            .await?;
        Relations::new(self.store.as_ref())
            .details(reservations, Embed::FOR_RESTAURANT)
            .await
    }

    /// Restaurant owner closes a reservation as canceled or completed
    pub async fn update_status(
        &self,
        caller: &CurrentUser,
        id: ReservationId,
        req: ReservationStatusUpdate,
    ) -> AppResult<Reservation> {
        let raw = require(req.status.as_deref(), "status")?;
        let target = parse_target_status(raw)?;

        let existing = self.load(id).await?;
        let restaurant = self.load_restaurant(existing.restaurant_id).await?;
        if !restaurant.is_owned_by(caller.id) {
            return Err(AppError::new(ErrorCode::NotRestaurantOwner));
        }
        check_transition(existing.status, target)?;

        let mut updated = existing;
        updated.status = target;
        updated.updated_at = shared::util::now_millis();
        let slot = updated.slot();
        let saved = self.persist(updated, slot).await?;

        tracing::info!(
            reservation_id = %saved.id,
            restaurant_id = %restaurant.id,
            status = %saved.status,
            "Reservation status changed"
        );
        Ok(saved)
    }

    /// Everything the caller has booked
    pub async fn list_for_user(&self, caller: &CurrentUser) -> AppResult<Vec<ReservationDetail>> {
        let reservations = self
            .store
            .list_reservations(ReservationFilter::User(caller.id))
            .await?;
        Relations::new(self.store.as_ref())
            .details(reservations, Embed::FOR_USER)
            .await
    }

    /// Reservations on one table the caller may see.
    ///
    /// The restaurant owner sees all of them (possibly none). Anyone else
    /// sees only their own, and is refused if they have none there.
    pub async fn list_for_table(
        &self,
        caller: &CurrentUser,
        table_id: TableId,
    ) -> AppResult<Vec<ReservationDetail>> {
        let table = self
            .store
            .find_table(table_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::TableNotFound).with_detail("tableId", table_id.value())
            })?;
        let restaurant = self.load_restaurant(table.restaurant_id).await?;
        let is_owner = restaurant.is_owned_by(caller.id);

        let mut reservations = self
            .store
            .list_reservations(ReservationFilter::Table(table.id))
            .await?;
        if !is_owner {
            reservations.retain(|r| r.is_created_by(caller.id));
            if reservations.is_empty() {
                return Err(AppError::permission_denied(
                    "Not allowed to view reservations for this table",
                ));
            }
        }

        Relations::new(self.store.as_ref())
            .with_restaurant(&restaurant)
            .details(reservations, Embed::FOR_TABLE)
            .await
    }

    /// One reservation, visible to its creator and the restaurant owner
    pub async fn get(&self, caller: &CurrentUser, id: ReservationId) -> AppResult<ReservationDetail> {
        let reservation = self.load(id).await?;
        let restaurant = self.store.find_restaurant(reservation.restaurant_id).await?;

        let is_owner = restaurant
            .as_ref()
            .is_some_and(|r| r.is_owned_by(caller.id));
        if !reservation.is_created_by(caller.id) && !is_owner {
            return Err(AppError::permission_denied(
                "Not allowed to view this reservation",
            ));
        }

        let mut relations = Relations::new(self.store.as_ref());
        if let Some(restaurant) = &restaurant {
            relations = relations.with_restaurant(restaurant);
        }
        relations.detail(reservation, Embed::FULL).await
    }

    async fn persist(&self, reservation: Reservation, slot: Slot) -> AppResult<Reservation> {
        let id = reservation.id;
        match self.store.update_reservation(reservation).await {
            Ok(saved) => Ok(saved),
            Err(RepoError::Duplicate(_)) => Err(slot_taken(slot)),
            Err(RepoError::NotFound(_)) => {
                Err(AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.value()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        MealRepository, MemoryStore, ReservationRepository, RestaurantRepository, TableRepository,
        UserRepository,
    };
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use shared::models::{DiningTable, Meal, User};

    struct Fixture {
        service: ReservationService,
        store: Arc<MemoryStore>,
        owner: CurrentUser,
        alice: CurrentUser,
        bob: CurrentUser,
        restaurant: RestaurantId,
        table: TableId,
        other_table: TableId,
        meal: MealId,
    }

    async fn user(store: &MemoryStore, id: i64, name: &str) -> CurrentUser {
        let user = User {
            id: UserId(id),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: String::new(),
            created_at: 0,
        };
        store.insert_user(user.clone()).await.unwrap();
        CurrentUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let owner = user(&store, 1, "Owner").await;
        let alice = user(&store, 2, "Alice").await;
        let bob = user(&store, 3, "Bob").await;

        let restaurant = Restaurant {
            id: RestaurantId(10),
            name: "Casa".into(),
            address: "1 Main St".into(),
            owned_by: owner.id,
            created_at: 0,
        };
        store.insert_restaurant(restaurant).await.unwrap();
        let elsewhere = Restaurant {
            id: RestaurantId(11),
            name: "Elsewhere".into(),
            address: String::new(),
            owned_by: bob.id,
            created_at: 0,
        };
        store.insert_restaurant(elsewhere).await.unwrap();

        for (id, restaurant_id, number) in [(20, 10, 1), (21, 11, 1)] {
            store
                .insert_table(DiningTable {
                    id: TableId(id),
                    restaurant_id: RestaurantId(restaurant_id),
                    table_number: number,
                    capacity: 4,
                })
                .await
                .unwrap();
        }
        store
            .insert_meal(Meal {
                id: MealId(30),
                restaurant_id: RestaurantId(10),
                name: "Paella".into(),
                price: Decimal::new(1850, 2),
            })
            .await
            .unwrap();

        Fixture {
            service: ReservationService::new(store.clone()),
            store,
            owner,
            alice,
            bob,
            restaurant: RestaurantId(10),
            table: TableId(20),
            other_table: TableId(21),
            meal: MealId(30),
        }
    }

    fn booking(f: &Fixture, date: &str, time: &str) -> ReservationCreate {
        ReservationCreate {
            table_id: Some(f.table),
            meal_id: None,
            restaurant_id: Some(f.restaurant),
            date: Some(date.into()),
            time: Some(time.into()),
        }
    }

    async fn count(f: &Fixture) -> usize {
        f.store
            .list_reservations(ReservationFilter::Restaurant(f.restaurant))
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn create_books_the_slot_for_the_caller() {
        let f = fixture().await;
        let mut req = booking(&f, "2024-06-01", "19:00");
        req.meal_id = Some(f.meal);

        let r = f.service.create(&f.alice, req).await.unwrap();
        assert_eq!(r.user_id, f.alice.id);
        assert_eq!(r.status, ReservationStatus::Reserved);
        assert_eq!(r.meal_id, Some(f.meal));
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(r.time, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn create_requires_all_slot_fields() {
        let f = fixture().await;
        for strip in 0..4 {
            let mut req = booking(&f, "2024-06-01", "19:00");
            match strip {
                0 => req.table_id = None,
                1 => req.restaurant_id = None,
                2 => req.date = None,
                _ => req.time = None,
            }
            let err = f.service.create(&f.alice, req).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::RequiredField);
        }
        assert_eq!(count(&f).await, 0);
    }

    #[tokio::test]
    async fn create_rejects_table_from_another_restaurant() {
        let f = fixture().await;
        let mut req = booking(&f, "2024-06-01", "19:00");
        req.table_id = Some(f.other_table);

        let err = f.service.create(&f.alice, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
        assert_eq!(count(&f).await, 0);
    }

    #[tokio::test]
    async fn create_checks_restaurant_before_table() {
        let f = fixture().await;
        let mut req = booking(&f, "2024-06-01", "19:00");
        req.restaurant_id = Some(RestaurantId(999));
        req.table_id = Some(TableId(999));

        let err = f.service.create(&f.alice, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RestaurantNotFound);
    }

    #[tokio::test]
    async fn slot_conflict_is_reported_before_meal_lookup() {
        let f = fixture().await;
        f.service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();

        let mut req = booking(&f, "2024-06-01", "19:00");
        req.meal_id = Some(MealId(404));
        let err = f.service.create(&f.bob, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationSlotTaken);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(count(&f).await, 1);
    }

    #[tokio::test]
    async fn create_rejects_meal_from_another_restaurant() {
        let f = fixture().await;
        f.store
            .insert_meal(Meal {
                id: MealId(31),
                restaurant_id: RestaurantId(11),
                name: "Soup".into(),
                price: Decimal::new(400, 2),
            })
            .await
            .unwrap();
        let mut req = booking(&f, "2024-06-01", "19:00");
        req.meal_id = Some(MealId(31));

        let err = f.service.create(&f.alice, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MealNotFound);
        assert_eq!(count(&f).await, 0);
    }

    #[tokio::test]
    async fn concurrent_creates_for_one_slot_book_it_once() {
        let f = fixture().await;
        let mut handles = Vec::new();
        for i in 0..16 {
            let service = f.service.clone();
            let caller = if i % 2 == 0 { f.alice.clone() } else { f.bob.clone() };
            let req = booking(&f, "2024-06-01", "19:00");
            handles.push(tokio::spawn(
                async move { service.create(&caller, req).await },
            ));
        }

        let mut booked = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => booked += 1,
                Err(e) => assert_eq!(e.code, ErrorCode::ReservationSlotTaken),
            }
        }
        assert_eq!(booked, 1);
        assert_eq!(count(&f).await, 1);
    }

    #[tokio::test]
    async fn update_by_someone_else_is_forbidden_and_changes_nothing() {
        let f = fixture().await;
        let r = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();

        let req = ReservationUpdate {
            time: Some("20:00".into()),
            ..Default::default()
        };
        let err = f.service.update(&f.bob, r.id, req).await.unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

        let stored = f.store.find_reservation(r.id).await.unwrap().unwrap();
        assert_eq!(stored, r);
    }

    #[tokio::test]
    async fn update_moves_to_a_free_slot_only() {
        let f = fixture().await;
        let first = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();
        f.service
            .create(&f.bob, booking(&f, "2024-06-01", "20:00"))
            .await
            .unwrap();

        let clash = ReservationUpdate {
            time: Some("20:00".into()),
            ..Default::default()
        };
        let err = f.service.update(&f.alice, first.id, clash).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationSlotTaken);

        // Re-saving its own slot is not a conflict with itself
        let same = ReservationUpdate {
            time: Some("19:00".into()),
            ..Default::default()
        };
        f.service.update(&f.alice, first.id, same).await.unwrap();

        let moved = ReservationUpdate {
            date: Some("2024-06-02".into()),
            time: Some("20:00".into()),
            status: None,
        };
        let r = f.service.update(&f.alice, first.id, moved).await.unwrap();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(r.time, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert!(r.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn update_rejects_blank_and_invalid_values() {
        let f = fixture().await;
        let r = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();

        let blank = ReservationUpdate {
            date: Some(String::new()),
            ..Default::default()
        };
        assert!(f.service.update(&f.alice, r.id, blank).await.unwrap_err().is_client_error());

        let bogus = ReservationUpdate {
            status: Some("pending".into()),
            ..Default::default()
        };
        let err = f.service.update(&f.alice, r.id, bogus).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationInvalidStatus);
    }

    #[tokio::test]
    async fn canceled_reservation_cannot_be_reopened() {
        let f = fixture().await;
        let r = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();
        let cancel = ReservationUpdate {
            status: Some("canceled".into()),
            ..Default::default()
        };
        let canceled = f.service.update(&f.alice, r.id, cancel).await.unwrap();
        assert_eq!(canceled.status, ReservationStatus::Canceled);

        let reopen = ReservationUpdate {
            status: Some("reserved".into()),
            ..Default::default()
        };
        let err = f.service.update(&f.alice, r.id, reopen).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationStatusLocked);

        // The slot is free again
        f.service
            .create(&f.bob, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let f = fixture().await;
        let r = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();

        let err = f.service.delete(&f.bob, r.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotReservationOwner);

        f.service.delete(&f.alice, r.id).await.unwrap();
        let err = f.service.get(&f.alice, r.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }

    #[tokio::test]
    async fn status_update_is_for_the_restaurant_owner() {
        let f = fixture().await;
        let r = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();

        let completed = ReservationStatusUpdate {
            status: Some("completed".into()),
        };
        let err = f
            .service
            .update_status(&f.alice, r.id, completed.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotRestaurantOwner);

        let done = f.service.update_status(&f.owner, r.id, completed).await.unwrap();
        assert_eq!(done.status, ReservationStatus::Completed);
    }

    #[tokio::test]
    async fn status_update_rejects_reserved_and_unknown_values() {
        let f = fixture().await;
        let r = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();

        for value in ["reserved", "done", ""] {
            let req = ReservationStatusUpdate {
                status: Some(value.into()),
            };
            let err = f.service.update_status(&f.owner, r.id, req).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ReservationInvalidStatus);
            assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        }

        // Validation happens before the lookup
        let req = ReservationStatusUpdate {
            status: Some("reserved".into()),
        };
        let err = f
            .service
            .update_status(&f.owner, ReservationId(404), req)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationInvalidStatus);
    }

    #[tokio::test]
    async fn restaurant_listing_is_owner_only_and_sorted() {
        let f = fixture().await;
        for (caller, date, time) in [
            (&f.alice, "2024-06-02", "12:00"),
            (&f.bob, "2024-06-01", "21:00"),
            (&f.alice, "2024-06-01", "18:30"),
        ] {
            f.service
                .create(caller, booking(&f, date, time))
                .await
                .unwrap();
        }

        let err = f
            .service
            .list_for_restaurant(&f.alice, f.restaurant)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotRestaurantOwner);

        let err = f
            .service
            .list_for_restaurant(&f.owner, RestaurantId(999))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RestaurantNotFound);

        let listed = f
            .service
            .list_for_restaurant(&f.owner, f.restaurant)
            .await
            .unwrap();
        let slots: Vec<String> = listed
            .iter()
            .map(|d| format!("{} {}", d.reservation.date, d.reservation.time.format("%H:%M")))
            .collect();
        assert_eq!(
            slots,
            vec!["2024-06-01 18:30", "2024-06-01 21:00", "2024-06-02 12:00"]
        );
        assert_eq!(listed[1].user.as_ref().unwrap().name, "Bob");
        assert_eq!(listed[0].table.as_ref().unwrap().table_number, 1);
        assert!(listed[0].restaurant.is_none());
    }

    #[tokio::test]
    async fn user_listing_embeds_restaurant_table_and_meal() {
        let f = fixture().await;
        let mut req = booking(&f, "2024-06-01", "19:00");
        req.meal_id = Some(f.meal);
        f.service.create(&f.alice, req).await.unwrap();
        f.service
            .create(&f.bob, booking(&f, "2024-06-01", "20:00"))
            .await
            .unwrap();

        let mine = f.service.list_for_user(&f.alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        let detail = &mine[0];
        assert_eq!(detail.restaurant.as_ref().unwrap().name, "Casa");
        assert_eq!(detail.meal.as_ref().unwrap().price, Decimal::new(1850, 2));
        assert!(detail.user.is_none());
    }

    #[tokio::test]
    async fn table_listing_filters_by_relation() {
        let f = fixture().await;
        f.service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();
        f.service
            .create(&f.bob, booking(&f, "2024-06-01", "20:00"))
            .await
            .unwrap();

        let all = f.service.list_for_table(&f.owner, f.table).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].restaurant.as_ref().unwrap().name, "Casa");

        let alices = f.service.list_for_table(&f.alice, f.table).await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].reservation.user_id, f.alice.id);

        let stranger = user(&f.store, 4, "Carol").await;
        let err = f
            .service
            .list_for_table(&stranger, f.table)
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

        let err = f
            .service
            .list_for_table(&f.owner, TableId(999))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);

        // An owner with an empty table still gets a list
        let bobs_table = f.service.list_for_table(&f.bob, f.other_table).await.unwrap();
        assert!(bobs_table.is_empty());
    }

    #[tokio::test]
    async fn get_is_visible_to_creator_and_owner_only() {
        let f = fixture().await;
        let mut req = booking(&f, "2024-06-01", "19:00");
        req.meal_id = Some(f.meal);
        let r = f.service.create(&f.alice, req).await.unwrap();

        let by_creator = f.service.get(&f.alice, r.id).await.unwrap();
        assert_eq!(by_creator.user.as_ref().unwrap().email, "alice@example.com");
        assert!(by_creator.restaurant.is_some());
        assert!(by_creator.table.is_some());
        assert!(by_creator.meal.is_some());

        f.service.get(&f.owner, r.id).await.unwrap();

        let err = f.service.get(&f.bob, r.id).await.unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn seconds_do_not_make_a_separate_slot() {
        let f = fixture().await;
        let first = f
            .service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();
        assert_eq!(first.time, NaiveTime::from_hms_opt(19, 0, 0).unwrap());

        let err = f
            .service
            .create(&f.bob, booking(&f, "2024-06-01", "19:00:30"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationSlotTaken);
        assert_eq!(count(&f).await, 1);

        // Moving another booking onto the same minute collides too
        let other = f
            .service
            .create(&f.bob, booking(&f, "2024-06-01", "20:00"))
            .await
            .unwrap();
        let req = ReservationUpdate {
            time: Some("19:00:45".into()),
            ..Default::default()
        };
        let err = f.service.update(&f.bob, other.id, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationSlotTaken);
    }

    #[tokio::test]
    async fn update_can_close_a_booking_while_moving_it_onto_a_held_slot() {
        let f = fixture().await;
        f.service
            .create(&f.alice, booking(&f, "2024-06-01", "19:00"))
            .await
            .unwrap();
        let mine = f
            .service
            .create(&f.bob, booking(&f, "2024-06-01", "20:00"))
            .await
            .unwrap();

        let req = ReservationUpdate {
            time: Some("19:00".into()),
            status: Some("canceled".into()),
            ..Default::default()
        };
        let r = f.service.update(&f.bob, mine.id, req).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Canceled);
        assert_eq!(r.time, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_reservation_are_not_found() {
        let f = fixture().await;
        let req = ReservationUpdate {
            time: Some("20:00".into()),
            ..Default::default()
        };
        let err = f
            .service
            .update(&f.alice, ReservationId(404), req)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);

        let err = f
            .service
            .delete(&f.alice, ReservationId(404))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
        assert_eq!(count(&f).await, 0);
    }

    #[tokio::test]
    async fn status_update_of_unknown_reservation_is_not_found() {
        let f = fixture().await;
        let req = ReservationStatusUpdate {
            status: Some("canceled".into()),
        };
        let err = f
            .service
            .update_status(&f.owner, ReservationId(404), req)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    /// Booking whose restaurant no longer resolves
    async fn orphaned(f: &Fixture) -> Reservation {
        let reservation = Reservation {
            id: ReservationId(50),
            user_id: f.alice.id,
            table_id: f.table,
            meal_id: None,
            restaurant_id: RestaurantId(77),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            status: ReservationStatus::Reserved,
            created_at: 0,
            updated_at: 0,
        };
        f.store.insert_reservation(reservation).await.unwrap()
    }

    #[tokio::test]
    async fn status_update_needs_the_linked_restaurant() {
        let f = fixture().await;
        let r = orphaned(&f).await;

        let req = ReservationStatusUpdate {
            status: Some("completed".into()),
        };
        let err = f.service.update_status(&f.owner, r.id, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RestaurantNotFound);

        let stored = f.store.find_reservation(r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Reserved);
    }

    #[tokio::test]
    async fn get_with_missing_restaurant_is_for_the_creator_only() {
        let f = fixture().await;
        let r = orphaned(&f).await;

        let detail = f.service.get(&f.alice, r.id).await.unwrap();
        assert_eq!(detail.reservation.id, r.id);
        assert!(detail.restaurant.is_none());
        assert!(detail.table.is_some());

        for caller in [&f.owner, &f.bob] {
            let err = f.service.get(caller, r.id).await.unwrap_err();
            assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
        }
    }
}
