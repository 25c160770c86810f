//! In-memory store
//!
//! Everything lives behind one `RwLock`, so the slot check and the write of
//! a reservation happen under the same write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{
    DiningTable, Meal, MealId, Reservation, ReservationId, Restaurant, RestaurantId, Slot, TableId,
    User, UserId,
};

use super::{
    MealRepository, RepoError, RepoResult, ReservationFilter, ReservationRepository,
    RestaurantRepository, Store, TableRepository, UserRepository, sort_reservations,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    restaurants: HashMap<RestaurantId, Restaurant>,
    dining_tables: HashMap<TableId, DiningTable>,
    meals: HashMap<MealId, Meal>,
    reservations: HashMap<ReservationId, Reservation>,
}

impl Tables {
    fn active_in_slot(&self, slot: Slot, exclude: Option<ReservationId>) -> Option<&Reservation> {
        self.reservations.values().find(|r| {
            r.status.holds_slot() && r.slot() == slot && Some(r.id) != exclude
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: User) -> RepoResult<User> {
        let mut tables = self.inner.write();
        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(RepoError::Duplicate(format!("email {}", user.email)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.inner.read().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl RestaurantRepository for MemoryStore {
    async fn insert_restaurant(&self, restaurant: Restaurant) -> RepoResult<Restaurant> {
        self.inner
            .write()
            .restaurants
            .insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn find_restaurant(&self, id: RestaurantId) -> RepoResult<Option<Restaurant>> {
        Ok(self.inner.read().restaurants.get(&id).cloned())
    }
}

#[async_trait]
impl TableRepository for MemoryStore {
    async fn insert_table(&self, table: DiningTable) -> RepoResult<DiningTable> {
        let mut tables = self.inner.write();
        if tables.dining_tables.values().any(|t| {
            t.restaurant_id == table.restaurant_id && t.table_number == table.table_number
        }) {
            return Err(RepoError::Duplicate(format!(
                "table number {}",
                table.table_number
            )));
        }
        tables.dining_tables.insert(table.id, table.clone());
        Ok(table)
    }

    async fn find_table(&self, id: TableId) -> RepoResult<Option<DiningTable>> {
        Ok(self.inner.read().dining_tables.get(&id).cloned())
    }

    async fn find_table_in_restaurant(
        &self,
        id: TableId,
        restaurant_id: RestaurantId,
    ) -> RepoResult<Option<DiningTable>> {
        Ok(self
            .inner
            .read()
            .dining_tables
            .get(&id)
            .filter(|t| t.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn list_tables(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<DiningTable>> {
        let mut tables: Vec<DiningTable> = self
            .inner
            .read()
            .dining_tables
            .values()
            .filter(|t| t.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        tables.sort_by_key(|t| t.table_number);
        Ok(tables)
    }
}

#[async_trait]
impl MealRepository for MemoryStore {
    async fn insert_meal(&self, meal: Meal) -> RepoResult<Meal> {
        self.inner.write().meals.insert(meal.id, meal.clone());
        Ok(meal)
    }

    async fn find_meal(&self, id: MealId) -> RepoResult<Option<Meal>> {
        Ok(self.inner.read().meals.get(&id).cloned())
    }

    async fn find_meal_in_restaurant(
        &self,
        id: MealId,
        restaurant_id: RestaurantId,
    ) -> RepoResult<Option<Meal>> {
        Ok(self
            .inner
            .read()
            .meals
            .get(&id)
            .filter(|m| m.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn list_meals(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<Meal>> {
        let mut meals: Vec<Meal> = self
            .inner
            .read()
            .meals
            .values()
            .filter(|m| m.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        meals.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(meals)
    }
}

#[async_trait]
impl ReservationRepository for MemoryStore {
    async fn insert_reservation(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let mut tables = self.inner.write();
        if reservation.status.holds_slot()
            && tables.active_in_slot(reservation.slot(), None).is_some()
        {
            return Err(RepoError::Duplicate("reservation slot".into()));
        }
        tables
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update_reservation(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let mut tables = self.inner.write();
        if !tables.reservations.contains_key(&reservation.id) {
            return Err(RepoError::NotFound(format!("reservation {}", reservation.id)));
        }
        if reservation.status.holds_slot()
            && tables
                .active_in_slot(reservation.slot(), Some(reservation.id))
                .is_some()
        {
            return Err(RepoError::Duplicate("reservation slot".into()));
        }
        tables
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepoResult<bool> {
        Ok(self.inner.write().reservations.remove(&id).is_some())
    }

    async fn find_reservation(&self, id: ReservationId) -> RepoResult<Option<Reservation>> {
        Ok(self.inner.read().reservations.get(&id).cloned())
    }

    async fn find_active_in_slot(
        &self,
        slot: Slot,
        exclude: Option<ReservationId>,
    ) -> RepoResult<Option<Reservation>> {
        Ok(self.inner.read().active_in_slot(slot, exclude).cloned())
    }

    async fn list_reservations(&self, filter: ReservationFilter) -> RepoResult<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self
            .inner
            .read()
            .reservations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_reservations(&mut reservations);
        Ok(reservations)
    }
}

impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shared::models::ReservationStatus;

    fn reservation(id: i64, table: i64, hour: u32, status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId(id),
            user_id: UserId(1),
            table_id: TableId(table),
            meal_id: None,
            restaurant_id: RestaurantId(1),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            status,
            created_at: id,
            updated_at: id,
        }
    }

    #[tokio::test]
    async fn second_live_booking_for_a_slot_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert_reservation(reservation(1, 7, 19, ReservationStatus::Reserved))
            .await
            .unwrap();

        let err = store
            .insert_reservation(reservation(2, 7, 19, ReservationStatus::Reserved))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // Different table, same time is fine
        store
            .insert_reservation(reservation(3, 8, 19, ReservationStatus::Reserved))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn canceled_booking_frees_the_slot() {
        let store = MemoryStore::new();
        let mut first = store
            .insert_reservation(reservation(1, 7, 19, ReservationStatus::Reserved))
            .await
            .unwrap();
        first.status = ReservationStatus::Canceled;
        store.update_reservation(first).await.unwrap();

        store
            .insert_reservation(reservation(2, 7, 19, ReservationStatus::Reserved))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_of_deleted_record_is_not_found() {
        let store = MemoryStore::new();
        let r = store
            .insert_reservation(reservation(1, 7, 19, ReservationStatus::Reserved))
            .await
            .unwrap();
        assert!(store.delete_reservation(r.id).await.unwrap());
        assert!(!store.delete_reservation(r.id).await.unwrap());
        assert!(matches!(
            store.update_reservation(r).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_is_ordered_by_date_then_time() {
        let store = MemoryStore::new();
        for (id, hour) in [(1, 21), (2, 12), (3, 18)] {
            store
                .insert_reservation(reservation(id, id, hour, ReservationStatus::Reserved))
                .await
                .unwrap();
        }
        let listed = store
            .list_reservations(ReservationFilter::Restaurant(RestaurantId(1)))
            .await
            .unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn table_numbers_are_unique_per_restaurant() {
        let store = MemoryStore::new();
        let table = |id: i64, restaurant: i64| DiningTable {
            id: TableId(id),
            restaurant_id: RestaurantId(restaurant),
            table_number: 5,
            capacity: 4,
        };
        store.insert_table(table(1, 1)).await.unwrap();
        assert!(matches!(
            store.insert_table(table(2, 1)).await,
            Err(RepoError::Duplicate(_))
        ));
        store.insert_table(table(3, 2)).await.unwrap();

        assert!(
            store
                .find_table_in_restaurant(TableId(3), RestaurantId(1))
                .await
                .unwrap()
                .is_none()
        );
    }
}
