//! Catalog Service - restaurants and the tables and meals they offer

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    DiningTable, DiningTableCreate, Meal, MealCreate, MealId, Restaurant, RestaurantCreate,
    RestaurantId, TableId,
};

use crate::auth::CurrentUser;
use crate::db::{RepoError, Store};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};

const DEFAULT_TABLE_CAPACITY: i32 = 4;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("backend", &self.store.backend())
            .finish()
    }
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_restaurant(&self, id: RestaurantId) -> AppResult<Restaurant> {
        self.store
            .find_restaurant(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound).with_detail("id", id.value()))
    }

    /// Restaurant the caller owns, for owner-only writes
    async fn owned_restaurant(
        &self,
        caller: &CurrentUser,
        id: RestaurantId,
    ) -> AppResult<Restaurant> {
        let restaurant = self.get_restaurant(id).await?;
        if !restaurant.is_owned_by(caller.id) {
            return Err(AppError::new(ErrorCode::NotRestaurantOwner));
        }
        Ok(restaurant)
    }

    /// The caller becomes the owner
    pub async fn create_restaurant(
        &self,
        caller: &CurrentUser,
        req: RestaurantCreate,
    ) -> AppResult<Restaurant> {
        validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&req.address, "address", MAX_ADDRESS_LEN)?;

        let restaurant = Restaurant {
            id: RestaurantId::generate(),
            name: req.name.trim().to_string(),
            address: req.address.trim().to_string(),
            owned_by: caller.id,
            created_at: shared::util::now_millis(),
        };
        let created = self.store.insert_restaurant(restaurant).await?;

        tracing::info!(restaurant_id = %created.id, owner = %caller.id, "Restaurant created");
        Ok(created)
    }

    pub async fn create_table(
        &self,
        caller: &CurrentUser,
        restaurant_id: RestaurantId,
        req: DiningTableCreate,
    ) -> AppResult<DiningTable> {
        let restaurant = self.owned_restaurant(caller, restaurant_id).await?;

        if req.table_number < 1 {
            return Err(AppError::validation("tableNumber must be at least 1")
                .with_detail("field", "tableNumber"));
        }
        let capacity = req.capacity.unwrap_or(DEFAULT_TABLE_CAPACITY);
        if capacity < 1 {
            return Err(
                AppError::validation("capacity must be at least 1").with_detail("field", "capacity")
            );
        }

        let table = DiningTable {
            id: TableId::generate(),
            restaurant_id: restaurant.id,
            table_number: req.table_number,
            capacity,
        };
        let created = match self.store.insert_table(table).await {
            Ok(created) => created,
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::TableNumberExists)
                    .with_detail("tableNumber", req.table_number));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            table_id = %created.id,
            restaurant_id = %restaurant.id,
            table_number = created.table_number,
            "Table created"
        );
        Ok(created)
    }

    pub async fn list_tables(&self, restaurant_id: RestaurantId) -> AppResult<Vec<DiningTable>> {
        let restaurant = self.get_restaurant(restaurant_id).await?;
        Ok(self.store.list_tables(restaurant.id).await?)
    }

    pub async fn create_meal(
        &self,
        caller: &CurrentUser,
        restaurant_id: RestaurantId,
        req: MealCreate,
    ) -> AppResult<Meal> {
        let restaurant = self.owned_restaurant(caller, restaurant_id).await?;

        validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
        if req.price < Decimal::ZERO {
            return Err(AppError::validation("price must not be negative").with_detail("field", "price"));
        }

        let meal = Meal {
            id: MealId::generate(),
            restaurant_id: restaurant.id,
            name: req.name.trim().to_string(),
            price: req.price.round_dp(2),
        };
        let created = self.store.insert_meal(meal).await?;

        tracing::info!(meal_id = %created.id, restaurant_id = %restaurant.id, "Meal created");
        Ok(created)
    }

    pub async fn list_meals(&self, restaurant_id: RestaurantId) -> AppResult<Vec<Meal>> {
        let restaurant = self.get_restaurant(restaurant_id).await?;
        Ok(self.store.list_meals(restaurant.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use shared::models::UserId;

    fn caller(id: i64) -> CurrentUser {
        CurrentUser {
            id: UserId(id),
            name: format!("user-{id}"),
            email: format!("user-{id}@example.com"),
        }
    }

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()))
    }

    async fn restaurant(service: &CatalogService, owner: &CurrentUser) -> Restaurant {
        service
            .create_restaurant(
                owner,
                RestaurantCreate {
                    name: " Casa ".into(),
                    address: "1 Main St".into(),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn caller_owns_the_restaurant_they_create() {
        let service = service();
        let owner = caller(1);
        let r = restaurant(&service, &owner).await;
        assert_eq!(r.owned_by, owner.id);
        assert_eq!(r.name, "Casa");
        assert_eq!(service.get_restaurant(r.id).await.unwrap().id, r.id);
    }

    #[tokio::test]
    async fn blank_restaurant_name_is_rejected() {
        let err = service()
            .create_restaurant(
                &caller(1),
                RestaurantCreate {
                    name: "  ".into(),
                    address: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn only_the_owner_adds_tables() {
        let service = service();
        let owner = caller(1);
        let r = restaurant(&service, &owner).await;

        let req = DiningTableCreate {
            table_number: 1,
            capacity: None,
        };
        let err = service
            .create_table(&caller(2), r.id, req.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotRestaurantOwner);

        let table = service.create_table(&owner, r.id, req.clone()).await.unwrap();
        assert_eq!(table.capacity, DEFAULT_TABLE_CAPACITY);

        let err = service.create_table(&owner, r.id, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNumberExists);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn table_capacity_must_be_positive() {
        let service = service();
        let owner = caller(1);
        let r = restaurant(&service, &owner).await;
        let err = service
            .create_table(
                &owner,
                r.id,
                DiningTableCreate {
                    table_number: 2,
                    capacity: Some(0),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn meals_are_listed_by_name() {
        let service = service();
        let owner = caller(1);
        let r = restaurant(&service, &owner).await;
        for (name, cents) in [("Tortilla", 950), ("Gazpacho", 700)] {
            service
                .create_meal(
                    &owner,
                    r.id,
                    MealCreate {
                        name: name.into(),
                        price: Decimal::new(cents, 2),
                    },
                )
                .await
                .unwrap();
        }

        let names: Vec<String> = service
            .list_meals(r.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Gazpacho", "Tortilla"]);

        let err = service
            .create_meal(
                &owner,
                r.id,
                MealCreate {
                    name: "Refund".into(),
                    price: Decimal::new(-1, 0),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn listing_an_unknown_restaurant_is_not_found() {
        let err = service().list_tables(RestaurantId(9)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RestaurantNotFound);
    }
}
