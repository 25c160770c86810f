//! Restaurant Catalog Handlers

use axum::extract::State;
use http::StatusCode;
use shared::models::{
    DiningTableCreate, MealCreate, MealPayload, MealsPayload, RestaurantCreate, RestaurantId,
    RestaurantPayload, TablePayload, TablesPayload,
};

use crate::api::extract::{ApiJson, ApiPath};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// POST /restaurants - 创建餐厅 (调用者成为所有者)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiJson(req): ApiJson<RestaurantCreate>,
) -> AppResult<(StatusCode, ApiResponse<RestaurantPayload>)> {
    let restaurant = state.catalog.create_restaurant(&current_user, req).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Restaurant created", RestaurantPayload { restaurant }),
    ))
}

/// GET /restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _current_user: CurrentUser,
    ApiPath(id): ApiPath<RestaurantId>,
) -> AppResult<ApiResponse<RestaurantPayload>> {
    let restaurant = state.catalog.get_restaurant(id).await?;
    Ok(ApiResponse::success(RestaurantPayload { restaurant }))
}

/// POST /restaurants/{id}/tables - 添加桌台 (所有者)
pub async fn create_table(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<RestaurantId>,
    ApiJson(req): ApiJson<DiningTableCreate>,
) -> AppResult<(StatusCode, ApiResponse<TablePayload>)> {
    let table = state.catalog.create_table(&current_user, id, req).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Table created", TablePayload { table }),
    ))
}

/// GET /restaurants/{id}/tables
pub async fn list_tables(
    State(state): State<ServerState>,
    _current_user: CurrentUser,
    ApiPath(id): ApiPath<RestaurantId>,
) -> AppResult<ApiResponse<TablesPayload>> {
    let tables = state.catalog.list_tables(id).await?;
    Ok(ApiResponse::success(TablesPayload { tables }))
}

/// POST /restaurants/{id}/meals - 添加菜品 (所有者)
pub async fn create_meal(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<RestaurantId>,
    ApiJson(req): ApiJson<MealCreate>,
) -> AppResult<(StatusCode, ApiResponse<MealPayload>)> {
    let meal = state.catalog.create_meal(&current_user, id, req).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Meal created", MealPayload { meal }),
    ))
}

/// GET /restaurants/{id}/meals
pub async fn list_meals(
    State(state): State<ServerState>,
    _current_user: CurrentUser,
    ApiPath(id): ApiPath<RestaurantId>,
) -> AppResult<ApiResponse<MealsPayload>> {
    let meals = state.catalog.list_meals(id).await?;
    Ok(ApiResponse::success(MealsPayload { meals }))
}
