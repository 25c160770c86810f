//! Reservation API Handlers

use axum::extract::State;
use http::StatusCode;
use shared::models::{
    ReservationCreate, ReservationDetail, ReservationId, ReservationPayload, ReservationStatusUpdate,
    ReservationUpdate, ReservationsPayload, RestaurantId, TableId,
};

use crate::api::extract::{ApiJson, ApiPath};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// POST /reservations/create - 订座
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiJson(req): ApiJson<ReservationCreate>,
) -> AppResult<(StatusCode, ApiResponse<ReservationPayload>)> {
    let reservation = state.reservations.create(&current_user, req).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Reservation created", ReservationPayload { reservation }),
    ))
}

/// PUT /reservations/update/{id} - 修改日期、时间或状态
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<ReservationId>,
    ApiJson(req): ApiJson<ReservationUpdate>,
) -> AppResult<ApiResponse<ReservationPayload>> {
    let reservation = state.reservations.update(&current_user, id, req).await?;
    Ok(ApiResponse::success_with_message(
        "Reservation updated",
        ReservationPayload { reservation },
    ))
}

/// DELETE /reservations/delete/{id} - 永久删除
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<ReservationId>,
) -> AppResult<ApiResponse<()>> {
    state.reservations.delete(&current_user, id).await?;
    Ok(ApiResponse::ok_with_message("Reservation deleted successfully"))
}

/// GET /reservations/restaurant/{restaurant_id} - 餐厅全部订座
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(restaurant_id): ApiPath<RestaurantId>,
) -> AppResult<ApiResponse<ReservationsPayload>> {
    let reservations = state
        .reservations
        .list_for_restaurant(&current_user, restaurant_id)
        .await?;
    Ok(ApiResponse::success(ReservationsPayload { reservations }))
}

/// PATCH /reservations/{id}/status - 餐厅所有者取消或完成
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<ReservationId>,
    ApiJson(req): ApiJson<ReservationStatusUpdate>,
) -> AppResult<ApiResponse<ReservationPayload>> {
    let reservation = state
        .reservations
        .update_status(&current_user, id, req)
        .await?;
    Ok(ApiResponse::success_with_message(
        "Reservation status updated",
        ReservationPayload { reservation },
    ))
}

/// GET /reservations/user - 我的订座
pub async fn list_for_user(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<ReservationsPayload>> {
    let reservations = state.reservations.list_for_user(&current_user).await?;
    Ok(ApiResponse::success(ReservationsPayload { reservations }))
}

/// GET /reservations/table/{table_id}
pub async fn list_for_table(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(table_id): ApiPath<TableId>,
) -> AppResult<ApiResponse<ReservationsPayload>> {
    let reservations = state
        .reservations
        .list_for_table(&current_user, table_id)
        .await?;
    Ok(ApiResponse::success(ReservationsPayload { reservations }))
}

/// GET /reservations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<ReservationId>,
) -> AppResult<ApiResponse<ReservationPayload<ReservationDetail>>> {
    let reservation = state.reservations.get(&current_user, id).await?;
    Ok(ApiResponse::success(ReservationPayload { reservation }))
}
