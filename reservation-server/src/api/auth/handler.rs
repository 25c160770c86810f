//! Authentication Handlers

use axum::extract::State;
use http::StatusCode;
use shared::models::{AuthPayload, LoginRequest, RegisterRequest, UserPayload};

use crate::api::extract::ApiJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// POST /auth/register - 注册并返回令牌
pub async fn register(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, ApiResponse<AuthPayload>)> {
    let payload = state.accounts.register(req).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Registered", payload),
    ))
}

/// POST /auth/login - 登录
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let payload = state.accounts.login(req).await?;
    Ok(ApiResponse::success_with_message("Logged in", payload))
}

/// GET /auth/me - 当前用户
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<UserPayload>> {
    let user = state.accounts.me(current_user.id).await?;
    Ok(ApiResponse::success(UserPayload { user }))
}
