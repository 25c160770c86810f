//! HTTP API - 路由和处理器
//!
//! | 模块 | 前缀 | 认证 |
//! |------|------|------|
//! | [`health`] | /health | 无 |
//! | [`auth`] | /auth | 登录/注册无，/auth/me 需要 |
//! | [`restaurants`] | /restaurants | 需要 |
//! | [`reservations`] | /reservations | 需要 |

pub mod auth;
pub mod extract;
pub mod health;
pub mod reservations;
pub mod restaurants;

use std::time::Duration;

use axum::{BoxError, Router, error_handling::HandleErrorLayer, middleware};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::with_message(ErrorCode::TimeoutError, "Request timed out")
    } else {
        AppError::internal(format!("Unhandled middleware error: {err}"))
    }
}

/// Fallback for unknown routes, so they also get the response envelope
async fn not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Route not found")
}

/// Build the Axum router (without state)
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(restaurants::router())
        .merge(reservations::router())
        .fallback(not_found)
}

/// Full application: routes, state and the HTTP middleware stack
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    routes()
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(timeout),
        )
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}
