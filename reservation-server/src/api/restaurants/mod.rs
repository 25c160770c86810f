//! Restaurant catalog API 模块
//!
//! 创建桌台和菜品需要是餐厅所有者；读取对所有已登录用户开放。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route(
            "/{id}/tables",
            get(handler::list_tables).post(handler::create_table),
        )
        .route(
            "/{id}/meals",
            get(handler::list_meals).post(handler::create_meal),
        )
}
