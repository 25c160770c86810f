//! Reservation API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /reservations/create | POST | 订座 |
//! | /reservations/update/{id} | PUT | 修改自己的订座 |
//! | /reservations/delete/{id} | DELETE | 删除自己的订座 |
//! | /reservations/restaurant/{restaurant_id} | GET | 餐厅全部订座 (所有者) |
//! | /reservations/{id}/status | PATCH | 取消/完成 (餐厅所有者) |
//! | /reservations/user | GET | 我的订座 |
//! | /reservations/table/{table_id} | GET | 桌台订座 |
//! | /reservations/{id} | GET | 单个订座 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(handler::create))
        .route("/update/{id}", put(handler::update))
        .route("/delete/{id}", delete(handler::delete))
        .route("/restaurant/{restaurant_id}", get(handler::list_for_restaurant))
        .route("/{id}/status", patch(handler::update_status))
        .route("/user", get(handler::list_for_user))
        .route("/table/{table_id}", get(handler::list_for_table))
        .route("/{id}", get(handler::get_by_id))
}
