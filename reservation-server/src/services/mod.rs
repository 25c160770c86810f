//! 服务层 - 业务规则
//!
//! - [`ReservationService`] - 订座生命周期、归属校验、时段冲突
//! - [`CatalogService`] - 餐厅、桌台、菜品
//! - [`AccountService`] - 注册、登录

pub mod account_service;
pub mod catalog_service;
pub mod reservation_service;

pub use account_service::AccountService;
pub use catalog_service::CatalogService;
pub use reservation_service::ReservationService;
