//! Reservation Server - 餐厅订座服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): `Store` trait，PostgreSQL 与内存两种后端
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **业务** (`services`): 订座、餐厅目录、账户
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! reservation-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码哈希
//! ├── db/            # Store trait 与后端实现
//! ├── services/      # 业务规则
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::{MemoryStore, PgStore, Store};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger;

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 按配置初始化日志
pub fn setup_environment(config: &Config) {
    init_logger(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
}
