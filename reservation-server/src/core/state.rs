use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::{MemoryStore, PgStore, Store};
use crate::services::{AccountService, CatalogService, ReservationService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，clone 成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | store | 存储后端 (PostgreSQL / 内存) |
/// | jwt_service | JWT 认证服务 |
/// | reservations / catalog / accounts | 业务服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub jwt_service: Arc<JwtService>,
    pub reservations: ReservationService,
    pub catalog: CatalogService,
    pub accounts: AccountService,
}

impl ServerState {
    /// 在给定存储上组装服务
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            reservations: ReservationService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            accounts: AccountService::new(store.clone(), jwt_service.clone()),
            config,
            store,
            jwt_service,
        }
    }

    /// 按配置选择存储后端并初始化
    ///
    /// 设置了 `DATABASE_URL` 时连接 PostgreSQL 并执行迁移，否则使用内存存储。
    pub async fn initialize(config: &Config) -> Result<Self> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                Arc::new(PgStore::connect(url, config.database_max_connections).await?)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
                Arc::new(MemoryStore::new())
            }
        };
        tracing::info!(backend = store.backend(), "Storage ready");

        Ok(Self::new(config.clone(), store))
    }

    /// 内存存储 (测试用)
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }
}
