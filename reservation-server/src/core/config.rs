use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | (未设置) | PostgreSQL 连接串，未设置时使用内存存储 |
/// | DATABASE_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | (未设置) | 按天滚动的日志目录 |
/// | JWT_SECRET | (开发环境自动生成) | 至少 32 字符 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | JWT_ISSUER | reservation-server | 签发者 |
/// | JWT_AUDIENCE | reservation-clients | 受众 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=postgres://localhost/reservations HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// PostgreSQL 连接串；`None` 表示内存存储
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 开发环境默认值，不读取环境变量
    ///
    /// 常用于测试场景
    pub fn defaults() -> Self {
        Self {
            http_port: 3000,
            database_url: None,
            database_max_connections: 5,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            jwt: JwtConfig::development(),
            request_timeout_ms: 30000,
            shutdown_timeout_ms: 10000,
        }
    }

    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；非开发环境必须提供 `JWT_SECRET`。
    pub fn from_env() -> Result<Self> {
        let defaults = Self::defaults();
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| defaults.environment.clone());
        let jwt = JwtConfig::from_env(environment == "development")?;

        let config = Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(defaults.http_port),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: env_parse("LOG_JSON").unwrap_or(defaults.log_json),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            jwt,
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS")
                .unwrap_or(defaults.shutdown_timeout_ms),
        };

        if config.database_max_connections == 0 {
            return Err(ServerError::Config(
                "DATABASE_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 存储后端名称 (用于日志和健康检查)
    pub fn storage_backend(&self) -> &'static str {
        if self.database_url.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
