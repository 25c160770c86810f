use reservation_server::{Config, Server, ServerState, setup_environment};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // 1. Load .env file
    let _ = dotenvy::dotenv();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 日志
    setup_environment(&config);

    tracing::info!(
        "🍽️  Reservation server starting (env: {})",
        config.environment
    );

    // 4. 初始化服务器状态 (PostgreSQL 或内存存储)
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
