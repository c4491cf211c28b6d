use anyhow::Context;
use dotenvy::dotenv;
use relay_gateway::logging::init_logging;
use relay_gateway::middleware::CorsPolicy;
use relay_gateway::{urls, AppState, Settings};
use tokio::signal;
use tracing::{error, info, warn};

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => warn!("🛑 Ctrl+C received! Shutting down gracefully..."),
        Err(e) => {
            // 监听不到信号时不要立刻退出，交给进程管理器处理
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A. 加载配置与日志
    dotenv().ok(); // 读取 .env 文件
    let settings = Settings::load().context("Failed to load configuration")?;
    let _log_guard = init_logging(&settings.logging); // 初始化日志，_guard 不能丢

    info!("Starting {} ⚡️", settings.service_name);

    // 只提示，不在启动时构建客户端；真正缺失时由对应接口返回错误
    if std::env::var(&settings.completion.api_key_env).is_err() {
        warn!(
            "{} is not set; /optimize and /reverse-ai will fail until it is configured",
            settings.completion.api_key_env
        );
    }
    if std::env::var(&settings.mail.api_key_env).is_err() {
        warn!("{} is not set; /send-email will report failures", settings.mail.api_key_env);
    }

    // B. 组装共享状态和路由
    let state = AppState::from_settings(&settings);
    let app = urls::router(
        state,
        CorsPolicy::new(&settings.cors.allowed_origins),
        settings.server.body_limit_bytes,
    );

    // C. 启动 HTTP 服务
    let host = settings.server.host.as_str();
    let port = settings.server.port;
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited with error")?;

    info!("👋 Relay Shutdown Complete.");
    Ok(())
}
