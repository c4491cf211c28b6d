use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;

// =========================================================================
// 日志配置 (输出到控制台 + 文件)
// =========================================================================
pub fn init_logging(settings: &LoggingSettings) -> WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // 1. 文件输出器：按天滚动 (<dir>/<file_name>.2025-xx-xx)
    let file_appender = tracing_appender::rolling::daily(&settings.dir, &settings.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // 2. 控制台层：请求 span (request_id/method/path) 会跟在每行后面
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .compact();

    // 3. 文件层：完整格式，便于按 request_id 排查
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    // 4. RUST_LOG 优先，其次是配置里的 level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard // 必须返回 guard，否则日志线程会立即销毁
}
