use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别
/// 默认级别: warn（正常转换只输出结果提示）
///
/// 示例:
/// - RUST_LOG=debug http2postman api.http out.json
/// - RUST_LOG=http2postman::parser=trace http2postman api.http out.json
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // 日志写到 stderr，避免和转换结果提示混在一起
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::debug!("Logger initialized");
}
