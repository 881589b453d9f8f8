use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the tracing stack: rolling file appender plus a colored stdout
/// layer, or stdout only when `log_dir` is empty (CI runs).
///
/// The returned guard must be held for the process lifetime or buffered log
/// lines are lost on exit.
pub fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let filter_str = if config.enable_tracing {
        config.log_level.clone()
    } else {
        // Cap our own targets at info unless per-stage tracing is requested
        format!("{},cogroup_bench=info", config.log_level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_dir.is_empty() {
        registry.with(fmt::layer().with_target(false)).init();
        return None;
    }

    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true) // Keep target in JSON for structured queries
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    Some(guard)
}
