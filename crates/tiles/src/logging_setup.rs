use anyhow::{Context, Result};
use tiles_control::LogConfig;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Keeps the file writer thread alive; flushes on drop
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Install the global subscriber: stderr console output and, when enabled,
/// a non-blocking writer to today's log file.
pub fn init(config: &LogConfig, verbose: bool) -> Result<Option<LogGuard>> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        config.parse_level()
    };
    // RUST_LOG wins over the configured level
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    };

    // stdout is reserved for command output
    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter())
    });

    let log_file = config
        .open_log_file()
        .with_context(|| format!("Failed to open log file in {:?}", config.log_dir))?;

    let mut log_path = None;
    let mut guard = None;
    let file_layer = log_file.map(|(path, file)| {
        let (writer, worker_guard) = tracing_appender::non_blocking(file);
        log_path = Some(path);
        guard = Some(LogGuard {
            _guard: worker_guard,
        });
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter())
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_path {
        tracing::info!("Logging to file: {}", path.display());
    }
    tracing::debug!("Logging initialized at level: {}", level);

    Ok(guard)
}
