//! Global tracing subscriber for the controller binary

use anyhow::{Context, Result};
use footlight_core::LogConfig;
use std::fs::File;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Flushes the log file when dropped
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// `RUST_LOG` overrides the configured level.
fn level_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy()
}

/// Prune old runs and create this run's log file.
fn open_log_file(config: &LogConfig) -> Result<(File, PathBuf)> {
    config.ensure_log_directory().with_context(|| {
        format!("Cannot create log directory {:?}", config.log_directory)
    })?;

    match config.cleanup_old_logs() {
        Ok(0) => {}
        Ok(removed) => eprintln!("footlight: pruned {} old log files", removed),
        Err(e) => eprintln!("footlight: log pruning failed: {}", e),
    }

    let path = config.current_log_path();
    let file = File::create(&path).with_context(|| format!("Cannot create log file {:?}", path))?;
    Ok((file, path))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process when file output is enabled.
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    // stdout belongs to the switch simulator prompt
    let console = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(level_filter(config))
    });

    let mut log_path = None;
    let (file, guard) = if config.file_output {
        let (file, path) = open_log_file(config)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        log_path = Some(path);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(level_filter(config));
        (Some(layer), Some(LogGuard { _guard: guard }))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    tracing::info!("Log level {}", config.parse_level());
    if let Some(path) = log_path {
        tracing::info!("Writing log file {:?}", path);
    }
    Ok(guard)
}
