use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{PipelineError, Result};

/// Install the global subscriber: stderr always, plus an appending log file
/// when `log_file` is given. The returned guard must outlive the program's
/// logging or buffered file lines are lost.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "warn" };
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                PipelineError::Config(format!("Invalid log file path: {}", path.display()))
            })?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("info"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PipelineError::Config(format!("Failed to initialise logging: {}", e)))?;

    tracing::info!("New execution started");
    Ok(guard)
}
