use crate::cli::Args;
use crate::config::Config;
use crate::error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_FILE_NAME: &str = "match_history.log";

/// Builds the filter shared by every output: `RUST_LOG` plus a default
/// directive for this crate.
fn crate_filter(debug: bool) -> Result<EnvFilter, AppError> {
    let directive = if debug {
        "match_history=debug"
    } else {
        "match_history=info"
    };
    let directive = directive
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Splits a log file path into its directory and file name
fn resolve_log_location(custom_path: Option<&String>) -> (String, String) {
    match custom_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_LOG_FILE_NAME);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (
            Config::get_log_dir_path(),
            DEFAULT_LOG_FILE_NAME.to_string(),
        ),
    }
}

/// Sets up logging configuration for the application.
///
/// - Always logs to a daily rolling file
/// - Debug mode also logs to stdout, at debug level
/// - `--log-file` wins over the configured `log_file_path`
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(
    args: &Args,
    config_log_path: Option<&String>,
) -> Result<(String, WorkerGuard), AppError> {
    let custom_log_path = args.log_file.as_ref().or(config_log_path);
    let (log_dir, log_file_name) = resolve_log_location(custom_log_path);

    // Create log directory if it doesn't exist
    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must outlive every log call or buffered lines are lost
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(crate_filter(args.debug)?);

    let registry = tracing_subscriber::registry().with(file_layer);

    let init_result = if args.debug {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(stdout)
                    .with_ansi(true)
                    .with_filter(crate_filter(true)?),
            )
            .try_init()
    } else {
        registry.try_init()
    };
    init_result.map_err(|e| AppError::log_setup_error(e.to_string()))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}
