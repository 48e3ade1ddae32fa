use clap::Parser;
use match_history::cli::{Args, is_cache_operation, is_config_operation};
use match_history::commands::{
    handle_clear_cache_command, handle_config_update_command, handle_fetch_command,
    handle_list_cache_command, handle_list_config_command, validate_args,
};
use match_history::config::Config;
use match_history::error::AppError;
use match_history::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    validate_args(&args)?;

    // Configuration operations run before config is loaded, so they work on a fresh install
    if is_config_operation(&args) {
        if args.list_config {
            return handle_list_config_command().await;
        }
        return handle_config_update_command(&args).await;
    }

    let config = Config::load().await?;

    // Keep the guard alive until exit so buffered log lines are flushed
    let (log_file_path, _guard) = setup_logging(&args, config.log_file_path.as_ref()).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if is_cache_operation(&args) {
        if args.clear_cache {
            handle_clear_cache_command(&config).await?;
        }
        if args.list_cache {
            handle_list_cache_command(&config).await?;
        }
        return Ok(());
    }

    handle_fetch_command(&args, &config).await
}
