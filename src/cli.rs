use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

use crate::data_fetcher::models::PlatformRoute;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// True when the invocation only touches configuration and needs no API access
pub fn is_config_operation(args: &Args) -> bool {
    args.list_config
        || args.new_api_key.is_some()
        || args.new_region.is_some()
        || args.new_count.is_some()
}

/// True when the invocation only touches the local cache
pub fn is_cache_operation(args: &Args) -> bool {
    args.list_cache || args.clear_cache
}

/// League of Legends match history downloader
///
/// Resolves an account, lists its recent matches and stores each match
/// document in a local cache directory. Matches already cached are not
/// downloaded again.
///
/// Examples:
///   match_history --riot-id "Faker#KR1" --region kr --count 50
///   match_history --puuid <PUUID> --region euw1
///   match_history --list-cache
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Riot ID of the account to fetch, as GameName#TagLine.
    #[arg(long = "riot-id", short = 'i', value_name = "NAME#TAG", conflicts_with = "puuid")]
    pub riot_id: Option<String>,

    /// PUUID of the account to fetch. Skips the account lookup.
    #[arg(long = "puuid", short = 'u')]
    pub puuid: Option<String>,

    /// Platform the account plays on (e.g. na1, euw1, kr). Defaults to the configured region.
    #[arg(long = "region", short = 'r')]
    pub region: Option<PlatformRoute>,

    /// Number of matches to load. Defaults to the configured count.
    #[arg(long = "count", short = 'n')]
    pub count: Option<usize>,

    /// Don't print progress while fetching; only the final summary is shown.
    #[arg(long = "quiet", short = 'q')]
    pub quiet: bool,

    /// List the matches in the local cache
    #[arg(long = "list-cache", help_heading = "Cache")]
    pub list_cache: bool,

    /// Delete every cached match
    #[arg(long = "clear-cache", help_heading = "Cache")]
    pub clear_cache: bool,

    /// Update the API key in config. Will prompt for a new key if not provided.
    #[arg(
        long = "set-api-key",
        help_heading = "Configuration",
        value_name = "API_KEY",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub new_api_key: Option<String>,

    /// Update the default region in config
    #[arg(long = "set-region", help_heading = "Configuration", value_name = "REGION")]
    pub new_region: Option<PlatformRoute>,

    /// Update the default number of matches per run in config
    #[arg(long = "set-count", help_heading = "Configuration", value_name = "COUNT")]
    pub new_count: Option<usize>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug logging. Logs are also written to the terminal.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
