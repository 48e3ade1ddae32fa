use crate::cli::Args;
use crate::config::Config;
use crate::config::user_prompts::prompt_for_api_key;
use crate::constants::matches::MAX_HISTORY_COUNT;
use crate::data_fetcher::api::RiotApiClient;
use crate::data_fetcher::cache::MatchCache;
use crate::data_fetcher::matches::{FetchSummary, MatchFetcher, ProgressReporter};
use crate::data_fetcher::models::{Account, MatchId, MatchRecord, PlatformRoute};
use crate::error::AppError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Validates command line argument combinations.
///
/// Returns an error if incompatible or out-of-range arguments are used.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.count == Some(0) || args.new_count == Some(0) {
        return Err(AppError::config_error("Match count must be at least 1"));
    }
    if [args.count, args.new_count]
        .iter()
        .flatten()
        .any(|&count| count > MAX_HISTORY_COUNT)
    {
        return Err(AppError::config_error(format!(
            "Match count cannot exceed {MAX_HISTORY_COUNT}"
        )));
    }
    if args.puuid.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(AppError::config_error("PUUID cannot be empty"));
    }
    Ok(())
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-api-key, --set-region, --set-count).
///
/// Starts from the existing config file when there is one, so a first-time
/// `--set-api-key` doesn't trigger the interactive setup.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let config_path = Config::get_config_path();
    let mut config = if Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(new_key) = &args.new_api_key {
        config.api_key = if new_key.is_empty() {
            prompt_for_api_key().await?
        } else {
            new_key.clone()
        };
    }

    if let Some(region) = args.new_region {
        config.region = region;
    }

    if let Some(count) = args.new_count {
        config.match_history_count = count;
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Handles the --list-cache command: prints cache statistics and one line per cached match.
pub async fn handle_list_cache_command(config: &Config) -> Result<(), AppError> {
    let cache = MatchCache::new(config.cache_dir());
    let stats = cache.stats().await?;
    println!("{stats}");

    let ids = cache.list_ids().await?;
    let mut records = Vec::with_capacity(ids.len());
    for (id, result) in ids.iter().zip(load_all(&cache, &ids).await) {
        match result {
            Ok(record) => records.push(record),
            Err(e) => println!("{id:<20} unreadable: {e}"),
        }
    }

    sort_newest_first(&mut records);
    for record in &records {
        println!("{}", record.summary(None));
    }
    Ok(())
}

/// Handles the --clear-cache command.
pub async fn handle_clear_cache_command(config: &Config) -> Result<(), AppError> {
    let cache = MatchCache::new(config.cache_dir());
    let removed = cache.clear().await?;
    println!("Removed {removed} cached files from {}", cache.dir().display());
    Ok(())
}

/// Resolves the target account from `--puuid` or `--riot-id`.
async fn resolve_account(
    client: &RiotApiClient,
    args: &Args,
    region: PlatformRoute,
) -> Result<Account, AppError> {
    if let Some(puuid) = &args.puuid {
        return Ok(Account::from_puuid(puuid.trim(), region));
    }

    let riot_id = args.riot_id.as_deref().ok_or_else(|| {
        AppError::config_error("Specify an account with --riot-id NAME#TAG or --puuid PUUID")
    })?;
    let mut account = Account::parse(riot_id, region)?;
    let dto = client
        .find_account(account.continent(), &account.game_name, &account.tag_line)
        .await?;
    account.apply_lookup(dto);
    Ok(account)
}

/// Handles the default command: resolves the account, fetches its matches
/// into the cache and prints a summary of the most recent ones.
pub async fn handle_fetch_command(args: &Args, config: &Config) -> Result<(), AppError> {
    let region = args.region.unwrap_or(config.region);
    let desired = args.count.unwrap_or(config.match_history_count);

    let client = RiotApiClient::new(config)?;
    let account = resolve_account(&client, args, region).await?;
    info!(
        "Fetching {} matches for {} on {}",
        desired,
        if account.game_name.is_empty() {
            "PUUID account".to_string()
        } else {
            account.riot_id()
        },
        region
    );

    let cache = MatchCache::new(config.cache_dir());
    let fetcher = MatchFetcher::new(Arc::new(client), cache.clone(), &account)?
        .with_max_concurrent_fetches(config.max_concurrent_fetches);

    let progress = if args.quiet {
        ProgressReporter::noop()
    } else {
        ProgressReporter::new(|processed| {
            print!("\rProcessed {processed} matches");
            let _ = std::io::stdout().flush();
        })
    };

    let summary = fetcher.run_with_progress(desired, &progress).await;
    if progress.last_reported().is_some() {
        println!();
    }

    print_summary(&summary, &cache, account.puuid.as_deref(), desired).await;
    Ok(())
}

async fn print_summary(
    summary: &FetchSummary,
    cache: &MatchCache,
    puuid: Option<&str>,
    limit: usize,
) {
    println!("{summary}");
    if summary.aborted {
        println!("The API refused to list more matches; check your API key and region.");
    }
    if !summary.missed_ids.is_empty() {
        let missed: Vec<String> = summary.missed_ids.iter().map(ToString::to_string).collect();
        println!("Could not load: {}", missed.join(", "));
    }

    let mut records = Vec::with_capacity(summary.loaded_ids.len());
    let results = load_all(cache, &summary.loaded_ids).await;
    for (id, result) in summary.loaded_ids.iter().zip(results) {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("Loaded match {} could not be read back: {}", id, e),
        }
    }

    sort_newest_first(&mut records);
    for record in records.iter().take(limit) {
        println!("{}", record.summary(puuid));
    }
}

/// Reads cached matches in parallel, keeping the order of `ids`
async fn load_all(cache: &MatchCache, ids: &[MatchId]) -> Vec<Result<MatchRecord, AppError>> {
    futures::future::join_all(ids.iter().map(|id| cache.load(id))).await
}

fn sort_newest_first(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| b.info.game_creation.cmp(&a.info.game_creation));
}
