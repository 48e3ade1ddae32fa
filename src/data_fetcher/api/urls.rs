//! URL building utilities for API endpoints

use crate::data_fetcher::models::{MatchId, RegionalRoute};

/// Builds the base URL for a regional shard.
///
/// An explicit override (proxy, test server) replaces the public host entirely.
///
/// # Example
/// ```
/// use match_history::data_fetcher::api::build_base_url;
/// use match_history::data_fetcher::models::RegionalRoute;
///
/// assert_eq!(
///     build_base_url(RegionalRoute::Europe, None),
///     "https://europe.api.riotgames.com"
/// );
/// assert_eq!(
///     build_base_url(RegionalRoute::Europe, Some("http://localhost:8080/")),
///     "http://localhost:8080"
/// );
/// ```
pub fn build_base_url(routing: RegionalRoute, override_base: Option<&str>) -> String {
    match override_base {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => format!("https://{routing}.api.riotgames.com"),
    }
}

/// Builds the match ID listing URL for an account.
///
/// # Example
/// ```
/// use match_history::data_fetcher::api::build_match_ids_url;
///
/// let url = build_match_ids_url("https://americas.api.riotgames.com", "abc", 25, 50);
/// assert_eq!(
///     url,
///     "https://americas.api.riotgames.com/lol/match/v5/matches/by-puuid/abc/ids?start=50&count=25"
/// );
/// ```
pub fn build_match_ids_url(base: &str, puuid: &str, count: usize, offset: usize) -> String {
    format!("{base}/lol/match/v5/matches/by-puuid/{puuid}/ids?start={offset}&count={count}")
}

/// Builds the URL for a single match.
///
/// # Example
/// ```
/// use match_history::data_fetcher::api::build_match_url;
/// use match_history::data_fetcher::models::MatchId;
///
/// let url = build_match_url("https://europe.api.riotgames.com", &MatchId::new("EUW1_1"));
/// assert_eq!(url, "https://europe.api.riotgames.com/lol/match/v5/matches/EUW1_1");
/// ```
pub fn build_match_url(base: &str, match_id: &MatchId) -> String {
    format!("{base}/lol/match/v5/matches/{match_id}")
}

/// Builds the account lookup URL for a Riot ID. Both parts are percent-encoded.
///
/// # Example
/// ```
/// use match_history::data_fetcher::api::build_account_url;
///
/// let url = build_account_url("https://asia.api.riotgames.com", "Hide on bush", "KR1");
/// assert_eq!(
///     url,
///     "https://asia.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Hide%20on%20bush/KR1"
/// );
/// ```
pub fn build_account_url(base: &str, game_name: &str, tag_line: &str) -> String {
    format!(
        "{base}/riot/account/v1/accounts/by-riot-id/{}/{}",
        urlencoding::encode(game_name),
        urlencoding::encode(tag_line)
    )
}
