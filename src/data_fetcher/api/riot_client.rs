//! Match and account endpoints of the Riot Games API

use reqwest::Client;
use std::future::Future;
use tracing::{debug, info, instrument};

use super::fetch_utils::fetch;
use super::http_client::create_http_client;
use super::urls::{build_account_url, build_base_url, build_match_ids_url, build_match_url};
use crate::config::Config;
use crate::constants::matches::MAX_IDS_PER_CALL;
use crate::data_fetcher::models::{AccountDto, MatchId, MatchRecord, RegionalRoute};
use crate::error::AppError;

/// Upstream calls the match retrieval pipeline depends on.
///
/// Implementations must be shareable across tasks; the pipeline calls them
/// concurrently for distinct match IDs.
pub trait MatchApi: Send + Sync + 'static {
    /// Lists up to `count` match IDs for an account, newest first, skipping `offset`.
    ///
    /// A listing whose IDs contain the upstream error marker is returned as-is;
    /// interpreting it is up to the caller.
    fn list_match_ids(
        &self,
        routing: RegionalRoute,
        puuid: &str,
        count: usize,
        offset: usize,
    ) -> impl Future<Output = Result<Vec<MatchId>, AppError>> + Send;

    /// Fetches the full payload of one match
    fn fetch_match(
        &self,
        routing: RegionalRoute,
        match_id: &MatchId,
    ) -> impl Future<Output = Result<MatchRecord, AppError>> + Send;
}

/// HTTP implementation of [`MatchApi`] plus the account lookup used at login
#[derive(Debug, Clone)]
pub struct RiotApiClient {
    client: Client,
    base_override: Option<String>,
}

impl RiotApiClient {
    /// Builds a client from the loaded configuration
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client(&config.api_key, config.http_timeout_seconds)?;
        Ok(Self::with_client(client, config.api_base_url.clone()))
    }

    /// Wraps an existing HTTP client. `base_override` replaces the regional host.
    pub fn with_client(client: Client, base_override: Option<String>) -> Self {
        Self {
            client,
            base_override,
        }
    }

    fn base(&self, routing: RegionalRoute) -> String {
        build_base_url(routing, self.base_override.as_deref())
    }

    /// Resolves a Riot ID to its account, including the PUUID
    #[instrument(skip(self))]
    pub async fn find_account(
        &self,
        routing: RegionalRoute,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError> {
        let url = build_account_url(&self.base(routing), game_name, tag_line);
        match fetch::<AccountDto>(&self.client, &url).await {
            Ok(account) => {
                info!("Found account {}#{}", game_name, tag_line);
                Ok(account)
            }
            Err(e) if e.is_not_found() => {
                Err(AppError::account_not_found(format!("{game_name}#{tag_line}")))
            }
            Err(e) => Err(e),
        }
    }
}

impl MatchApi for RiotApiClient {
    #[instrument(skip(self, puuid))]
    async fn list_match_ids(
        &self,
        routing: RegionalRoute,
        puuid: &str,
        count: usize,
        offset: usize,
    ) -> Result<Vec<MatchId>, AppError> {
        if count == 0 || count > MAX_IDS_PER_CALL {
            return Err(AppError::config_error(format!(
                "Match ID listing count must be between 1 and {MAX_IDS_PER_CALL}, got {count}"
            )));
        }

        let url = build_match_ids_url(&self.base(routing), puuid, count, offset);
        let ids = fetch::<Vec<MatchId>>(&self.client, &url).await?;
        debug!("Listed {} match IDs at offset {}", ids.len(), offset);
        Ok(ids)
    }

    #[instrument(skip(self, match_id), fields(match_id = %match_id))]
    async fn fetch_match(
        &self,
        routing: RegionalRoute,
        match_id: &MatchId,
    ) -> Result<MatchRecord, AppError> {
        let url = build_match_url(&self.base(routing), match_id);
        match fetch::<MatchRecord>(&self.client, &url).await {
            Err(e) if e.is_not_found() => Err(AppError::match_not_found(match_id.as_str())),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::{API_KEY_HEADER, create_test_http_client};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    fn client_for(server: &MockServer) -> RiotApiClient {
        RiotApiClient::with_client(create_test_http_client(), Some(server.uri()))
    }

    fn match_body(id: &str) -> serde_json::Value {
        serde_json::json!({
            "metadata": {"matchId": id, "dataVersion": "2", "participants": ["p1"]},
            "info": {"gameCreation": 1700000000000i64, "gameDuration": 1200, "gameMode": "CLASSIC",
                     "gameVersion": "14.3", "queueId": 420, "participants": []}
        })
    }

    #[tokio::test]
    async fn test_list_match_ids_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/by-puuid/puuid-1/ids"))
            .and(query_param("start", "25"))
            .and(query_param("count", "25"))
            .and(header(API_KEY_HEADER, "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["NA1_1", "NA1_2"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ids = client_for(&server)
            .list_match_ids(RegionalRoute::Americas, "puuid-1", 25, 25)
            .await
            .unwrap();
        assert_eq!(ids, vec![MatchId::new("NA1_1"), MatchId::new("NA1_2")]);
    }

    #[tokio::test]
    async fn test_list_match_ids_rejects_oversized_count() {
        let server = MockServer::start().await;
        let result = client_for(&server)
            .list_match_ids(RegionalRoute::Americas, "puuid-1", 101, 0)
            .await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_list_match_ids_forbidden_is_client_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_match_ids(RegionalRoute::Europe, "puuid-1", 25, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ApiClientError { status: 403, .. }));
        assert!(!err.is_upstream_sentinel());
    }

    #[tokio::test]
    async fn test_fetch_match_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/EUW1_9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(match_body("EUW1_9")))
            .mount(&server)
            .await;

        let record = client_for(&server)
            .fetch_match(RegionalRoute::Europe, &MatchId::new("EUW1_9"))
            .await
            .unwrap();
        assert_eq!(record.id().as_str(), "EUW1_9");
        assert_eq!(record.info.queue_id, 420);
    }

    #[tokio::test]
    async fn test_fetch_match_retries_service_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/EUW1_7"))
            .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/EUW1_7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(match_body("EUW1_7")))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server)
            .fetch_match(RegionalRoute::Europe, &MatchId::new("EUW1_7"))
            .await
            .unwrap();
        assert_eq!(record.id().as_str(), "EUW1_7");
    }

    #[tokio::test]
    async fn test_fetch_match_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/EUW1_404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_match(RegionalRoute::Europe, &MatchId::new("EUW1_404"))
            .await;
        assert!(matches!(result, Err(AppError::MatchNotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_match_unexpected_structure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "odd"})),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_match(RegionalRoute::Europe, &MatchId::new("EUW1_5"))
            .await;
        assert!(matches!(
            result,
            Err(AppError::ApiUnexpectedStructure { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_account() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/riot/account/v1/accounts/by-riot-id/Faker/KR1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "puuid": "faker-puuid", "gameName": "Faker", "tagLine": "KR1"
            })))
            .mount(&server)
            .await;

        let account = client_for(&server)
            .find_account(RegionalRoute::Asia, "Faker", "KR1")
            .await
            .unwrap();
        assert_eq!(account.puuid, "faker-puuid");
    }

    #[tokio::test]
    async fn test_find_account_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .find_account(RegionalRoute::Asia, "Nobody", "000")
            .await;
        assert!(matches!(result, Err(AppError::AccountNotFound { .. })));
    }
}
