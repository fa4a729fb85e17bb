use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{PoolConfig, RetryConfig};
use crate::error::{PoolError, Result};
use crate::models::{GameId, GameStory, ScheduleResponse};

/// Date format used in upstream URLs and payloads
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of schedule windows and game stories
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Fetch the schedule window that starts at `date`
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<ScheduleResponse>;

    /// Fetch the detailed story of one game
    async fn fetch_game_story(&self, game_id: GameId) -> Result<GameStory>;
}

/// HTTP client for the league web API
pub struct NhlApiClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl NhlApiClient {
    /// Create a new client instance
    pub fn new(config: &PoolConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.api.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
        })
    }

    pub fn schedule_url(&self, date: NaiveDate) -> String {
        format!("{}/schedule/{}", self.base_url, date.format(DATE_FORMAT))
    }

    pub fn game_story_url(&self, game_id: GameId) -> String {
        format!("{}/wsc/game-story/{}", self.base_url, game_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_with_retry(url).await?;
        serde_json::from_str(&body)
            .map_err(|source| PoolError::Payload { url: url.to_string(), source })
    }

    /// GET with bounded exponential backoff.
    ///
    /// Only transport failures and 5xx responses are retried.
    async fn get_with_retry(&self, url: &str) -> Result<String> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < max_attempts && is_retryable(&e) => {
                    let delay = self.retry.delay_after(attempt);
                    warn!("Attempt {} for {} failed: {}, retrying in {:?}", attempt, url, e, delay);
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PoolError::Status { url: url.to_string(), status });
        }

        Ok(response.text().await?)
    }
}

fn is_retryable(error: &PoolError) -> bool {
    match error {
        PoolError::Http(_) => true,
        PoolError::Status { status, .. } => status.is_server_error(),
        _ => false,
    }
}

#[async_trait]
impl GameSource for NhlApiClient {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<ScheduleResponse> {
        let url = self.schedule_url(date);
        info!("Fetching schedule window starting {}", date);

        let schedule: ScheduleResponse = self.get_json(&url).await?;
        debug!(
            "Schedule window {} has {} days, next start {:?}",
            date,
            schedule.game_week.len(),
            schedule.next_start_date
        );
        Ok(schedule)
    }

    async fn fetch_game_story(&self, game_id: GameId) -> Result<GameStory> {
        let url = self.game_story_url(game_id);
        info!("Fetching game story {}", game_id);
        self.get_json(&url).await
    }
}
