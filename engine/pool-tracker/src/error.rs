//! Error types for the pool tracker

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for pool tracker operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur while building the pool report.
///
/// Every variant is fatal: a run never recovers locally and never emits a
/// partial report.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("Malformed payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown period ordinal {number} in game {game_id}")]
    UnknownPeriod { game_id: u64, number: u32 },

    #[error("Schedule for {0} did not report a next start date")]
    MissingCursor(NaiveDate),

    #[error("Schedule cursor did not advance: {current} -> {next}")]
    StalledCursor { current: NaiveDate, next: NaiveDate },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Game {0} is final but is missing a score")]
    MissingFinalScore(u64),

    #[error("Game {game_id} is final but tied {score}-{score}")]
    TiedFinal { game_id: u64, score: u32 },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ::config::ConfigError),
}
