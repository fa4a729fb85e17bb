use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::picks::{PickLists, PoolEntry};

/// Prefix for environment overrides, e.g. `POOL_API__TIMEOUT_SECS=10`
pub const ENV_PREFIX: &str = "POOL";

/// Configuration for the pool tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Upstream API configuration
    pub api: ApiConfig,

    /// Retry configuration for upstream requests
    pub retry: RetryConfig,

    /// Rules for interpreting game states
    pub games: GameRulesConfig,

    /// Pool participants and their picks
    #[serde(default)]
    pub pool: Vec<PoolEntry>,

    /// Player pairs that settle the bet when both score on the same date
    #[serde(default)]
    pub pairs: Vec<[String; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the league web API (no trailing slash)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (1 = no retry)
    pub max_attempts: u32,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRulesConfig {
    /// Game states that mean no further play remains
    pub final_states: Vec<String>,

    /// Stop tallying at the first date on which no game has started
    pub stop_at_unplayed: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            games: GameRulesConfig::default(),
            pool: Vec::new(),
            pairs: Vec::new(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-web.nhle.com/v1".to_string(),
            timeout_secs: 30,
            user_agent: concat!("pool-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl Default for GameRulesConfig {
    fn default() -> Self {
        Self {
            final_states: vec!["OFF".to_string(), "FINAL".to_string()],
            stop_at_unplayed: false,
        }
    }
}

impl PoolConfig {
    /// Load configuration from defaults, an optional TOML file, then environment.
    ///
    /// A missing file is not an error; the defaults (with an empty pool) apply.
    /// List keys take comma-separated values from the environment, e.g.
    /// `POOL_GAMES__FINAL_STATES=OFF,FINAL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
            } else {
                info!("No configuration file at {}, using defaults", path.display());
            }
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("games.final_states"),
            )
            .build()?;

        let config: PoolConfig = settings.try_deserialize()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Pick lists built from the `pool` entries and bet pairs
    pub fn pick_lists(&self) -> PickLists {
        PickLists::new(self.pool.clone()).with_pairs(self.pairs.clone())
    }

    /// Get the request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Whether a game state marks a concluded game
    pub fn is_final_state(&self, state: &str) -> bool {
        self.games.final_states.iter().any(|s| s == state)
    }
}

impl RetryConfig {
    /// Delay before the attempt following `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        let millis = (self.initial_delay_ms as f64 * factor).min(self.max_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }
}
