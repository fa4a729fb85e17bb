//! Hockey Pool Tracker
//!
//! Walks the league schedule for a date range, summarizes every game that
//! involves a tracked team, and turns goals and wins into pool standings for
//! each participant's picks.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod output;
pub mod picks;
pub mod pipeline;
pub mod schedule;
pub mod standings;
pub mod summary;

pub use aggregator::{Aggregator, DateBucket, Tally};
pub use crate::config::PoolConfig;
pub use error::{PoolError, Result};
pub use fetcher::{GameSource, NhlApiClient};
pub use models::*;
pub use output::PoolReport;
pub use picks::{PickLists, PoolEntry};
pub use pipeline::build_report;
pub use schedule::relevant_game_ids;
pub use standings::{compute_standings, Standing};
pub use summary::{game_summary, summarize};
