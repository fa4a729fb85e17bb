use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use pool_tracker::{build_report, NhlApiClient, PoolConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pool-tracker")]
#[command(about = "Tally hockey pool standings from league results between two dates")]
#[command(version)]
struct Cli {
    /// First date to include (YYYY-MM-DD)
    start: NaiveDate,

    /// Last date to include (YYYY-MM-DD)
    end: NaiveDate,

    /// Pool configuration file (TOML); defaults apply if it does not exist
    #[arg(short, long, default_value = "config/pool.toml")]
    config: PathBuf,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Stop tallying at the first date on which no game has started
    #[arg(long)]
    stop_at_unplayed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if cli.start > cli.end {
        anyhow::bail!("start date {} is after end date {}", cli.start, cli.end);
    }

    let mut config = PoolConfig::load(Some(cli.config.as_path()))
        .context("Failed to load configuration")?;
    if cli.stop_at_unplayed {
        config.games.stop_at_unplayed = true;
    }
    let picks = config.pick_lists();
    info!(
        "Tracking {} teams and {} players for {} participants",
        picks.tracked_teams().len(),
        picks.tracked_players().len(),
        picks.entries().len()
    );

    let client = NhlApiClient::new(&config).context("Failed to create HTTP client")?;
    let report = build_report(&client, &picks, &config.games, cli.start, cli.end)
        .await
        .with_context(|| format!("Failed to build pool report for {} to {}", cli.start, cli.end))?;

    report.write_to(std::io::stdout().lock(), cli.pretty).context("Failed to write report")?;
    Ok(())
}
