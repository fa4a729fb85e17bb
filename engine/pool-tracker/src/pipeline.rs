use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::config::GameRulesConfig;
use crate::error::Result;
use crate::fetcher::GameSource;
use crate::output::PoolReport;
use crate::picks::PickLists;
use crate::schedule::relevant_game_ids;
use crate::summary::game_summary;

/// Run the whole batch for `start..=end`: walk the schedule, summarize each
/// tracked game in turn, tally and assemble the report.
///
/// Requests are issued one at a time. The first error aborts the run. The last
/// schedule window can reach past `end`; games dated outside the range are
/// summarized but not tallied.
pub async fn build_report<S: GameSource + ?Sized>(
    source: &S,
    picks: &PickLists,
    rules: &GameRulesConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PoolReport> {
    if picks.is_empty() {
        warn!("Pool has no participants; every game will be ignored");
    }

    let game_ids = relevant_game_ids(source, start, end, picks).await?;

    let mut aggregator = Aggregator::new(picks, rules.stop_at_unplayed);
    for game_id in game_ids {
        let record = game_summary(source, game_id, picks, &rules.final_states).await?;
        if record.date < start || record.date > end {
            debug!("Skipping game {} on {}, outside {} to {}", record.id, record.date, start, end);
            continue;
        }
        aggregator.record(record);
    }
    info!("Summarized {} games", aggregator.len());

    Ok(PoolReport::new(start, end, aggregator.finish(), picks))
}
