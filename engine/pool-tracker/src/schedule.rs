//! Schedule walking: follow the upstream week cursor across a date range and
//! collect the games that involve tracked teams.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{PoolError, Result};
use crate::fetcher::{GameSource, DATE_FORMAT};
use crate::models::{GameId, ScheduleResponse};
use crate::picks::PickLists;

/// Collect identifiers of tracked-team games between `start` and `end`.
///
/// The cursor starts at `start` and jumps to each window's `nextStartDate`
/// until it passes `end`. A window without a cursor, or with one that does not
/// move forward, aborts the walk.
pub async fn relevant_game_ids<S: GameSource + ?Sized>(
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
    picks: &PickLists,
) -> Result<Vec<GameId>> {
    let mut cursor = start;
    let mut seen = HashSet::new();
    let mut game_ids = Vec::new();

    while cursor <= end {
        let schedule = source.fetch_schedule(cursor).await?;

        let before = game_ids.len();
        for game_id in tracked_games(&schedule, picks) {
            if seen.insert(game_id) {
                game_ids.push(game_id);
            }
        }
        debug!("Window {} contributed {} games", cursor, game_ids.len() - before);

        cursor = next_cursor(cursor, &schedule)?;
    }

    info!("Found {} tracked games between {} and {}", game_ids.len(), start, end);
    Ok(game_ids)
}

/// Game ids in one window where either side is a tracked team, in listed order
pub fn tracked_games(schedule: &ScheduleResponse, picks: &PickLists) -> Vec<GameId> {
    schedule
        .game_week
        .iter()
        .flat_map(|day| day.games.iter())
        .filter(|game| {
            picks.is_tracked_team(&game.home_team.abbrev)
                || picks.is_tracked_team(&game.away_team.abbrev)
        })
        .map(|game| game.id)
        .collect()
}

fn next_cursor(current: NaiveDate, schedule: &ScheduleResponse) -> Result<NaiveDate> {
    let raw = schedule.next_start_date.as_deref().ok_or(PoolError::MissingCursor(current))?;
    let next = parse_date(raw)?;
    if next <= current {
        return Err(PoolError::StalledCursor { current, next });
    }
    Ok(next)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| PoolError::InvalidDate(raw.to_string()))
}
