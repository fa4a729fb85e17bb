use tracing::{debug, info};

use crate::error::{PoolError, Result};
use crate::fetcher::GameSource;
use crate::models::{GameId, GameRecord, GameStory, GoalEvent, GoalSummary, PeriodLabel};
use crate::picks::PickLists;
use crate::schedule::parse_date;

/// Fetch one game story and normalize it into a [`GameRecord`]
pub async fn game_summary<S: GameSource + ?Sized>(
    source: &S,
    game_id: GameId,
    picks: &PickLists,
    final_states: &[String],
) -> Result<GameRecord> {
    let story = source.fetch_game_story(game_id).await?;
    let record = summarize(&story, picks, final_states)?;

    info!(
        "Game {} {} {}-{} {}: {} tracked goals, winner {:?}",
        record.id,
        record.date,
        record.away_abbrev(),
        record.home_abbrev(),
        record.state,
        record.goals.len(),
        record.winner
    );
    Ok(record)
}

/// Normalize a game story.
///
/// Only goals with at least one tracked participant are kept. The winner is
/// set only when the game state is one of `final_states`.
pub fn summarize(
    story: &GameStory,
    picks: &PickLists,
    final_states: &[String],
) -> Result<GameRecord> {
    let date = parse_date(&story.game_date)?;

    let mut goals = Vec::new();
    for period in story.summary.iter().flat_map(|s| s.scoring.iter()) {
        let number = period.period_descriptor.number;
        let label = PeriodLabel::from_number(number)
            .ok_or(PoolError::UnknownPeriod { game_id: story.id, number })?;

        goals.extend(period.goals.iter().filter_map(|goal| goal_event(label, goal, picks)));
    }

    let scores = match (story.away_team.score, story.home_team.score) {
        (Some(away), Some(home)) => Some([away, home]),
        _ => None,
    };

    let winner = if final_states.iter().any(|s| *s == story.game_state) {
        Some(decide_winner(story, scores)?)
    } else {
        None
    };

    Ok(GameRecord {
        id: story.id,
        date,
        state: story.game_state.clone(),
        names: [story.away_team.name.default.clone(), story.home_team.name.default.clone()],
        abbrevs: [story.away_team.abbrev.clone(), story.home_team.abbrev.clone()],
        scores,
        goals,
        winner,
    })
}

fn goal_event(period: PeriodLabel, goal: &GoalSummary, picks: &PickLists) -> Option<GoalEvent> {
    let players: Vec<(String, bool)> = std::iter::once(&goal.name)
        .chain(goal.assists.iter().map(|a| &a.name))
        .map(|name| (name.default.clone(), picks.is_tracked_player(&name.default)))
        .collect();

    if !players.iter().any(|(_, tracked)| *tracked) {
        return None;
    }

    debug!("{} {} tracked goal by {}", period, goal.time_in_period, goal.name.default);
    Some(GoalEvent {
        period,
        time: goal.time_in_period.clone(),
        players,
        goals_to_date: goal.goals_to_date,
    })
}

fn decide_winner(story: &GameStory, scores: Option<[u32; 2]>) -> Result<String> {
    let [away, home] = scores.ok_or(PoolError::MissingFinalScore(story.id))?;
    if away == home {
        return Err(PoolError::TiedFinal { game_id: story.id, score: away });
    }
    let team = if away > home { &story.away_team } else { &story.home_team };
    Ok(team.abbrev.clone())
}
