//! Folds summarized games into per-date buckets, team wins and player points.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::models::{GameRecord, GoalEvent};
use crate::picks::PickLists;

/// Games of one date plus how many started games each tracked team played
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub played: BTreeMap<String, u32>,
    /// Bet pairs whose players both scored on this date
    #[serde(rename = "settledPairs")]
    pub settled_pairs: Vec<[String; 2]>,
    pub games: Vec<GameRecord>,
}

/// Result of folding every game of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Date buckets in ascending date order
    pub dates: Vec<DateBucket>,

    /// Wins per tracked team
    pub team_wins: BTreeMap<String, u32>,

    /// Goal participations (goals and assists) per tracked player
    pub player_points: BTreeMap<String, u32>,
}

/// Collects game records and tallies them in date order.
///
/// Records may arrive in any order; they are bucketed by date and the buckets
/// are scanned ascending in [`Aggregator::finish`]. With `stop_at_unplayed`
/// the scan ends at the first date on which no game has started.
pub struct Aggregator<'a> {
    picks: &'a PickLists,
    stop_at_unplayed: bool,
    buckets: BTreeMap<NaiveDate, Vec<GameRecord>>,
}

impl<'a> Aggregator<'a> {
    pub fn new(picks: &'a PickLists, stop_at_unplayed: bool) -> Self {
        Self { picks, stop_at_unplayed, buckets: BTreeMap::new() }
    }

    pub fn record(&mut self, game: GameRecord) {
        self.buckets.entry(game.date).or_default().push(game);
    }

    /// Number of games recorded so far
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn finish(self) -> Tally {
        let mut tally = Tally::default();

        for (date, games) in self.buckets {
            if self.stop_at_unplayed && !games.iter().any(GameRecord::has_started) {
                info!("No started games on {}, ignoring this and later dates", date);
                break;
            }

            let mut played = BTreeMap::new();
            let mut scorers: HashSet<String> = HashSet::new();
            for game in &games {
                if let Some(winner) = &game.winner {
                    if self.picks.is_tracked_team(winner) {
                        *tally.team_wins.entry(winner.clone()).or_insert(0) += 1;
                    }
                }

                for player in game.goals.iter().flat_map(|goal| goal.tracked_players()) {
                    *tally.player_points.entry(player.to_string()).or_insert(0) += 1;
                }
                scorers.extend(
                    game.goals
                        .iter()
                        .filter_map(GoalEvent::scorer)
                        .filter(|name| self.picks.is_tracked_player(name))
                        .map(str::to_string),
                );

                if game.has_started() {
                    for abbrev in game.abbrevs.iter().filter(|a| self.picks.is_tracked_team(a)) {
                        *played.entry(abbrev.clone()).or_insert(0) += 1;
                    }
                }
            }

            let settled_pairs: Vec<_> = self
                .picks
                .pairs()
                .iter()
                .filter(|pair| pair.iter().all(|name| scorers.contains(name.as_str())))
                .cloned()
                .collect();
            if !settled_pairs.is_empty() {
                info!("{} pairs settled on {}", settled_pairs.len(), date);
            }

            tally.dates.push(DateBucket { date, played, settled_pairs, games });
        }

        info!(
            "Tallied {} dates: {} teams with wins, {} players with points",
            tally.dates.len(),
            tally.team_wins.len(),
            tally.player_points.len()
        );
        tally
    }
}
