//! Pool participants and the teams/players they picked.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One pool participant and their picks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Participant name
    pub person: String,

    /// Picked team abbreviations (e.g. "TOR")
    #[serde(default)]
    pub teams: Vec<String>,

    /// Picked player names as the league formats them (e.g. "W. Nylander")
    #[serde(default)]
    pub players: Vec<String>,
}

/// Pick lists for a whole pool.
///
/// The tracked teams and players are the unions of every participant's picks.
#[derive(Debug, Clone, Default)]
pub struct PickLists {
    entries: Vec<PoolEntry>,
    tracked_teams: HashSet<String>,
    tracked_players: HashSet<String>,
    pairs: Vec<[String; 2]>,
}

impl PickLists {
    pub fn new(entries: Vec<PoolEntry>) -> Self {
        let tracked_teams = entries.iter().flat_map(|e| e.teams.iter().cloned()).collect();
        let tracked_players = entries.iter().flat_map(|e| e.players.iter().cloned()).collect();
        Self { entries, tracked_teams, tracked_players, pairs: Vec::new() }
    }

    /// Attach the bet pairs. A pair settles on a date when both players score.
    pub fn with_pairs(mut self, pairs: Vec<[String; 2]>) -> Self {
        for name in pairs.iter().flatten() {
            if !self.is_tracked_player(name) {
                warn!("Pair member {} is not picked by anyone; their goals are not tracked", name);
            }
        }
        self.pairs = pairs;
        self
    }

    /// Participants in configuration order
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn is_tracked_team(&self, abbrev: &str) -> bool {
        self.tracked_teams.contains(abbrev)
    }

    pub fn is_tracked_player(&self, name: &str) -> bool {
        self.tracked_players.contains(name)
    }

    pub fn tracked_teams(&self) -> &HashSet<String> {
        &self.tracked_teams
    }

    pub fn tracked_players(&self) -> &HashSet<String> {
        &self.tracked_players
    }

    pub fn pairs(&self) -> &[[String; 2]] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
