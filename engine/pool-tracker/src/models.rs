use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upstream game identifier (e.g. 2023020555)
pub type GameId = u64;

// ---------------------------------------------------------------------------
// Upstream payloads
// ---------------------------------------------------------------------------

/// Week-scoped schedule returned by `/schedule/{date}`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ScheduleResponse {
    /// First date of the following schedule window
    #[serde(rename = "nextStartDate")]
    pub next_start_date: Option<String>,

    #[serde(rename = "gameWeek", default)]
    pub game_week: Vec<GameDay>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GameDay {
    pub date: String,

    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduledGame {
    pub id: GameId,

    #[serde(rename = "homeTeam")]
    pub home_team: ScheduleTeam,

    #[serde(rename = "awayTeam")]
    pub away_team: ScheduleTeam,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduleTeam {
    pub abbrev: String,
}

/// Game story returned by `/wsc/game-story/{id}`
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameStory {
    pub id: GameId,
    pub game_date: String,
    pub game_state: String,
    pub home_team: StoryTeam,
    pub away_team: StoryTeam,
    #[serde(default)]
    pub summary: Option<StorySummary>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoryTeam {
    pub abbrev: String,
    pub name: LocalizedName,
    /// Absent before puck drop
    pub score: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LocalizedName {
    pub default: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorySummary {
    #[serde(default)]
    pub scoring: Vec<ScoringPeriod>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPeriod {
    pub period_descriptor: PeriodDescriptor,
    #[serde(default)]
    pub goals: Vec<GoalSummary>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PeriodDescriptor {
    pub number: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub time_in_period: String,
    /// Scorer
    pub name: LocalizedName,
    pub goals_to_date: Option<u32>,
    #[serde(default)]
    pub assists: Vec<AssistSummary>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssistSummary {
    pub name: LocalizedName,
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// Scoring segment of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodLabel {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "OT")]
    Overtime,
    #[serde(rename = "SO")]
    Shootout,
}

impl PeriodLabel {
    /// Map an upstream period ordinal; anything past the shootout is unknown
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Overtime),
            5 => Some(Self::Shootout),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "1st",
            Self::Second => "2nd",
            Self::Third => "3rd",
            Self::Overtime => "OT",
            Self::Shootout => "SO",
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A goal involving at least one tracked player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvent {
    pub period: PeriodLabel,

    /// Time elapsed in the period, "MM:SS"
    pub time: String,

    /// `(name, tracked)` pairs, scorer first then assists in listed order
    pub players: Vec<(String, bool)>,

    /// Scorer's season goal count including this one
    #[serde(rename = "goalsToDate", default, skip_serializing_if = "Option::is_none")]
    pub goals_to_date: Option<u32>,
}

impl GoalEvent {
    pub fn scorer(&self) -> Option<&str> {
        self.players.first().map(|(name, _)| name.as_str())
    }

    /// Names of tracked participants
    pub fn tracked_players(&self) -> impl Iterator<Item = &str> {
        self.players.iter().filter(|(_, tracked)| *tracked).map(|(name, _)| name.as_str())
    }
}

/// One summarized game. Pairs are ordered `[away, home]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub date: NaiveDate,
    pub state: String,
    pub names: [String; 2],
    pub abbrevs: [String; 2],
    pub scores: Option<[u32; 2]>,
    pub goals: Vec<GoalEvent>,
    pub winner: Option<String>,
}

impl GameRecord {
    /// A game has started once both scores are reported
    pub fn has_started(&self) -> bool {
        self.scores.is_some()
    }

    pub fn away_abbrev(&self) -> &str {
        &self.abbrevs[0]
    }

    pub fn home_abbrev(&self) -> &str {
        &self.abbrevs[1]
    }
}
