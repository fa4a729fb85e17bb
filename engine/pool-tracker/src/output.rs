//! The JSON report written to stdout.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregator::{DateBucket, Tally};
use crate::error::Result;
use crate::picks::PickLists;
use crate::standings::{compute_standings, Standing};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub dates: Vec<DateBucket>,
    pub team_wins: BTreeMap<String, u32>,
    pub player_points: BTreeMap<String, u32>,
    pub standings: Vec<Standing>,
}

impl PoolReport {
    /// Assemble the report, computing standings from the tallies
    pub fn new(start: NaiveDate, end: NaiveDate, tally: Tally, picks: &PickLists) -> Self {
        let standings = compute_standings(&tally.team_wins, &tally.player_points, picks);
        Self {
            start,
            end,
            dates: tally.dates,
            team_wins: tally.team_wins,
            player_points: tally.player_points,
            standings,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json =
            if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }

    /// Write the report followed by a newline
    pub fn write_to<W: Write>(&self, mut writer: W, pretty: bool) -> std::io::Result<()> {
        let json = self.to_json(pretty).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)?;
        writer.flush()
    }
}
