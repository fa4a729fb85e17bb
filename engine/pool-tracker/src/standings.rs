use std::collections::BTreeMap;

use serde::Serialize;

use crate::picks::PickLists;

/// Pool points per win of a picked team
pub const TEAM_WIN_WEIGHT: u32 = 2;

/// Pool points per goal or assist of a picked player
pub const PLAYER_POINT_WEIGHT: u32 = 1;

/// One participant's line in the pool leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub person: String,
    pub wins: u32,
    pub points: u32,
    pub total: u32,
}

/// Compute every participant's wins, points and total.
///
/// Teams or players missing from the tallies count as zero. The result is
/// ordered by descending total; equal totals keep configuration order.
pub fn compute_standings(
    team_wins: &BTreeMap<String, u32>,
    player_points: &BTreeMap<String, u32>,
    picks: &PickLists,
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = picks
        .entries()
        .iter()
        .map(|entry| {
            let wins: u32 =
                entry.teams.iter().map(|t| team_wins.get(t).copied().unwrap_or(0)).sum();
            let points: u32 =
                entry.players.iter().map(|p| player_points.get(p).copied().unwrap_or(0)).sum();
            Standing {
                person: entry.person.clone(),
                wins,
                points,
                total: TEAM_WIN_WEIGHT * wins + PLAYER_POINT_WEIGHT * points,
            }
        })
        .collect();

    standings.sort_by(|a, b| b.total.cmp(&a.total));
    standings
}
