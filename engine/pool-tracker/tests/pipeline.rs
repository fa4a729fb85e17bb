//! End-to-end runs of the pool pipeline against an in-memory game source.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use pool_tracker::config::GameRulesConfig;
use pool_tracker::{
    build_report, relevant_game_ids, GameId, GameSource, GameStory, PeriodLabel, PickLists,
    PoolEntry, PoolError, Result, ScheduleResponse,
};

/// Serves canned payloads and records every request in order
#[derive(Default)]
struct StaticSource {
    schedules: HashMap<NaiveDate, ScheduleResponse>,
    stories: HashMap<GameId, GameStory>,
    requests: Mutex<Vec<String>>,
}

impl StaticSource {
    fn schedule(mut self, date: &str, value: serde_json::Value) -> Self {
        self.schedules.insert(date_of(date), serde_json::from_value(value).unwrap());
        self
    }

    fn story(mut self, value: serde_json::Value) -> Self {
        let story: GameStory = serde_json::from_value(value).unwrap();
        self.stories.insert(story.id, story);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameSource for StaticSource {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<ScheduleResponse> {
        self.requests.lock().unwrap().push(format!("schedule/{}", date));
        self.schedules.get(&date).cloned().ok_or_else(|| not_found(format!("schedule/{}", date)))
    }

    async fn fetch_game_story(&self, game_id: GameId) -> Result<GameStory> {
        self.requests.lock().unwrap().push(format!("game-story/{}", game_id));
        self.stories.get(&game_id).cloned().ok_or_else(|| not_found(format!("game-story/{}", game_id)))
    }
}

fn not_found(url: String) -> PoolError {
    PoolError::Status { url, status: reqwest::StatusCode::NOT_FOUND }
}

fn date_of(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn picks() -> PickLists {
    PickLists::new(vec![
        PoolEntry {
            person: "Mika".to_string(),
            teams: vec!["TOR".to_string()],
            players: vec!["W. Nylander".to_string()],
        },
        PoolEntry {
            person: "Sanna".to_string(),
            teams: vec!["EDM".to_string()],
            players: vec!["L. Draisaitl".to_string(), "S. Reinhart".to_string()],
        },
    ])
}

fn scheduled(id: GameId, away: &str, home: &str) -> serde_json::Value {
    json!({"id": id, "awayTeam": {"abbrev": away}, "homeTeam": {"abbrev": home}})
}

fn story_json(
    id: GameId,
    date: &str,
    state: &str,
    away: (&str, &str, Option<u32>),
    home: (&str, &str, Option<u32>),
    scoring: serde_json::Value,
) -> serde_json::Value {
    json!({
        "id": id,
        "gameDate": date,
        "gameState": state,
        "awayTeam": {"abbrev": away.0, "name": {"default": away.1}, "score": away.2},
        "homeTeam": {"abbrev": home.0, "name": {"default": home.1}, "score": home.2},
        "summary": {"scoring": scoring}
    })
}

#[tokio::test]
async fn test_single_final_game_scenario() {
    let source = StaticSource::default()
        .schedule(
            "2024-01-02",
            json!({
                "nextStartDate": "2024-01-09",
                "gameWeek": [{"date": "2024-01-02", "games": [scheduled(100, "TOR", "FLA")]}]
            }),
        )
        .story(story_json(
            100,
            "2024-01-02",
            "OFF",
            ("TOR", "Maple Leafs", Some(4)),
            ("FLA", "Panthers", Some(2)),
            json!([
                {"periodDescriptor": {"number": 1}, "goals": []},
                {"periodDescriptor": {"number": 2}, "goals": [
                    {"timeInPeriod": "05:12", "name": {"default": "W. Nylander"}, "goalsToDate": 20, "assists": []}
                ]}
            ]),
        ));

    let report = build_report(
        &source,
        &picks(),
        &GameRulesConfig::default(),
        date_of("2024-01-02"),
        date_of("2024-01-02"),
    )
    .await
    .unwrap();

    let game = &report.dates[0].games[0];
    assert_eq!(game.winner.as_deref(), Some("TOR"));
    assert_eq!(game.goals.len(), 1);
    assert_eq!(game.goals[0].period, PeriodLabel::Second);
    assert_eq!(game.goals[0].players, vec![("W. Nylander".to_string(), true)]);

    assert_eq!(report.team_wins.get("TOR"), Some(&1));
    assert_eq!(report.player_points.get("W. Nylander"), Some(&1));

    let mika = report.standings.iter().find(|s| s.person == "Mika").unwrap();
    assert_eq!((mika.wins, mika.points, mika.total), (1, 1, 3));
    assert_eq!(report.standings[0].person, "Mika");

    assert_eq!(source.requests(), vec!["schedule/2024-01-02", "game-story/100"]);
}

#[tokio::test]
async fn test_walk_follows_cursor_across_windows() {
    let source = StaticSource::default()
        .schedule(
            "2024-01-01",
            json!({
                "nextStartDate": "2024-01-08",
                "gameWeek": [
                    {"date": "2024-01-01", "games": [scheduled(1, "BOS", "NYR"), scheduled(2, "EDM", "VAN")]},
                    {"date": "2024-01-03", "games": [scheduled(3, "FLA", "TOR")]}
                ]
            }),
        )
        .schedule(
            "2024-01-08",
            json!({
                "nextStartDate": "2024-01-15",
                "gameWeek": [{"date": "2024-01-08", "games": [scheduled(4, "TOR", "EDM")]}]
            }),
        );

    let ids = relevant_game_ids(&source, date_of("2024-01-01"), date_of("2024-01-10"), &picks())
        .await
        .unwrap();

    assert_eq!(ids, vec![2, 3, 4]);
    // The 2024-01-15 window starts after the end date and is never requested
    assert_eq!(source.requests(), vec!["schedule/2024-01-01", "schedule/2024-01-08"]);
}

#[tokio::test]
async fn test_stalled_cursor_aborts_walk() {
    let source = StaticSource::default().schedule(
        "2024-01-01",
        json!({"nextStartDate": "2024-01-01", "gameWeek": []}),
    );

    let err = relevant_game_ids(&source, date_of("2024-01-01"), date_of("2024-01-31"), &picks())
        .await
        .unwrap_err();

    assert!(matches!(err, PoolError::StalledCursor { .. }));
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test]
async fn test_missing_cursor_aborts_walk() {
    let source = StaticSource::default().schedule("2024-01-01", json!({}));

    let err = relevant_game_ids(&source, date_of("2024-01-01"), date_of("2024-01-31"), &picks())
        .await
        .unwrap_err();

    assert!(matches!(err, PoolError::MissingCursor(_)));
}

#[tokio::test]
async fn test_missing_schedule_fails_before_any_game_fetch() {
    let source = StaticSource::default();

    let err = build_report(
        &source,
        &picks(),
        &GameRulesConfig::default(),
        date_of("2024-01-01"),
        date_of("2024-01-07"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PoolError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND));
    assert_eq!(source.requests(), vec!["schedule/2024-01-01"]);
}

#[tokio::test]
async fn test_tally_matches_records_across_games() {
    let source = StaticSource::default()
        .schedule(
            "2024-01-01",
            json!({
                "nextStartDate": "2024-01-08",
                "gameWeek": [
                    {"date": "2024-01-03", "games": [scheduled(11, "EDM", "TOR")]},
                    {"date": "2024-01-01", "games": [scheduled(10, "TOR", "BOS")]},
                    {"date": "2024-01-05", "games": [scheduled(12, "EDM", "FLA")]}
                ]
            }),
        )
        // Untracked winner
        .story(story_json(
            10,
            "2024-01-01",
            "OFF",
            ("TOR", "Maple Leafs", Some(1)),
            ("BOS", "Bruins", Some(2)),
            json!([
                {"periodDescriptor": {"number": 3}, "goals": [
                    {"timeInPeriod": "19:00", "name": {"default": "W. Nylander"}, "assists": [{"name": {"default": "M. Rielly"}}]},
                    {"timeInPeriod": "19:30", "name": {"default": "D. Pastrnak"}, "assists": []}
                ]},
                {"periodDescriptor": {"number": 4}, "goals": [
                    {"timeInPeriod": "01:10", "name": {"default": "B. Marchand"}, "assists": []}
                ]}
            ]),
        ))
        .story(story_json(
            11,
            "2024-01-03",
            "FINAL",
            ("EDM", "Oilers", Some(5)),
            ("TOR", "Maple Leafs", Some(3)),
            json!([
                {"periodDescriptor": {"number": 1}, "goals": [
                    {"timeInPeriod": "02:00", "name": {"default": "C. McDavid"}, "assists": [{"name": {"default": "L. Draisaitl"}}]},
                    {"timeInPeriod": "08:45", "name": {"default": "L. Draisaitl"}, "assists": [{"name": {"default": "C. McDavid"}}]}
                ]}
            ]),
        ))
        // Still in progress: scores but no winner
        .story(story_json(
            12,
            "2024-01-05",
            "LIVE",
            ("EDM", "Oilers", Some(2)),
            ("FLA", "Panthers", Some(0)),
            json!([
                {"periodDescriptor": {"number": 2}, "goals": [
                    {"timeInPeriod": "11:11", "name": {"default": "Z. Hyman"}, "assists": [{"name": {"default": "L. Draisaitl"}}]}
                ]}
            ]),
        ));

    let report = build_report(
        &source,
        &picks(),
        &GameRulesConfig::default(),
        date_of("2024-01-01"),
        date_of("2024-01-07"),
    )
    .await
    .unwrap();

    let dates: Vec<_> = report.dates.iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-03", "2024-01-05"]);

    let all_games: Vec<_> = report.dates.iter().flat_map(|b| b.games.iter()).collect();
    assert_eq!(all_games[2].winner, None);

    // Only tracked winners are tallied
    assert_eq!(report.team_wins.len(), 1);
    assert_eq!(report.team_wins.get("EDM"), Some(&1));
    assert_eq!(
        all_games.iter().filter(|g| g.winner.as_deref() == Some("EDM")).count(),
        1
    );

    assert_eq!(report.player_points.get("W. Nylander"), Some(&1));
    assert_eq!(report.player_points.get("L. Draisaitl"), Some(&3));
    assert_eq!(report.player_points.get("C. McDavid"), None);

    // Untracked-only goals are not recorded
    assert_eq!(all_games[0].goals.len(), 1);

    let sanna = report.standings.iter().find(|s| s.person == "Sanna").unwrap();
    assert_eq!((sanna.wins, sanna.points, sanna.total), (1, 3, 5));
    for standing in &report.standings {
        assert_eq!(standing.total, 2 * standing.wins + standing.points);
    }

    assert_eq!(report.dates[1].played.get("TOR"), Some(&1));
    assert_eq!(report.dates[1].played.get("EDM"), Some(&1));
}

#[tokio::test]
async fn test_stop_at_unplayed_date() {
    let source = StaticSource::default()
        .schedule(
            "2024-01-01",
            json!({
                "nextStartDate": "2024-01-08",
                "gameWeek": [
                    {"date": "2024-01-01", "games": [scheduled(20, "TOR", "FLA")]},
                    {"date": "2024-01-02", "games": [scheduled(21, "EDM", "TOR")]}
                ]
            }),
        )
        .story(story_json(
            20,
            "2024-01-01",
            "OFF",
            ("TOR", "Maple Leafs", Some(3)),
            ("FLA", "Panthers", Some(1)),
            json!([]),
        ))
        .story(json!({
            "id": 21,
            "gameDate": "2024-01-02",
            "gameState": "FUT",
            "awayTeam": {"abbrev": "EDM", "name": {"default": "Oilers"}},
            "homeTeam": {"abbrev": "TOR", "name": {"default": "Maple Leafs"}}
        }));

    let rules = GameRulesConfig { stop_at_unplayed: true, ..GameRulesConfig::default() };
    let report =
        build_report(&source, &picks(), &rules, date_of("2024-01-01"), date_of("2024-01-07"))
            .await
            .unwrap();

    assert_eq!(report.dates.len(), 1);
    assert_eq!(report.team_wins.get("TOR"), Some(&1));
}

#[tokio::test]
async fn test_games_after_end_are_not_tallied() {
    let source = StaticSource::default()
        .schedule(
            "2024-01-01",
            json!({
                "nextStartDate": "2024-01-08",
                "gameWeek": [
                    {"date": "2024-01-01", "games": [scheduled(30, "TOR", "FLA")]},
                    {"date": "2024-01-06", "games": [scheduled(31, "TOR", "BOS")]}
                ]
            }),
        )
        .story(story_json(
            30,
            "2024-01-01",
            "OFF",
            ("TOR", "Maple Leafs", Some(3)),
            ("FLA", "Panthers", Some(1)),
            json!([]),
        ))
        .story(story_json(
            31,
            "2024-01-06",
            "OFF",
            ("TOR", "Maple Leafs", Some(5)),
            ("BOS", "Bruins", Some(2)),
            json!([
                {"periodDescriptor": {"number": 1}, "goals": [
                    {"timeInPeriod": "04:00", "name": {"default": "W. Nylander"}, "assists": []}
                ]}
            ]),
        ));

    let report = build_report(
        &source,
        &picks(),
        &GameRulesConfig::default(),
        date_of("2024-01-01"),
        date_of("2024-01-01"),
    )
    .await
    .unwrap();

    let dates: Vec<_> = report.dates.iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-01-01"]);
    assert_eq!(report.team_wins.get("TOR"), Some(&1));
    assert_eq!(report.player_points.get("W. Nylander"), None);

    let mika = report.standings.iter().find(|s| s.person == "Mika").unwrap();
    assert_eq!((mika.wins, mika.points, mika.total), (1, 0, 2));
}
