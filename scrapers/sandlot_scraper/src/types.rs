use serde::Serialize;

use crate::error::ScrapeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub team_id: String,
    pub league_id: String,
}

/// One line of the games file. Field order is the on-disk column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub date: String,
    pub team_id: String,
    pub league_id: String,
    pub team_name: String,
    pub opponent: String,
    pub result: String,
    pub score: String,
    pub opponent_score: String,
    pub location_raw: String,
    pub park: String,
    pub field: String,
    pub game_time: String,
    pub team_rating: String,
    pub opponent_rating: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub team_id: String,
    pub league_id: String,
}

impl ErrorEntry {
    pub fn new(team_id: &str, league_id: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            league_id: league_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamHeading {
    pub team_name: String,
    pub team_rating: String,
}

/// Everything pulled out of one schedule page.
///
/// `records` holds the rows produced before extraction stopped, in table
/// order. Each entry of `failures` is worth one error-log line.
#[derive(Debug, Default)]
pub struct ScheduleOutcome {
    pub heading: Option<TeamHeading>,
    pub records: Vec<GameRecord>,
    pub skipped_rows: usize,
    pub failures: Vec<ScrapeError>,
}

impl ScheduleOutcome {
    pub fn failed(failure: ScrapeError) -> Self {
        Self {
            failures: vec![failure],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub teams_found: usize,
    pub teams_processed: usize,
    pub records_written: usize,
    pub rows_skipped: usize,
    pub errors_logged: usize,
}
