use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, ScrapeError},
    teams::selector,
    types::{GameRecord, ScheduleOutcome, TeamHeading},
    utils::{self, normalize_ws},
    web::HtmlFetcher,
};

pub const RESULTS_TABLE: &str = "table#upcomingGames";

pub const DATE: &str = "Date";
pub const OPPONENT: &str = "Opponent";
pub const RESULT: &str = "Win or Loss";
pub const SCORE: &str = "Score";
pub const OPPONENT_SCORE: &str = "Opp. Score";
pub const LOCATION: &str = "Field";
pub const GAME_TIME: &str = "Game Time";
/// Only present in seasons where teams rate themselves.
pub const OPPONENT_RATING: &str = "Self Rtg";

/// Column label -> position, read from the header row of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap(HashMap<String, usize>);

impl HeaderMap {
    pub fn from_row(row: &ElementRef) -> Self {
        let columns = row
            .children()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .map(|(i, cell)| (header_label(&cell), i))
            .collect();
        Self(columns)
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.0.get(label).copied()
    }

    pub fn require(&self, label: &str) -> Result<usize> {
        self.get(label)
            .ok_or_else(|| ScrapeError::MissingColumn(label.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// "Opp.<br>Score" -> "Opp. Score"
fn header_label(cell: &ElementRef) -> String {
    normalize_ws(&cell.text().collect::<Vec<_>>().join(" "))
}

/// Cells of one table row, looked up by header label.
struct Row<'a> {
    cells: Vec<ElementRef<'a>>,
}

impl<'a> Row<'a> {
    fn new(row: &ElementRef<'a>) -> Self {
        Self {
            cells: row.children().filter_map(ElementRef::wrap).collect(),
        }
    }

    fn text_at(&self, index: usize) -> Option<String> {
        self.cells.get(index).map(|c| c.text().collect())
    }

    fn text(&self, header: &HeaderMap, label: &str) -> Result<String> {
        let index = header.require(label)?;
        self.text_at(index).ok_or_else(|| ScrapeError::MissingCell {
            label: label.to_string(),
            index,
        })
    }

    fn optional_text(&self, header: &HeaderMap, label: &str) -> Result<String> {
        match header.get(label) {
            Some(_) => self.text(header, label),
            None => Ok(String::new()),
        }
    }
}

pub struct ScheduleParser {
    heading: Selector,
    line_break: Selector,
    table: Selector,
    row: Selector,
    game_row: Selector,
}

impl ScheduleParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            heading: selector("h2#pageName")?,
            line_break: selector("br")?,
            table: selector(RESULTS_TABLE)?,
            row: selector("tr")?,
            game_row: selector("tr[class]")?,
        })
    }

    /// Parses one team's schedule page.
    ///
    /// A missing heading is recorded but does not stop the table from being
    /// read. A table failure stops at the offending row; rows before it are
    /// kept.
    pub fn parse(&self, html: &str, team_id: &str, league_id: &str) -> ScheduleOutcome {
        let document = Html::parse_document(html);
        let mut outcome = ScheduleOutcome::default();

        match self.extract_heading(&document) {
            Ok(heading) => outcome.heading = Some(heading),
            Err(e) => {
                warn!("Team {} (league {}): {}", team_id, league_id, e);
                outcome.failures.push(e);
            }
        }

        let heading = outcome.heading.clone().unwrap_or_default();
        if let Err(e) = self.extract_games(&document, team_id, league_id, &heading, &mut outcome) {
            warn!("Team {} (league {}): {}", team_id, league_id, e);
            outcome.failures.push(e);
        }

        outcome
    }

    fn extract_heading(&self, document: &Html) -> Result<TeamHeading> {
        let heading = document
            .select(&self.heading)
            .next()
            .ok_or(ScrapeError::MissingHeading)?;

        let team_name = heading
            .text()
            .next()
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        Ok(match self.text_after_break(&heading) {
            Some(rating) => TeamHeading {
                team_name,
                team_rating: utils::self_rating(&rating),
            },
            None => TeamHeading {
                team_name: utils::strip_unrated_suffix(&team_name),
                team_rating: String::new(),
            },
        })
    }

    fn text_after_break(&self, heading: &ElementRef) -> Option<String> {
        let line_break = heading.select(&self.line_break).next()?;
        let next = line_break.next_sibling()?;
        match next.value() {
            Node::Text(text) => Some(text.text.to_string()),
            Node::Element(_) => ElementRef::wrap(next).map(|el| el.text().collect()),
            _ => None,
        }
    }

    fn extract_games(
        &self,
        document: &Html,
        team_id: &str,
        league_id: &str,
        heading: &TeamHeading,
        outcome: &mut ScheduleOutcome,
    ) -> Result<()> {
        let table = document
            .select(&self.table)
            .next()
            .ok_or_else(|| ScrapeError::MissingTable(RESULTS_TABLE.to_string()))?;

        let header_row = table
            .select(&self.row)
            .next()
            .ok_or_else(|| ScrapeError::parse("results table has no rows"))?;
        let header = HeaderMap::from_row(&header_row);
        debug!("Results table has {} columns", header.len());

        for game_row in table.select(&self.game_row) {
            let row = Row::new(&game_row);

            let score = utils::digits_only(&row.text(&header, SCORE)?);
            if score.is_empty() {
                info!(
                    "No score found for {}",
                    row.text_at(0).map(|t| normalize_ws(&t)).unwrap_or_default()
                );
                outcome.skipped_rows += 1;
                continue;
            }

            let record = self.build_record(&row, &header, score, team_id, league_id, heading)?;
            debug!("Adding row: {:?}", record);
            outcome.records.push(record);
        }

        Ok(())
    }

    fn build_record(
        &self,
        row: &Row,
        header: &HeaderMap,
        score: String,
        team_id: &str,
        league_id: &str,
        heading: &TeamHeading,
    ) -> Result<GameRecord> {
        let location = utils::split_location(&row.text(header, LOCATION)?);

        Ok(GameRecord {
            date: utils::date_part(&row.text(header, DATE)?),
            team_id: team_id.to_string(),
            league_id: league_id.to_string(),
            team_name: heading.team_name.clone(),
            opponent: utils::opponent_name(&row.text(header, OPPONENT)?),
            result: utils::result_code(&row.text(header, RESULT)?),
            score,
            opponent_score: utils::digits_only(&row.text(header, OPPONENT_SCORE)?),
            location_raw: location.raw,
            park: location.park,
            field: location.field,
            game_time: row.text(header, GAME_TIME)?.trim().to_string(),
            team_rating: heading.team_rating.clone(),
            opponent_rating: row.optional_text(header, OPPONENT_RATING)?.trim().to_string(),
        })
    }
}

/// Fetches and parses one team's schedule. Nothing here aborts the run: a
/// failed fetch comes back as an outcome with a single failure.
pub fn extract_schedule<F: HtmlFetcher>(
    fetcher: &F,
    parser: &ScheduleParser,
    team_id: &str,
    league_id: &str,
) -> ScheduleOutcome {
    match fetcher.fetch_schedule(team_id, league_id) {
        Ok(html) => parser.parse(&html, team_id, league_id),
        Err(e) => {
            warn!("Team {} (league {}): {}", team_id, league_id, e);
            ScheduleOutcome::failed(e)
        }
    }
}
