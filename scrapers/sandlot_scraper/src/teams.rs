use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, ScrapeError},
    types::Team,
    utils::{digits_only, normalize_ws},
    web::HtmlFetcher,
};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::parse(format!("invalid CSS selector '{}': {}", css, e)))
}

/// Finds `name=<digits>` in a link target, case-insensitively.
struct IdPattern(Regex);

impl IdPattern {
    fn new(name: &str) -> Result<Self> {
        Regex::new(&format!(r"(?i){}=\d{{1,6}}", name))
            .map(Self)
            .map_err(|e| ScrapeError::parse(e.to_string()))
    }

    fn find(&self, href: &str) -> Option<String> {
        self.0.find(href).map(|m| digits_only(m.as_str()))
    }
}

pub struct TeamListParser {
    table: Selector,
    row: Selector,
    name_cell: Selector,
    link: Selector,
    team_id: IdPattern,
    league_id: IdPattern,
}

impl TeamListParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: selector("table")?,
            row: selector("tr")?,
            name_cell: selector("td.teamName")?,
            link: selector("a[href]")?,
            team_id: IdPattern::new("teamid")?,
            league_id: IdPattern::new("leagueid")?,
        })
    }

    /// Reads every team out of the first table on the listing page.
    ///
    /// Rows without a team cell are header rows and are passed over; rows
    /// whose link lacks either id are logged and skipped.
    pub fn parse(&self, html: &str) -> Result<Vec<Team>> {
        let document = Html::parse_document(html);
        let table = document
            .select(&self.table)
            .next()
            .ok_or_else(|| ScrapeError::parse("team listing has no table"))?;

        let mut teams = Vec::new();
        for (i, row) in table.select(&self.row).enumerate() {
            match self.parse_row(&row) {
                Ok(Some(team)) => teams.push(team),
                Ok(None) => debug!("Row {} has no team cell, skipping", i),
                Err(e) => warn!("Skipping team listing row {}: {}", i, e),
            }
        }

        Ok(teams)
    }

    fn parse_row(&self, row: &ElementRef) -> Result<Option<Team>> {
        let Some(cell) = row.select(&self.name_cell).next() else {
            return Ok(None);
        };
        let name = normalize_ws(&cell.text().collect::<String>());

        let href = cell
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| ScrapeError::parse(format!("no link for team '{}'", name)))?;

        let team_id = self
            .team_id
            .find(href)
            .ok_or_else(|| ScrapeError::parse(format!("no teamid in '{}'", href)))?;
        let league_id = self
            .league_id
            .find(href)
            .ok_or_else(|| ScrapeError::parse(format!("no leagueid in '{}'", href)))?;

        Ok(Some(Team {
            name,
            team_id,
            league_id,
        }))
    }
}

/// Lists the teams of a parent league. Any failure here is fatal to the run.
pub fn enumerate_teams<F: HtmlFetcher>(fetcher: &F, parent_league_id: &str) -> Result<Vec<Team>> {
    let html = fetcher.fetch_team_listing(parent_league_id)?;
    let teams = TeamListParser::new()?.parse(&html)?;
    info!("Found {} teams in league {}", teams.len(), parent_league_id);
    Ok(teams)
}
