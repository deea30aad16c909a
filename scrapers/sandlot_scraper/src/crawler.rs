use std::{io::Write, thread, time::Duration};
use tracing::{info, warn};

use crate::{
    error::Result,
    output::TsvOutput,
    schedule::{extract_schedule, ScheduleParser},
    teams::enumerate_teams,
    types::{CrawlSummary, ErrorEntry, Team},
    web::HtmlFetcher,
};

/// Drives one run: list the league's teams, then pull each schedule in turn.
pub struct Crawler<F: HtmlFetcher, W: Write> {
    fetcher: F,
    parser: ScheduleParser,
    output: TsvOutput<W>,
    delay: Duration,
    limit: Option<usize>,
}

impl<F: HtmlFetcher, W: Write> Crawler<F, W> {
    pub fn new(fetcher: F, output: TsvOutput<W>, delay: Duration) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: ScheduleParser::new()?,
            output,
            delay,
            limit: None,
        })
    }

    /// Only process the first `limit` teams of the listing.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Failing to list the teams ends the run. Per-team failures go to the
    /// error log and the run carries on.
    pub fn run(&mut self, parent_league_id: &str) -> Result<CrawlSummary> {
        info!("Starting crawl of parent league {}", parent_league_id);
        let mut teams = enumerate_teams(&self.fetcher, parent_league_id)?;

        let mut summary = CrawlSummary {
            teams_found: teams.len(),
            ..CrawlSummary::default()
        };

        if let Some(limit) = self.limit {
            teams.truncate(limit);
            info!("Limited to processing {} teams", teams.len());
        }

        for (i, team) in teams.iter().enumerate() {
            if i > 0 {
                thread::sleep(self.delay);
            }
            self.process_team(team, &mut summary)?;
            summary.teams_processed += 1;
        }

        info!(
            "Finished league {}: {} teams, {} records written, {} rows without score, {} errors logged",
            parent_league_id,
            summary.teams_processed,
            summary.records_written,
            summary.rows_skipped,
            summary.errors_logged
        );
        Ok(summary)
    }

    fn process_team(&mut self, team: &Team, summary: &mut CrawlSummary) -> Result<()> {
        info!("Scraping schedule for {} (team {}, league {})", team.name, team.team_id, team.league_id);
        let outcome = extract_schedule(&self.fetcher, &self.parser, &team.team_id, &team.league_id);

        for record in &outcome.records {
            self.output.write_record(record)?;
        }
        for failure in &outcome.failures {
            warn!("Logging team {} (league {}) for follow-up: {}", team.team_id, team.league_id, failure);
            self.output.log_error(&ErrorEntry::new(&team.team_id, &team.league_id))?;
        }

        summary.records_written += outcome.records.len();
        summary.rows_skipped += outcome.skipped_rows;
        summary.errors_logged += outcome.failures.len();

        info!("Wrote {} records for {}", outcome.records.len(), team.name);
        Ok(())
    }

    pub fn into_output(self) -> TsvOutput<W> {
        self.output
    }
}
