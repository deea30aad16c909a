use anyhow::Result;
use mockito::{Matcher, Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;
use std::{fs, path::Path, time::Duration};

use sandlot_scraper::{
    config::ScraperConfig,
    crawler::Crawler,
    error::ScrapeError,
    output::TsvOutput,
    types::{CrawlSummary, GameRecord},
    web::WebHtmlFetcher,
};

const PARENT_LEAGUE_ID: &str = "300";

fn config_for(server: &ServerGuard) -> ScraperConfig {
    let mut config = ScraperConfig::default();
    config.site.base_url = format!("{}/teams/", server.url());
    config.rate_limits.delay_secs = 0;
    config.scraping.request_timeout_secs = 5;
    config
}

fn mock_listing(server: &mut ServerGuard, status: usize) -> Mock {
    server
        .mock("GET", "/teams/")
        .match_query(Matcher::UrlEncoded("leagueid".into(), PARENT_LEAGUE_ID.into()))
        .with_status(status)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(include_str!("fixtures/team_listing.html"))
        .create()
}

fn mock_schedule(server: &mut ServerGuard, team_id: &str, league_id: &str, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/teams/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("teamid".into(), team_id.into()),
            Matcher::UrlEncoded("leagueid".into(), league_id.into()),
        ]))
        .with_status(status)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .create()
}

fn read_games(path: &Path) -> Result<Vec<GameRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)?;

    let mut games = Vec::new();
    for result in rdr.records() {
        let record = result?;
        assert_eq!(record.len(), 14, "Unexpected column count in {:?}", record);
        games.push(GameRecord {
            date: record[0].to_string(),
            team_id: record[1].to_string(),
            league_id: record[2].to_string(),
            team_name: record[3].to_string(),
            opponent: record[4].to_string(),
            result: record[5].to_string(),
            score: record[6].to_string(),
            opponent_score: record[7].to_string(),
            location_raw: record[8].to_string(),
            park: record[9].to_string(),
            field: record[10].to_string(),
            game_time: record[11].to_string(),
            team_rating: record[12].to_string(),
            opponent_rating: record[13].to_string(),
        });
    }
    Ok(games)
}

fn game(fields: [&str; 14]) -> GameRecord {
    let [date, team_id, league_id, team_name, opponent, result, score, opponent_score, location_raw, park, field, game_time, team_rating, opponent_rating] =
        fields.map(str::to_string);
    GameRecord {
        date,
        team_id,
        league_id,
        team_name,
        opponent,
        result,
        score,
        opponent_score,
        location_raw,
        park,
        field,
        game_time,
        team_rating,
        opponent_rating,
    }
}

#[test]
fn test_crawl_league_writes_games_file() -> Result<()> {
    let mut server = Server::new();
    let listing = mock_listing(&mut server, 200);
    let summer = mock_schedule(&mut server, "4021", "311", 200, include_str!("fixtures/schedule_summer.html"));
    let fall = mock_schedule(&mut server, "4022", "312", 200, include_str!("fixtures/schedule_fall.html"));

    let dir = tempfile::tempdir()?;
    let games_path = dir.path().join("games.txt");
    let errors_path = dir.path().join("errors.txt");

    let config = config_for(&server);
    let output = TsvOutput::append_to(&games_path, &errors_path)?;
    let mut crawler = Crawler::new(WebHtmlFetcher::new(&config)?, output, Duration::ZERO)?;
    let summary = crawler.run(PARENT_LEAGUE_ID)?;
    drop(crawler);

    listing.assert();
    summer.assert();
    fall.assert();

    assert_eq!(
        summary,
        CrawlSummary {
            teams_found: 2,
            teams_processed: 2,
            records_written: 3,
            rows_skipped: 1,
            errors_logged: 0,
        }
    );

    assert_eq!(
        read_games(&games_path)?,
        vec![
            game([
                "6/12/2013", "4021", "311", "Hammerheads", "Red Sox", "W", "13", "7", "Memorial A", "Memorial", "A",
                "6:30 PM", "3.5", "2.75",
            ]),
            game([
                "6/19/2013", "4021", "311", "Hammerheads", "Thunder", "L", "9", "13", "Riverside Park",
                "Riverside Park", "Riverside Park", "8:00 PM", "3.5", "4.0",
            ]),
            game([
                "9/4/2013", "4022", "312", "Red Sox", "Hammerheads", "L", "7", "13", "Memorial A", "Memorial", "A",
                "6:30 PM", "", "",
            ]),
        ]
    );
    assert_eq!(fs::read_to_string(&errors_path)?, "");

    Ok(())
}

#[test]
fn test_failed_schedule_is_logged_and_skipped() -> Result<()> {
    let mut server = Server::new();
    let _listing = mock_listing(&mut server, 200);
    let _summer = mock_schedule(&mut server, "4021", "311", 500, "Internal Server Error");
    let _fall = mock_schedule(&mut server, "4022", "312", 200, include_str!("fixtures/schedule_fall.html"));

    let dir = tempfile::tempdir()?;
    let games_path = dir.path().join("games.txt");
    let errors_path = dir.path().join("errors.txt");

    let config = config_for(&server);
    let output = TsvOutput::append_to(&games_path, &errors_path)?;
    let mut crawler = Crawler::new(WebHtmlFetcher::new(&config)?, output, Duration::ZERO)?;
    let summary = crawler.run(PARENT_LEAGUE_ID)?;
    drop(crawler);

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.errors_logged, 1);
    assert_eq!(fs::read_to_string(&errors_path)?, "4021\t311\r\n");
    assert_eq!(read_games(&games_path)?.len(), 1);

    Ok(())
}

#[test]
fn test_listing_failure_aborts_run() -> Result<()> {
    let mut server = Server::new();
    let _listing = mock_listing(&mut server, 503);

    let config = config_for(&server);
    let output = TsvOutput::new(Vec::new(), Vec::new());
    let mut crawler = Crawler::new(WebHtmlFetcher::new(&config)?, output, Duration::ZERO)?;

    match crawler.run(PARENT_LEAGUE_ID) {
        Err(ScrapeError::Fetch { status, .. }) => assert_eq!(status, 503),
        other => panic!("Expected fetch error, got {:?}", other),
    }

    Ok(())
}
