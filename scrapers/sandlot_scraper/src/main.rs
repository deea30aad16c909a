use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::info;

use sandlot_scraper::{
    config::ScraperConfig,
    crawler::Crawler,
    output::TsvOutput,
    schedule::ScheduleParser,
    types::ErrorEntry,
    web::WebHtmlFetcher,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Games file to append to
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Error log to append to
    #[arg(short, long, global = true)]
    errors: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every team schedule of a parent league
    Scrape {
        /// Parent league id; asked for on stdin when omitted
        #[arg(short, long)]
        league_id: Option<String>,

        /// Optional limit on number of teams to scrape
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Seconds to wait between schedule requests
        #[arg(short, long)]
        delay_secs: Option<u64>,
    },
    /// Parse a saved schedule page
    ParseFile {
        /// Path to the HTML file to process
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        team_id: String,

        #[arg(short, long)]
        league_id: String,
    },
}

fn prompt_league_id() -> Result<String> {
    print!("Please enter the parent league ID: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = ScraperConfig::from_env();
    if let Some(path) = cli.output {
        config.output.games_path = path;
    }
    if let Some(path) = cli.errors {
        config.output.errors_path = path;
    }

    let mut output = TsvOutput::append_to(&config.output.games_path, &config.output.errors_path)
        .with_context(|| {
            format!(
                "Failed to open {:?} / {:?}",
                config.output.games_path, config.output.errors_path
            )
        })?;

    match cli.command {
        Commands::Scrape {
            league_id,
            limit,
            delay_secs,
        } => {
            if let Some(delay) = delay_secs {
                config.rate_limits.delay_secs = delay;
            }
            let league_id = match league_id {
                Some(id) => id,
                None => prompt_league_id()?,
            };

            let fetcher = WebHtmlFetcher::new(&config).context("Failed to create HTTP client")?;
            let mut crawler = Crawler::new(fetcher, output, config.rate_limits.delay())?.with_limit(limit);
            let summary = crawler
                .run(&league_id)
                .with_context(|| format!("Failed to scrape league {}", league_id))?;
            info!("{:?}", summary);
        }
        Commands::ParseFile {
            file,
            team_id,
            league_id,
        } => {
            let html = fs::read_to_string(&file).with_context(|| format!("Failed to read {:?}", file))?;
            info!("Processing schedule page: {:?}", file);

            let outcome = ScheduleParser::new()?.parse(&html, &team_id, &league_id);
            for record in &outcome.records {
                output.write_record(record)?;
            }
            for _ in &outcome.failures {
                output.log_error(&ErrorEntry::new(&team_id, &league_id))?;
            }
            info!(
                "Wrote {} records ({} rows without score, {} errors)",
                outcome.records.len(),
                outcome.skipped_rows,
                outcome.failures.len()
            );
        }
    }

    Ok(())
}
