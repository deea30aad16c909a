use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to fetch {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse page: {0}")]
    Parse(String),

    #[error("No team heading found on schedule page")]
    MissingHeading,

    #[error("No table matching `{0}` found")]
    MissingTable(String),

    #[error("Column `{0}` not present in results table header")]
    MissingColumn(String),

    #[error("Row has no cell at index {index} for column `{label}`")]
    MissingCell { label: String, index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
