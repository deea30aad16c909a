use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

use crate::{
    error::Result,
    types::{ErrorEntry, GameRecord},
};

/// Games file and error log, both tab-delimited and written row by row.
pub struct TsvOutput<W: Write> {
    games: Writer<W>,
    errors: Writer<W>,
}

fn tsv_writer<W: Write>(inner: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(inner)
}

fn open_append(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

impl TsvOutput<File> {
    /// Opens both files for appending; earlier runs are never truncated.
    pub fn append_to(games_path: &Path, errors_path: &Path) -> Result<Self> {
        Ok(Self::new(open_append(games_path)?, open_append(errors_path)?))
    }
}

impl<W: Write> TsvOutput<W> {
    pub fn new(games: W, errors: W) -> Self {
        Self {
            games: tsv_writer(games),
            errors: tsv_writer(errors),
        }
    }

    pub fn write_record(&mut self, record: &GameRecord) -> Result<()> {
        self.games.serialize(record)?;
        self.games.flush()?;
        Ok(())
    }

    pub fn log_error(&mut self, entry: &ErrorEntry) -> Result<()> {
        self.errors.serialize(entry)?;
        self.errors.flush()?;
        Ok(())
    }

    /// Hands back the underlying writers, flushing anything still buffered.
    pub fn into_inner(self) -> Result<(W, W)> {
        let games = self.games.into_inner().map_err(|e| e.into_error())?;
        let errors = self.errors.into_inner().map_err(|e| e.into_error())?;
        Ok((games, errors))
    }
}
