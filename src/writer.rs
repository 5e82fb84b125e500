use crate::error::ConvertError;
use crate::types::OutcomeLabel;

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Separator between position and label in an output record.
pub const RECORD_SEPARATOR: char = ';';

/// Appends `<fen>;<label>` lines to the output.
pub struct RecordWriter<W: Write> {
    out: W,
    records: u64,
}

impl RecordWriter<BufWriter<File>> {
    /// Opens `path` for appending, creating it when absent. Existing content
    /// is never truncated.
    pub fn append_to(path: &Path) -> Result<Self, ConvertError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ConvertError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, records: 0 }
    }

    pub fn write_record(
        &mut self,
        position: impl Display,
        label: OutcomeLabel,
    ) -> Result<(), ConvertError> {
        writeln!(self.out, "{position}{RECORD_SEPARATOR}{label}").map_err(ConvertError::Write)?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn flush(&mut self) -> Result<(), ConvertError> {
        self.out.flush().map_err(ConvertError::Write)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
