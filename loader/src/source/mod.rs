//! CSV row source.
//!
//! Reads headerless, comma-delimited CSV and yields positional [`Row`]s in
//! file order. Field values are never trimmed or decoded beyond UTF-8.
//!
//! The first record fixes the row width: any later record with a different
//! field count is a read error. Whether that width is wide enough for a
//! product is left to [`crate::models::ProductRecord`].
//!
//! A `"` inside an unquoted field is kept as a literal character, and a
//! leading UTF-8 byte order mark is not part of the first field.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{SourceError, SourceResult};
use crate::models::Row;

/// Iterator over the rows of a CSV input.
///
/// Stops after the first read error.
pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    failed: bool,
}

impl CsvSource<File> {
    /// Open a CSV file.
    pub fn open<P: AsRef<Path>>(path: P) -> SourceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CsvSource<R> {
    /// Wrap any reader.
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(reader);

        Self {
            reader,
            record: StringRecord::new(),
            failed: false,
        }
    }

    fn next_row(&mut self) -> SourceResult<Option<Row>> {
        let more = self.reader.read_record(&mut self.record).map_err(|source| {
            let line = source
                .position()
                .map(|p| p.line())
                .unwrap_or_else(|| self.reader.position().line());
            SourceError::Read { line, source }
        })?;

        if !more {
            return Ok(None);
        }

        let line = self
            .record
            .position()
            .map(|p| p.line())
            .unwrap_or_else(|| self.reader.position().line());
        let fields = self.record.iter().map(str::to_string).collect();
        Ok(Some(Row::new(line, fields)))
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = SourceResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_row() {
            Ok(row) => row.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse an in-memory CSV string into rows.
///
/// # Example
/// ```ignore
/// use product_loader::parse_rows;
///
/// let rows = parse_rows("L100,Widget,250,10,kg,Y\n").unwrap();
/// assert_eq!(rows[0].fields[1], "Widget");
/// ```
pub fn parse_rows(csv: &str) -> SourceResult<Vec<Row>> {
    CsvSource::from_reader(csv.as_bytes()).collect()
}
