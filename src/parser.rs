// 🏗️ Record Parser
// CSV rows → validated Entry records

use crate::config::ProcessingTime;
use crate::entry::{Diagnostic, Entry, EntryType};
use crate::error::ReportError;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

pub const DATE_INDEX: usize = 1;
pub const LONG_INDEX: usize = 2;
pub const LAT_INDEX: usize = 3;
pub const ACCURATE_INDEX: usize = 4;
pub const LINK_INDEX: usize = 5;
pub const TYPE_INDEX: usize = 6;
pub const NOTES_INDEX: usize = 7;

/// Rows need every fixed column up to and including the type
pub const MIN_COLUMNS: usize = TYPE_INDEX + 1;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ============================================================================
// OPTIONS & OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseOptions {
    /// Fail the run on an unrecognized type instead of mapping it to Unknown
    pub strict_types: bool,
}

/// Result of parsing one row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Kept {
        entry: Entry,
        diagnostic: Option<Diagnostic>,
    },
    Excluded(Diagnostic),
}

/// ParseOutcome - Valid entries in file order plus everything worth reporting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub entries: Vec<Entry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// Number of rows dropped for being dated in the future
    pub fn excluded(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.excludes_row()).count()
    }

    pub fn total_valid(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a data file from disk
pub fn load_csv(
    path: &Path,
    now: ProcessingTime,
    options: ParseOptions,
) -> Result<ParseOutcome, ReportError> {
    load_csv_with(path, now, options, |_| {})
}

/// Like `load_csv`, handing each diagnostic to `on_diagnostic` as its row is read
pub fn load_csv_with<F>(
    path: &Path,
    now: ProcessingTime,
    options: ParseOptions,
    on_diagnostic: F,
) -> Result<ParseOutcome, ReportError>
where
    F: FnMut(&Diagnostic),
{
    let file = File::open(path).map_err(|e| ReportError::io(path, e))?;
    tracing::debug!(path = %path.display(), "reading reports");
    parse_reader_with(file, now, options, on_diagnostic)
}

/// Parse CSV from any reader
///
/// The first row is a header and is skipped whatever it contains. Fields are
/// split on every comma: free-text notes may contain commas and are rejoined
/// by `parse_row`, so quoting is not interpreted.
pub fn parse_reader<R: io::Read>(
    reader: R,
    now: ProcessingTime,
    options: ParseOptions,
) -> Result<ParseOutcome, ReportError> {
    parse_reader_with(reader, now, options, |_| {})
}

/// Like `parse_reader`, handing each diagnostic to `on_diagnostic` as its
/// row is read. Diagnostics from rows before a structural error have
/// already been handed out when the error is returned.
pub fn parse_reader_with<R, F>(
    reader: R,
    now: ProcessingTime,
    options: ParseOptions,
    mut on_diagnostic: F,
) -> Result<ParseOutcome, ReportError>
where
    R: io::Read,
    F: FnMut(&Diagnostic),
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut outcome = ParseOutcome::default();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // Data rows count from 1; the header is not numbered
        let line = idx as u64 + 1;
        let fields: Vec<&str> = record.iter().collect();

        match parse_row(&fields, line, now, options)? {
            RowOutcome::Kept { entry, diagnostic } => {
                if let Some(d) = diagnostic {
                    on_diagnostic(&d);
                    outcome.diagnostics.push(d);
                }
                outcome.entries.push(entry);
            }
            RowOutcome::Excluded(d) => {
                tracing::debug!(line, "{}", d);
                on_diagnostic(&d);
                outcome.diagnostics.push(d);
            }
        }
    }

    tracing::info!(
        valid = outcome.total_valid(),
        excluded = outcome.excluded(),
        "parsed reports"
    );

    Ok(outcome)
}

/// Parse one already-split row
///
/// Fixed columns are trimmed; the notes text is kept as written.
pub fn parse_row(
    fields: &[&str],
    line: u64,
    now: ProcessingTime,
    options: ParseOptions,
) -> Result<RowOutcome, ReportError> {
    if fields.len() < MIN_COLUMNS {
        return Err(ReportError::MalformedRow {
            line,
            columns: fields.len(),
            expected: MIN_COLUMNS,
        });
    }

    let date = parse_date(fields[DATE_INDEX], line)?;
    let longitude = parse_coordinate(fields[LONG_INDEX], "longitude", line)?;
    let latitude = parse_coordinate(fields[LAT_INDEX], "latitude", line)?;
    let accurate = fields[ACCURATE_INDEX].trim().eq_ignore_ascii_case("yes");

    let raw_type = fields[TYPE_INDEX].trim();
    let (entry_type, diagnostic) = match EntryType::parse(raw_type) {
        Some(t) => (t, None),
        None if options.strict_types => {
            return Err(ReportError::UnrecognizedType {
                line,
                value: raw_type.to_string(),
            });
        }
        None => {
            tracing::warn!(line, value = raw_type, "unrecognized entry type, using unknown");
            (
                EntryType::Unknown,
                Some(Diagnostic::UnrecognizedType {
                    line,
                    value: raw_type.to_string(),
                }),
            )
        }
    };

    if now.is_future(date) {
        return Ok(RowOutcome::Excluded(Diagnostic::FutureDate { line, date }));
    }

    let entry = Entry::new(line, date, longitude, latitude, accurate, entry_type)
        .with_link(fields[LINK_INDEX].trim())
        .with_notes(notes_field(fields));

    Ok(RowOutcome::Kept { entry, diagnostic })
}

/// Notes run from NOTES_INDEX to the second-to-last column; the last column
/// is not part of them.
fn notes_field(fields: &[&str]) -> String {
    if fields.len() <= NOTES_INDEX + 1 {
        return String::new();
    }
    fields[NOTES_INDEX..fields.len() - 1].join(",")
}

fn parse_date(raw: &str, line: u64) -> Result<NaiveDate, ReportError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ReportError::DateFormat {
        line,
        value: raw.to_string(),
    })
}

fn parse_coordinate(raw: &str, field: &'static str, line: u64) -> Result<f64, ReportError> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ReportError::InvalidCoordinate {
            line,
            field,
            value: raw.to_string(),
        })
}

// ============================================================================
// TESTS
// ============================================================================
