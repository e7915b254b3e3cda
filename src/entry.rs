// 📍 Entry Model
// One report per CSV row. Built once at load time, read-only afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ENTRY TYPE
// ============================================================================

/// EntryType - What the report is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Unknown,
    Stolen,
    Found,
    Sighting,
    Burnt,
}

impl EntryType {
    pub const ALL: [EntryType; 5] = [
        EntryType::Unknown,
        EntryType::Stolen,
        EntryType::Found,
        EntryType::Sighting,
        EntryType::Burnt,
    ];

    /// Case-insensitive lookup of the raw CSV value. `None` if unrecognized.
    pub fn parse(raw: &str) -> Option<EntryType> {
        let raw = raw.trim();
        EntryType::ALL
            .into_iter()
            .filter(|t| *t != EntryType::Unknown)
            .find(|t| t.name().eq_ignore_ascii_case(raw))
    }

    /// Lenient classification: anything unrecognized is `Unknown`
    pub fn classify(raw: &str) -> EntryType {
        EntryType::parse(raw).unwrap_or(EntryType::Unknown)
    }

    /// Lowercase name as written in the data file
    pub fn name(&self) -> &'static str {
        match self {
            EntryType::Unknown => "unknown",
            EntryType::Stolen => "stolen",
            EntryType::Found => "found",
            EntryType::Sighting => "sighting",
            EntryType::Burnt => "burnt",
        }
    }

    /// Position in `ALL`, used to key lookup tables
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ENTRY
// ============================================================================

/// Entry - A single validated report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    line: u64,
    date: NaiveDate,
    longitude: f64,
    latitude: f64,
    accurate: bool,
    entry_type: EntryType,
    link: Option<String>,
    notes: Option<String>,
}

impl Entry {
    pub fn new(
        line: u64,
        date: NaiveDate,
        longitude: f64,
        latitude: f64,
        accurate: bool,
        entry_type: EntryType,
    ) -> Self {
        Entry {
            line,
            date,
            longitude,
            latitude,
            accurate,
            entry_type,
            link: None,
            notes: None,
        }
    }

    /// Builder: attach a link. Empty strings mean no link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = non_empty(link.into());
        self
    }

    /// Builder: attach free-text notes. Empty strings mean no notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(notes.into());
        self
    }

    /// 1-based data row number; the header row is not counted
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn accurate(&self) -> bool {
        self.accurate
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date = {}, Location = ({}, {}), Type = {}, Link = {}",
            self.date,
            self.longitude,
            self.latitude,
            self.entry_type,
            self.link.as_deref().unwrap_or("")
        )
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Diagnostic - Non-fatal finding raised while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// Row dated after the processing time; excluded from the result
    FutureDate { line: u64, date: NaiveDate },
    /// Type column not recognized; row kept as `EntryType::Unknown`
    UnrecognizedType { line: u64, value: String },
}

impl Diagnostic {
    pub fn line(&self) -> u64 {
        match self {
            Diagnostic::FutureDate { line, .. } | Diagnostic::UnrecognizedType { line, .. } => {
                *line
            }
        }
    }

    /// True if the row this diagnostic refers to was dropped
    pub fn excludes_row(&self) -> bool {
        matches!(self, Diagnostic::FutureDate { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FutureDate { line, date } => write!(
                f,
                "Excluding invalid entry on line {}. \tDate '{}' is in the future",
                line, date
            ),
            Diagnostic::UnrecognizedType { line, value } => write!(
                f,
                "Unknown report entry type '{}' on line {}, shown as unknown",
                value, line
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entry_type_case_insensitive() {
        assert_eq!(EntryType::classify("stolen"), EntryType::Stolen);
        assert_eq!(EntryType::classify("STOLEN"), EntryType::Stolen);
        assert_eq!(EntryType::classify("Found"), EntryType::Found);
        assert_eq!(EntryType::classify(" sighting "), EntryType::Sighting);
        assert_eq!(EntryType::classify("bUrNt"), EntryType::Burnt);
    }

    #[test]
    fn test_entry_type_unrecognized_is_unknown() {
        assert_eq!(EntryType::parse("vandalised"), None);
        assert_eq!(EntryType::classify("vandalised"), EntryType::Unknown);
        assert_eq!(EntryType::classify(""), EntryType::Unknown);
        // "unknown" is the fallback, not a value the data file names
        assert_eq!(EntryType::parse("unknown"), None);
    }

    #[test]
    fn test_entry_type_index_matches_all() {
        for (i, t) in EntryType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn test_entry_builder_drops_empty_link_and_notes() {
        let entry = Entry::new(2, date(2020, 1, 1), -2.58, 51.45, true, EntryType::Stolen)
            .with_link("")
            .with_notes("   ");

        assert_eq!(entry.link(), None);
        assert_eq!(entry.notes(), None);
    }

    #[test]
    fn test_entry_display() {
        let entry = Entry::new(2, date(2020, 1, 1), -2.58, 51.45, true, EntryType::Stolen)
            .with_link("http://x");

        assert_eq!(
            entry.to_string(),
            "Date = 2020-01-01, Location = (-2.58, 51.45), Type = stolen, Link = http://x"
        );
    }

    #[test]
    fn test_future_date_diagnostic_message() {
        let diag = Diagnostic::FutureDate {
            line: 3,
            date: date(2099, 5, 1),
        };
        assert!(diag.excludes_row());
        assert_eq!(
            diag.to_string(),
            "Excluding invalid entry on line 3. \tDate '2099-05-01' is in the future"
        );
    }
}
