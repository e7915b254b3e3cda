// ⚙️ Run Configuration
// Everything a run needs, built once and passed down explicitly.

use crate::filter::FilterConfig;
use crate::map::MapOptions;
use crate::parser::ParseOptions;
use crate::render::RenderConfig;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "data.csv";
pub const DEFAULT_SAVE_FILE: &str = "thefts.html";
pub const DEFAULT_ZOOM: u8 = 12; // Bristol fits in a 1920x1080 browser window
pub const DEFAULT_LOCATION: &str = "51.4545,-2.5879"; // Bristol, England
pub const DEFAULT_CIRCLE_SIZE: f64 = 1000.0;
pub const DEFAULT_DAYS: u32 = 0;

// ============================================================================
// PROCESSING TIME
// ============================================================================

/// ProcessingTime - The single "now" of a run
///
/// Captured once at pipeline start. Both future-date exclusion and the age
/// filter read this value, so a run never re-samples the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ProcessingTime(NaiveDateTime);

impl ProcessingTime {
    /// Read the local wall clock
    pub fn capture() -> Self {
        ProcessingTime(Local::now().naive_local())
    }

    pub fn at(time: NaiveDateTime) -> Self {
        ProcessingTime(time)
    }

    /// Noon on the given day
    pub fn on(date: NaiveDate) -> Self {
        ProcessingTime(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()))
    }

    pub fn time(&self) -> NaiveDateTime {
        self.0
    }

    pub fn today(&self) -> NaiveDate {
        self.0.date()
    }

    /// A date is in the future if it starts after this instant
    pub fn is_future(&self, date: NaiveDate) -> bool {
        date > self.today()
    }

    /// Whole days elapsed since midnight of `date`
    pub fn age_days(&self, date: NaiveDate) -> i64 {
        (self.today() - date).num_days()
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// Config - Replaces the global argument state of a CLI run
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub parse: ParseOptions,
    pub filter: FilterConfig,
    pub render: RenderConfig,
    pub map: MapOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from(DEFAULT_DATA_FILE),
            output: PathBuf::from(DEFAULT_SAVE_FILE),
            parse: ParseOptions::default(),
            filter: FilterConfig::default(),
            render: RenderConfig::default(),
            map: MapOptions::default(),
        }
    }
}
