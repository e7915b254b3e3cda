// 🔁 Batch Pipeline
// parse → filter → render → save, in that order, once per run

use crate::config::{Config, ProcessingTime};
use crate::entry::Diagnostic;
use crate::error::ReportError;
use crate::filter;
use crate::map::Map;
use crate::parser::load_csv_with;
use crate::render::style;
use std::fmt;
use std::path::PathBuf;

/// RunSummary - What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Entries drawn on the map
    pub rendered: usize,
    /// Entries that survived parsing (future-dated rows not counted)
    pub total_valid: usize,
    /// Rows dropped for future dates
    pub excluded: usize,
    pub output: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Map created with {}/{} reports. Filename='{}'",
            self.rendered,
            self.total_valid,
            self.output.display()
        )
    }
}

/// Run the whole pipeline, handing each parse diagnostic to `on_diagnostic`
/// as its row is read.
///
/// Structural errors stop the run before the output file is touched.
pub fn run<F>(
    config: &Config,
    now: ProcessingTime,
    on_diagnostic: F,
) -> Result<RunSummary, ReportError>
where
    F: FnMut(&Diagnostic),
{
    let outcome = load_csv_with(&config.input, now, config.parse, on_diagnostic)?;

    let kept = filter::apply(&outcome.entries, &config.filter, now);

    let mut map = Map::new(config.map);
    for entry in kept {
        map.add(entry, &style(entry, &config.render));
    }
    map.save(&config.output)?;

    Ok(RunSummary {
        rendered: map.rendered(),
        total_valid: outcome.total_valid(),
        excluded: outcome.excluded(),
        output: config.output.clone(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
