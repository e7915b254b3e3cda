// Theft Mapper - Core Library
// Parses report CSVs, filters them and lays them out on an interactive map

pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod map;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use config::{Config, ProcessingTime};
pub use entry::{Diagnostic, Entry, EntryType};
pub use error::ReportError;
pub use filter::FilterConfig;
pub use map::{Location, Map, MapElement, MapOptions, TILE_LAYERS};
pub use parser::{
    load_csv, load_csv_with, parse_reader, parse_reader_with, parse_row, ParseOptions, ParseOutcome,
    RowOutcome,
};
pub use pipeline::RunSummary;
pub use render::{Classification, Color, RenderConfig, Shape, Style, CLASSIFICATIONS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
