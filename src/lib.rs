//! Lead-export cleaning: drop test rows and duplicate submissions, then price
//! the surviving leads.
//!
//! - Source: CSV (optionally gzip/zstd), BOM stripped, header required.
//! - Filter: rows whose `Name` or `Email` contains "test" (any case) go.
//! - Dedup: first record per `Email` and per `Phone Number` wins.
//! - Sink: `cleaned_deduped_<name>`, every field quoted, BOM-prefixed UTF-8.
//! - Metric: spend / leads, `0.0` when no lead survives.
//!
//! Data shape:
//! - `FieldSchema` (header) shared by every `Record` of a run
//! - `Record::get_or_default(field) -> &str`
//
mod codec;
pub mod config;
pub mod dedup;
pub mod filter;
mod io;
pub mod logging;
pub mod metric;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod source;

pub use crate::config::{CleanConfig, RowWidthPolicy, SinkOptions, SourceOptions};
pub use crate::dedup::{dedupe, DedupOutcome, DedupStats, Deduplicator, EmptyKeyPolicy};
pub use crate::filter::{filter_test_entries, is_test_entry};
pub use crate::io::{build_source_reader, reader_from_path, Compression, SourceMeta};
pub use crate::metric::{cost_per_lead, LeadMetrics};
pub use crate::pipeline::{clean_file, clean_records, run, CleanSummary, LeadReport};
pub use crate::record::{FieldSchema, Record};
pub use crate::sink::{output_path, write_records};
pub use crate::source::{read_from, read_records, LeadTable};

use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by this crate.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("cannot read input file '{}': {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write output file '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed export: {0}")]
    Format(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv_async::Error),
}

pub type CleanResult<T> = std::result::Result<T, CleanError>;
