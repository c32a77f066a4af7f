use crate::dedup::EmptyKeyPolicy;
use crate::filter::DEFAULT_TEST_MARKER;
use crate::{CleanError, CleanResult};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_PREFIX: &str = "cleaned_deduped_";

/// What to do with a data row whose field count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowWidthPolicy {
    /// Pad short rows with empty values, cut long rows to the header width.
    #[default]
    Lenient,
    /// Fail the run with a format error.
    Strict,
}

#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub delimiter: u8,
    /// Charset assumed when the export has no BOM
    pub charset: &'static encoding_rs::Encoding,
    pub row_width: RowWidthPolicy,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            charset: encoding_rs::UTF_8,
            row_width: RowWidthPolicy::Lenient,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SinkOptions {
    pub delimiter: u8,
    /// Prepended to the input file name
    pub prefix: String,
    /// Defaults to the input file's directory
    pub output_dir: Option<PathBuf>,
    pub write_bom: bool,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            output_dir: None,
            write_bom: true,
        }
    }
}

/// Everything one cleaning run can be tuned with.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub source: SourceOptions,
    pub sink: SinkOptions,
    pub test_marker: String,
    pub empty_keys: EmptyKeyPolicy,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            source: SourceOptions::default(),
            sink: SinkOptions::default(),
            test_marker: DEFAULT_TEST_MARKER.to_string(),
            empty_keys: EmptyKeyPolicy::Collide,
        }
    }
}

impl CleanConfig {
    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> CleanResult<()> {
        if self.test_marker.trim().is_empty() {
            return Err(CleanError::Config("test marker must not be empty".into()));
        }
        if self.source.delimiter == b'"' || self.sink.delimiter == b'"' {
            return Err(CleanError::Config("delimiter cannot be a double quote".into()));
        }
        Ok(())
    }

    /// Use the same delimiter for reading and writing.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.source.delimiter = delimiter;
        self.sink.delimiter = delimiter;
        self
    }
}
