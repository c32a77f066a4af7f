use crate::config::CleanConfig;
use crate::dedup::Deduplicator;
use crate::filter::filter_test_entries;
use crate::metric::LeadMetrics;
use crate::record::Record;
use crate::sink::{output_path, write_records};
use crate::source::read_records;
use crate::CleanResult;
use std::path::{Path, PathBuf};

/// Counters for one cleaning run (keep it simple/minimal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub rows_read: usize,
    pub repaired_rows: usize,
    pub test_entries: usize,
    pub duplicate_emails: usize,
    pub duplicate_phones: usize,
    pub leads: usize,
    pub output_path: PathBuf,
}

/// Summary plus the metrics printed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadReport {
    pub summary: CleanSummary,
    pub metrics: LeadMetrics,
}

/// Output of the in-memory stages, before anything touches disk.
#[derive(Debug)]
pub struct Cleaned {
    pub records: Vec<Record>,
    pub test_entries: usize,
    pub duplicate_emails: usize,
    pub duplicate_phones: usize,
}

/// Filter test entries, then dedupe what is left. Test rows never reach the
/// dedup index, so they cannot shadow a real lead sharing their email.
pub fn clean_records(records: Vec<Record>, config: &CleanConfig) -> Cleaned {
    let before = records.len();
    let filtered = filter_test_entries(records, &config.test_marker);
    let test_entries = before - filtered.len();
    tracing::info!(removed = test_entries, remaining = filtered.len(), "filtered test entries");

    let mut dedup = Deduplicator::new(config.empty_keys);
    let records = dedup.dedupe(filtered);
    let stats = dedup.stats();
    tracing::info!(
        duplicate_emails = stats.duplicate_email,
        duplicate_phones = stats.duplicate_phone,
        remaining = records.len(),
        "removed duplicate submissions"
    );

    Cleaned {
        records,
        test_entries,
        duplicate_emails: stats.duplicate_email,
        duplicate_phones: stats.duplicate_phone,
    }
}

/// Read, clean and write one export. Nothing is written if reading fails.
pub async fn clean_file(path: &Path, config: &CleanConfig) -> CleanResult<CleanSummary> {
    config.validate()?;
    let table = read_records(path, &config.source).await?;
    let rows_read = table.records.len();
    tracing::info!(path = %path.display(), rows = rows_read, columns = table.schema.len(), "read export");

    let cleaned = clean_records(table.records, config);
    let target = output_path(path, &config.sink);
    let written = write_records(&target, &table.schema, &cleaned.records, &config.sink).await?;

    Ok(CleanSummary {
        rows_read,
        repaired_rows: table.repaired_rows,
        test_entries: cleaned.test_entries,
        duplicate_emails: cleaned.duplicate_emails,
        duplicate_phones: cleaned.duplicate_phones,
        leads: cleaned.records.len(),
        output_path: written,
    })
}

/// Clean `path` and price the surviving leads against `spend`.
pub async fn run(path: &Path, spend: f64, config: &CleanConfig) -> CleanResult<LeadReport> {
    let summary = clean_file(path, config).await?;
    let metrics = LeadMetrics::compute(summary.leads, spend);
    Ok(LeadReport { summary, metrics })
}
