use crate::record::Record;

pub const DEFAULT_TEST_MARKER: &str = "test";

/// True when the lowercased `Name` or `Email` contains `marker`, compared
/// case-insensitively. An empty marker matches nothing.
pub fn is_test_entry(record: &Record, marker: &str) -> bool {
    contains_marker(record, &marker.to_lowercase())
}

fn contains_marker(record: &Record, lowered: &str) -> bool {
    if lowered.is_empty() {
        return false;
    }
    record.name().to_lowercase().contains(lowered) || record.email().to_lowercase().contains(lowered)
}

/// Drop internal test rows, keeping the survivors in input order.
pub fn filter_test_entries(records: Vec<Record>, marker: &str) -> Vec<Record> {
    let marker = marker.to_lowercase();
    records
        .into_iter()
        .filter(|record| !contains_marker(record, &marker))
        .collect()
}
