use crate::config::{RowWidthPolicy, SourceOptions};
use crate::io::reader_from_path;
use crate::record::{FieldSchema, Record};
use crate::{CleanError, CleanResult};
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::StreamExt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// Everything read from one export.
#[derive(Debug)]
pub struct LeadTable {
    pub schema: Arc<FieldSchema>,
    pub records: Vec<Record>,
    /// Rows padded or truncated to the header width
    pub repaired_rows: usize,
}

/// Read a whole export from disk. I/O failures while reading are reported as
/// `NotFound` naming the path, same as a failed open.
pub async fn read_records(path: &Path, options: &SourceOptions) -> CleanResult<LeadTable> {
    let (reader, meta) = reader_from_path(path, options.charset).await?;
    tracing::debug!(source = %meta.name_hint, compression = ?meta.compression, "reading export");
    read_from(reader, options).await.map_err(|err| match err {
        CleanError::Io(source) => CleanError::NotFound {
            path: path.to_path_buf(),
            source,
        },
        CleanError::Csv(err) if matches!(err.kind(), csv_async::ErrorKind::Io(_)) => {
            CleanError::NotFound {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, err),
            }
        }
        other => other,
    })
}

/// Parse an already-decoded UTF-8 stream. The header row is mandatory.
pub async fn read_from<R>(reader: R, options: &SourceOptions) -> CleanResult<LeadTable>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut rdr = AsyncReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        // Width is checked per row below, according to the policy
        .flexible(true)
        .buffer_capacity(1 << 16)
        .create_reader(reader);

    let headers = rdr.headers().await?.clone();
    if headers.is_empty() {
        return Err(CleanError::Format("missing header row".into()));
    }
    let schema = Arc::new(FieldSchema::new(headers.iter()));
    let missing = schema.missing_lead_fields();
    if !missing.is_empty() {
        tracing::warn!(?missing, "export lacks lead columns, treating them as empty");
    }

    let width = schema.len();
    let mut records = Vec::new();
    let mut repaired_rows = 0usize;
    let rows = rdr.records().enumerate();
    futures::pin_mut!(rows);

    while let Some((idx, row)) = rows.next().await {
        let mut row = row?;
        if row.len() != width {
            let row_number = idx + 1;
            match options.row_width {
                RowWidthPolicy::Strict => {
                    return Err(CleanError::Format(format!(
                        "row {} width mismatch: got {}, expected {}",
                        row_number,
                        row.len(),
                        width
                    )));
                }
                RowWidthPolicy::Lenient => {
                    tracing::warn!(
                        row = row_number,
                        got = row.len(),
                        expected = width,
                        "repairing row width"
                    );
                    fit_width(&mut row, width);
                    repaired_rows += 1;
                }
            }
        }
        records.push(Record::new(schema.clone(), row));
    }

    Ok(LeadTable {
        schema,
        records,
        repaired_rows,
    })
}

fn fit_width(row: &mut StringRecord, width: usize) {
    row.truncate(width);
    while row.len() < width {
        row.push_field("");
    }
}
