use crate::config::SinkOptions;
use crate::io::Compression;
use crate::record::{FieldSchema, Record};
use crate::{CleanError, CleanResult};
use csv_async::{AsyncWriterBuilder, QuoteStyle};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the cleaned copy of `input` goes: `<prefix><file name>` in the
/// configured output directory, or next to the input. A `.gz`/`.zst` suffix is
/// dropped since the output is never compressed.
pub fn output_path(input: &Path, options: &SinkOptions) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = Compression::from_name(name)
        .suffix()
        .and_then(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name);
    let file_name = format!("{}{}", options.prefix, name);

    match &options.output_dir {
        Some(dir) => dir.join(file_name),
        None => input
            .parent()
            .map(|dir| dir.join(&file_name))
            .unwrap_or_else(|| PathBuf::from(&file_name)),
    }
}

/// Write `records` under `schema` to `path`, every field quoted.
///
/// The rows go to a sibling `.partial` file that is renamed over `path` once
/// complete, so a failed write never leaves a truncated output behind.
pub async fn write_records(
    path: &Path,
    schema: &FieldSchema,
    records: &[Record],
    options: &SinkOptions,
) -> CleanResult<PathBuf> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let result = match write_all(&partial, schema, records, options).await {
        Ok(()) => fs::rename(&partial, path).await.map_err(CleanError::from),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), rows = records.len(), "wrote cleaned export");
            Ok(path.to_path_buf())
        }
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&partial).await {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %partial.display(), error = %cleanup, "could not remove partial output");
                }
            }
            Err(match err {
                CleanError::Io(source) => CleanError::Output {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })
        }
    }
}

async fn write_all(
    path: &Path,
    schema: &FieldSchema,
    records: &[Record],
    options: &SinkOptions,
) -> CleanResult<()> {
    let mut file = File::create(path).await?;
    if options.write_bom {
        file.write_all(UTF8_BOM).await?;
    }

    let mut wtr = AsyncWriterBuilder::new()
        .delimiter(options.delimiter)
        .quote_style(QuoteStyle::Always)
        .create_writer(file);

    wtr.write_record(schema.fields()).await?;
    for record in records {
        wtr.write_record(record.values()).await?;
    }
    wtr.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_sits_next_to_input_by_default() {
        let path = output_path(Path::new("exports/march/leads.csv"), &SinkOptions::default());
        assert_eq!(path, PathBuf::from("exports/march/cleaned_deduped_leads.csv"));
    }

    #[test]
    fn bare_file_name_lands_in_working_directory() {
        let path = output_path(Path::new("leads.csv"), &SinkOptions::default());
        assert_eq!(path, PathBuf::from("cleaned_deduped_leads.csv"));
    }

    #[test]
    fn output_dir_and_compression_suffix() {
        let options = SinkOptions {
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };
        let path = output_path(Path::new("in/leads.csv.gz"), &options);
        assert_eq!(path, PathBuf::from("/tmp/out/cleaned_deduped_leads.csv"));
    }
}
