use clap::{Arg, ArgAction, Command};
use crc32fast::Hasher as Crc32;
use leads_report::logging::init_logging;
use leads_report::{clean_records, output_path, read_records, write_records, CleanConfig, Record};
use std::path::PathBuf;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("bench")
        .arg(Arg::new("path").long("path").required(true).value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("out-dir").long("out-dir").value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("verify").long("verify").help("Re-read the cleaned file and compare a CRC32 over its rows with the in-memory result").action(ArgAction::SetTrue))
        .arg(Arg::new("verbose").short('v').action(ArgAction::Count))
        .get_matches();
    init_logging(matches.get_count("verbose"));

    let path = matches
        .get_one::<PathBuf>("path")
        .ok_or_else(|| anyhow::anyhow!("Provide --path <file>"))?;
    let mut config = CleanConfig::default();
    config.sink.output_dir = matches.get_one::<PathBuf>("out-dir").cloned();

    let start = Instant::now();
    let table = read_records(path, &config.source).await?;
    let read_secs = start.elapsed().as_secs_f64();
    let rows_read = table.records.len();

    let cleaned = clean_records(table.records, &config);
    let clean_secs = start.elapsed().as_secs_f64() - read_secs;

    let target = output_path(path, &config.sink);
    write_records(&target, &table.schema, &cleaned.records, &config.sink).await?;
    let elapsed = start.elapsed().as_secs_f64();
    let rps = (rows_read as f64) / elapsed;

    println!(
        "source={} rows={} leads={} test={} dup_email={} dup_phone={}\nread={:.3}s clean={:.3}s total={:.3}s rows/sec={:.0}",
        path.display(),
        rows_read,
        cleaned.records.len(),
        cleaned.test_entries,
        cleaned.duplicate_emails,
        cleaned.duplicate_phones,
        read_secs,
        clean_secs,
        elapsed,
        rps
    );

    if matches.get_flag("verify") {
        let expected = checksum(&cleaned.records);
        let reread = read_records(&target, &config.source).await?;
        let actual = checksum(&reread.records);
        if reread.schema != table.schema || actual != expected {
            anyhow::bail!(
                "round trip mismatch for {}: crc 0x{expected:08x} in memory, 0x{actual:08x} on disk",
                target.display()
            );
        }
        println!("verify=ok crc=0x{actual:08x}");
    }
    Ok(())
}

/// CRC32 over every field, fields separated by '\x1f' and rows by '\x1e'.
fn checksum(records: &[Record]) -> u32 {
    let mut crc = Crc32::new();
    for record in records {
        for (fi, field) in record.values().enumerate() {
            if fi > 0 {
                crc.update(&[0x1f]);
            }
            crc.update(field.as_bytes());
        }
        crc.update(&[0x1e]);
    }
    crc.finalize()
}
