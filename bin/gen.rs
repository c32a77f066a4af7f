use clap::{Arg, Command};
use std::io::{self, Write};

/// Writes a synthetic lead export to stdout: every `test-every`th row is an
/// internal test entry and every `dup-every`th row resubmits an earlier lead.
fn main() -> anyhow::Result<()> {
    let matches = Command::new("gen")
        .arg(
            Arg::new("rows")
                .long("rows")
                .value_parser(clap::value_parser!(u64))
                .required(true),
        )
        .arg(
            Arg::new("test_every")
                .long("test-every")
                .value_parser(clap::value_parser!(u64))
                .default_value("50"),
        )
        .arg(
            Arg::new("dup_every")
                .long("dup-every")
                .value_parser(clap::value_parser!(u64))
                .default_value("20"),
        )
        .arg(
            Arg::new("bom")
                .long("bom")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let rows: u64 = *matches.get_one("rows").unwrap();
    let test_every: u64 = *matches.get_one("test_every").unwrap();
    let dup_every: u64 = *matches.get_one("dup_every").unwrap();

    let mut out = io::BufWriter::new(io::stdout().lock());

    if matches.get_flag("bom") {
        out.write_all(b"\xEF\xBB\xBF")?;
    }
    writeln!(&mut out, "Name,Email,Phone Number,Campaign,Submitted")?;

    for i in 0..rows {
        if test_every > 0 && i % test_every == test_every - 1 {
            writeln!(&mut out, "QA Test {i},qa{i}@example.com,555{i:07},internal,2024-01-01")?;
        } else if dup_every > 0 && i > 0 && i % dup_every == 0 {
            // resubmission of the previous lead: same phone, fresh email
            let prev = i - 1;
            writeln!(&mut out, "Lead {prev},again{i}@example.com,555{prev:07},spring,2024-01-02")?;
        } else {
            writeln!(&mut out, "Lead {i},lead{i}@example.com,555{i:07},spring,2024-01-01")?;
        }
        if i % 10_000 == 0 {
            out.flush()?;
        } // keep buffers moving on huge runs
    }

    out.flush()?;
    Ok(())
}
