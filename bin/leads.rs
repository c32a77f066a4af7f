use clap::{Arg, ArgAction, Command};
use leads_report::logging::init_logging;
use leads_report::{run, CleanConfig, EmptyKeyPolicy, RowWidthPolicy};
use std::path::PathBuf;
use std::process::ExitCode;

fn command() -> Command {
    Command::new("leads")
        .about("Remove test rows and duplicate submissions from a lead export and report cost per lead")
        .arg(Arg::new("file").required(true).value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("spend").required(true).allow_negative_numbers(true).value_parser(clap::value_parser!(f64)))
        .arg(Arg::new("out-dir").long("out-dir").help("Directory for the cleaned file (default: next to the input)").value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("delimiter").long("delimiter").default_value(","))
        .arg(Arg::new("charset").long("charset").help("Charset label used when the file has no BOM").default_value("utf-8"))
        .arg(Arg::new("marker").long("marker").help("Substring marking a test entry in Name or Email").default_value("test"))
        .arg(Arg::new("strict").long("strict").help("Fail on rows whose width differs from the header").action(ArgAction::SetTrue))
        .arg(Arg::new("distinct-empty-keys").long("distinct-empty-keys").help("Never treat empty emails or phones as duplicates").action(ArgAction::SetTrue))
        .arg(Arg::new("no-bom").long("no-bom").help("Write the cleaned file without a UTF-8 BOM").action(ArgAction::SetTrue))
        .arg(Arg::new("verbose").short('v').long("verbose").action(ArgAction::Count))
}

fn config_from(matches: &clap::ArgMatches) -> anyhow::Result<CleanConfig> {
    let delimiter = match matches.get_one::<String>("delimiter").map(String::as_bytes) {
        Some([b]) => *b,
        _ => anyhow::bail!("--delimiter must be a single byte"),
    };
    let label = matches.get_one::<String>("charset").map(String::as_str).unwrap_or("utf-8");
    let charset = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| anyhow::anyhow!("unknown charset '{label}'"))?;

    let mut config = CleanConfig::default().with_delimiter(delimiter);
    config.source.charset = charset;
    if matches.get_flag("strict") {
        config.source.row_width = RowWidthPolicy::Strict;
    }
    if matches.get_flag("distinct-empty-keys") {
        config.empty_keys = EmptyKeyPolicy::Distinct;
    }
    if let Some(marker) = matches.get_one::<String>("marker") {
        if marker.trim().is_empty() {
            anyhow::bail!("--marker must not be empty");
        }
        config.test_marker = marker.clone();
    }
    config.sink.output_dir = matches.get_one::<PathBuf>("out-dir").cloned();
    config.sink.write_bom = !matches.get_flag("no-bom");
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let matches = command().get_matches();
    init_logging(matches.get_count("verbose"));

    match try_main(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn try_main(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let config = config_from(matches)?;
    let path = matches
        .get_one::<PathBuf>("file")
        .ok_or_else(|| anyhow::anyhow!("missing input file"))?;
    let spend = matches
        .get_one::<f64>("spend")
        .copied()
        .ok_or_else(|| anyhow::anyhow!("missing spend"))?;

    let report = run(path, spend, &config).await?;
    let summary = &report.summary;
    tracing::info!(
        output = %summary.output_path.display(),
        rows = summary.rows_read,
        test_entries = summary.test_entries,
        duplicates = summary.duplicate_emails + summary.duplicate_phones,
        "cleaning finished"
    );

    println!("Total leads after cleaning: {}", summary.leads);
    println!("{}", report.metrics);
    Ok(())
}
