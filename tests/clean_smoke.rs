use leads_report::{
    clean_file, read_records, run, CleanConfig, CleanError, EmptyKeyPolicy, RowWidthPolicy,
};
use std::path::{Path, PathBuf};

const HEADER: &str = "Name,Email,Phone Number,Campaign";

fn write_export(dir: &Path, name: &str, body: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, body)?;
    Ok(path)
}

fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.lines().map(str::to_string).collect())
}

#[tokio::test]
async fn drops_test_row_then_duplicate_email() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "leads.csv",
        "Name,Email,Phone Number\n\
         John Test,j@x.com,1\n\
         Jane,jane@x.com,2\n\
         Jane2,jane@x.com,3\n",
    )?;

    let report = run(&csv_path, 100.0, &CleanConfig::default()).await?;

    assert_eq!(report.summary.rows_read, 3);
    assert_eq!(report.summary.test_entries, 1);
    assert_eq!(report.summary.duplicate_emails, 1);
    assert_eq!(report.summary.leads, 1);
    assert_eq!(report.metrics.cost_per_lead, 100.0);
    assert_eq!(
        report.summary.output_path,
        dir.path().join("cleaned_deduped_leads.csv")
    );

    let lines = read_lines(&report.summary.output_path)?;
    assert_eq!(
        lines,
        vec![
            "\u{feff}\"Name\",\"Email\",\"Phone Number\"".to_string(),
            "\"Jane\",\"jane@x.com\",\"2\"".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn all_test_rows_price_at_zero() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "qa.csv",
        &format!("{HEADER}\nTest One,a@x.com,1,x\nBob,bob@test.io,2,x\n"),
    )?;

    let report = run(&csv_path, 250.0, &CleanConfig::default()).await?;

    assert_eq!(report.summary.leads, 0);
    assert_eq!(report.metrics.cost_per_lead, 0.0);
    assert_eq!(report.metrics.total_spend, 250.0);
    // header only
    assert_eq!(read_lines(&report.summary.output_path)?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn same_phone_different_email_is_dropped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "leads.csv",
        &format!("{HEADER}\nAnn,ann@x.com,555-0101,a\nAnn B,annb@x.com,555-0101,b\n"),
    )?;

    let summary = clean_file(&csv_path, &CleanConfig::default()).await?;

    assert_eq!(summary.leads, 1);
    assert_eq!(summary.duplicate_phones, 1);
    Ok(())
}

#[tokio::test]
async fn empty_phone_policy_is_configurable() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "leads.csv",
        &format!("{HEADER}\nA,a@x.com,,x\nB,b@x.com,,x\nC,c@x.com,,x\n"),
    )?;

    let collide = clean_file(&csv_path, &CleanConfig::default()).await?;
    assert_eq!(collide.leads, 1);
    assert_eq!(collide.duplicate_phones, 2);

    let config = CleanConfig {
        empty_keys: EmptyKeyPolicy::Distinct,
        ..Default::default()
    };
    let distinct = clean_file(&csv_path, &config).await?;
    assert_eq!(distinct.leads, 3);
    Ok(())
}

#[tokio::test]
async fn strips_bom_from_header() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "bom.csv",
        "\u{feff}Name,Email,Phone Number\nTest User,u@x.com,1\nReal,r@x.com,2\n",
    )?;

    let table = read_records(&csv_path, &Default::default()).await?;
    assert_eq!(table.schema.fields()[0], "Name");

    let summary = clean_file(&csv_path, &CleanConfig::default()).await?;
    assert_eq!(summary.test_entries, 1);
    assert_eq!(summary.leads, 1);
    Ok(())
}

#[tokio::test]
async fn payload_columns_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "leads.csv",
        "Submitted,Name,Notes,Email,Phone Number\n\
         2024-01-01,Ann,\"said \"\"hi\"\", twice\",ann@x.com,1\n\
         2024-01-02,Bo,,bo@x.com,2\n\
         2024-01-03,Ann again,,ann@x.com,3\n",
    )?;

    let config = CleanConfig::default();
    let original = read_records(&csv_path, &config.source).await?;
    let summary = clean_file(&csv_path, &config).await?;
    let reread = read_records(&summary.output_path, &config.source).await?;

    assert_eq!(reread.schema, original.schema);
    assert_eq!(reread.records, original.records[..2].to_vec());
    assert_eq!(reread.records[0].get_or_default("Notes"), "said \"hi\", twice");
    Ok(())
}

#[tokio::test]
async fn reads_gzip_export() -> anyhow::Result<()> {
    use async_compression::tokio::write::GzipEncoder;
    use tokio::io::AsyncWriteExt;

    let dir = tempfile::tempdir()?;
    let mut enc = GzipEncoder::new(Vec::new());
    enc.write_all(format!("{HEADER}\nAnn,ann@x.com,1,x\nAnn,ann@x.com,1,x\n").as_bytes())
        .await?;
    enc.shutdown().await?;
    let gz_path = dir.path().join("leads.csv.gz");
    std::fs::write(&gz_path, enc.into_inner())?;

    let summary = clean_file(&gz_path, &CleanConfig::default()).await?;

    assert_eq!(summary.leads, 1);
    assert_eq!(summary.output_path, dir.path().join("cleaned_deduped_leads.csv"));
    Ok(())
}

#[tokio::test]
async fn reads_zstd_export() -> anyhow::Result<()> {
    use async_compression::tokio::write::ZstdEncoder;
    use tokio::io::AsyncWriteExt;

    let dir = tempfile::tempdir()?;
    let mut enc = ZstdEncoder::new(Vec::new());
    enc.write_all(format!("{HEADER}\nAnn,ann@x.com,1,x\nBo,bo@x.com,1,y\nCy,cy@x.com,3,z\n").as_bytes())
        .await?;
    enc.shutdown().await?;
    let zst_path = dir.path().join("leads.csv.zst");
    std::fs::write(&zst_path, enc.into_inner())?;

    let summary = clean_file(&zst_path, &CleanConfig::default()).await?;

    assert_eq!(summary.leads, 2);
    assert_eq!(summary.duplicate_phones, 1);
    assert_eq!(summary.output_path, dir.path().join("cleaned_deduped_leads.csv"));
    Ok(())
}

#[tokio::test]
async fn truncated_trailing_byte_reads_as_replacement() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("leads.csv");
    std::fs::write(&csv_path, b"Name,Email\nJos\xC3")?;

    let table = read_records(&csv_path, &Default::default()).await?;

    assert_eq!(table.records[0].name(), "Jos\u{FFFD}");
    Ok(())
}

#[tokio::test]
async fn directory_input_is_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("exports.csv");
    std::fs::create_dir(&input)?;

    let err = clean_file(&input, &CleanConfig::default())
        .await
        .expect_err("a directory is not a readable export");

    assert!(matches!(err, CleanError::NotFound { ref path, .. } if path == &input));
    assert!(err.to_string().contains("exports.csv"));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_rename_leaves_no_partial_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(dir.path(), "leads.csv", &format!("{HEADER}\nAnn,ann@x.com,1,x\n"))?;
    let blocked = dir.path().join("cleaned_deduped_leads.csv");
    std::fs::create_dir(&blocked)?;
    std::fs::write(blocked.join("keep.txt"), "occupied")?;

    let err = clean_file(&csv_path, &CleanConfig::default())
        .await
        .expect_err("output path is occupied by a directory");

    assert!(matches!(err, CleanError::Output { ref path, .. } if path == &blocked));
    assert!(err.to_string().contains("cleaned_deduped_leads.csv"));
    let mut names: Vec<String> = std::fs::read_dir(dir.path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(names, vec!["cleaned_deduped_leads.csv", "leads.csv"]);
    assert_eq!(std::fs::read_dir(&blocked)?.count(), 1);
    Ok(())
}

#[tokio::test]
async fn blank_marker_is_a_config_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(dir.path(), "leads.csv", &format!("{HEADER}\nAnn,ann@x.com,1,x\n"))?;
    let config = CleanConfig {
        test_marker: String::new(),
        ..Default::default()
    };

    let err = clean_file(&csv_path, &config)
        .await
        .expect_err("empty marker would drop every row");

    assert!(matches!(err, CleanError::Config(_)));
    assert!(!dir.path().join("cleaned_deduped_leads.csv").exists());
    Ok(())
}

#[tokio::test]
async fn missing_file_is_not_found_and_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope.csv");

    let err = run(&missing, 10.0, &CleanConfig::default())
        .await
        .expect_err("missing input must fail");

    assert!(matches!(err, CleanError::NotFound { ref path, .. } if path == &missing));
    assert!(err.to_string().contains("nope.csv"));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn empty_file_has_no_header() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(dir.path(), "empty.csv", "")?;

    let err = clean_file(&csv_path, &CleanConfig::default())
        .await
        .expect_err("empty input must fail");

    assert!(matches!(err, CleanError::Format(_)));
    assert!(!dir.path().join("cleaned_deduped_empty.csv").exists());
    Ok(())
}

#[tokio::test]
async fn row_width_policy() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "ragged.csv",
        &format!("{HEADER}\nAnn,ann@x.com\nBo,bo@x.com,2,x,extra\n"),
    )?;

    let lenient = read_records(&csv_path, &Default::default()).await?;
    assert_eq!(lenient.repaired_rows, 2);
    assert_eq!(lenient.records[0].phone(), "");
    assert_eq!(lenient.records[1].values().count(), 4);

    let mut config = CleanConfig::default();
    config.source.row_width = RowWidthPolicy::Strict;
    let err = clean_file(&csv_path, &config)
        .await
        .expect_err("strict mode rejects ragged rows");
    assert!(matches!(err, CleanError::Format(ref msg) if msg.contains("row 1")));
    assert!(!dir.path().join("cleaned_deduped_ragged.csv").exists());
    Ok(())
}

#[tokio::test]
async fn overwrites_previous_output_and_honours_out_dir() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let csv_path = write_export(dir.path(), "leads.csv", &format!("{HEADER}\nAnn,ann@x.com,1,x\n"))?;
    let stale = out.path().join("cleaned_deduped_leads.csv");
    std::fs::write(&stale, "stale")?;

    let mut config = CleanConfig::default();
    config.sink.output_dir = Some(out.path().to_path_buf());
    config.sink.write_bom = false;
    let summary = clean_file(&csv_path, &config).await?;

    assert_eq!(summary.output_path, stale);
    let lines = read_lines(&stale)?;
    assert_eq!(lines[0], "\"Name\",\"Email\",\"Phone Number\",\"Campaign\"");
    assert_eq!(lines[1], "\"Ann\",\"ann@x.com\",\"1\",\"x\"");
    // no temporary file left next to it
    assert_eq!(std::fs::read_dir(out.path())?.count(), 1);
    Ok(())
}

#[tokio::test]
async fn semicolon_delimited_export() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_export(
        dir.path(),
        "eu.csv",
        "Name;Email;Phone Number\nAnn;ann@x.com;1\nBo;ann@x.com;2\n",
    )?;

    let config = CleanConfig::default().with_delimiter(b';');
    let summary = clean_file(&csv_path, &config).await?;

    assert_eq!(summary.leads, 1);
    assert_eq!(
        read_lines(&summary.output_path)?[1],
        "\"Ann\";\"ann@x.com\";\"1\""
    );
    Ok(())
}
