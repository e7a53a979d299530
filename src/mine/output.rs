use crate::model::{Dataset, FileReport, MineOutput, Precision, SCHEMA_VERSION};
use crate::util::csv_field;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use console::style;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Persist the dataset: `file, author, timestamp` (or `date` in day
/// precision), one row per deduplicated touch, column order fixed.
pub fn write_touches_csv(
    path: &Path,
    dataset: &Dataset,
    precision: Precision,
) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "file,author,{}", precision.column())?;
    for record in &dataset.records {
        writeln!(
            writer,
            "{},{},{}",
            csv_field(&record.file),
            csv_field(record.author.as_str()),
            format_timestamp(record.timestamp, precision)
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn format_timestamp(timestamp: DateTime<Utc>, precision: Precision) -> String {
    match precision {
        Precision::Instant => timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        Precision::Day => timestamp.format("%Y-%m-%d").to_string(),
    }
}

pub fn output_json(
    dataset: &Dataset,
    reports: &[FileReport],
    repository: &str,
    precision: Precision,
) -> Result<()> {
    let output = MineOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository: repository.to_string(),
        precision,
        files_processed: reports.len(),
        files_failed: reports.iter().filter(|r| r.error.is_some()).count(),
        touches: dataset.len(),
        duplicates: reports.iter().map(|r| r.duplicates).sum(),
        skipped: reports.iter().map(|r| r.skipped).sum(),
        reports: reports.to_vec(),
        records: dataset.records.clone(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(dataset: &Dataset) -> Result<()> {
    for record in &dataset.records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

pub fn output_summary(
    dataset: &Dataset,
    reports: &[FileReport],
    out: Option<&Path>,
) -> Result<()> {
    println!("{}", style("Mining Summary").bold());
    println!("{}", "─".repeat(50));

    let failed: Vec<&FileReport> = reports.iter().filter(|r| r.error.is_some()).collect();
    let duplicates: usize = reports.iter().map(|r| r.duplicates).sum();
    let skipped: usize = reports.iter().map(|r| r.skipped).sum();

    println!("Files processed: {}", style(reports.len()).cyan());
    println!("Touches recorded: {}", style(dataset.len()).green());
    println!("Duplicates suppressed: {}", style(duplicates).yellow());
    println!("Commits skipped (no timestamp): {}", style(skipped).yellow());
    if failed.is_empty() {
        println!("Files failed: {}", style(0).green());
    } else {
        println!("Files failed: {}", style(failed.len()).red());
    }

    if let (Some(earliest), Some(latest)) = (dataset.earliest(), dataset.latest()) {
        println!(
            "Date range: {} to {}",
            style(earliest.format("%Y-%m-%d")).dim(),
            style(latest.format("%Y-%m-%d")).dim()
        );
    }

    if !failed.is_empty() {
        println!("\n{}", style("Failed files").bold());
        println!("{}", "─".repeat(50));
        for report in failed.iter().take(10) {
            println!("{:<40} {}", report.file, report.error.as_deref().unwrap_or(""));
        }
        if failed.len() > 10 {
            println!("... and {} more", failed.len() - 10);
        }
    }

    match out {
        Some(path) => println!("\nWrote: {}", style(path.display()).cyan()),
        None => println!("\nNo --out path given; the dataset was not persisted."),
    }
    println!("Use --json or --ndjson flags to export the raw data.");
    Ok(())
}
