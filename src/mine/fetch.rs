use super::dedupe::Deduper;
use super::extract::extract;
use crate::error::{Result, TouchmapError};
use crate::github::GithubClient;
use crate::model::{Dataset, FileReport, Precision, TouchRecord};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct FileResult {
    pub records: Vec<TouchRecord>,
    pub report: FileReport,
}

/// Mine one file's full history: paginate until an empty page, extracting
/// and deduplicating as pages arrive. Any page failure abandons the rest of
/// the file but keeps what was already extracted.
pub fn mine_file(
    client: &GithubClient,
    file: &str,
    precision: Precision,
    abort: &AtomicBool,
) -> FileResult {
    let mut records = Vec::new();
    let mut report = FileReport::new(file.to_string());
    let mut deduper = Deduper::new();
    let mut page = 1u32;

    loop {
        if abort.load(Ordering::Relaxed) {
            report.error = Some("aborted after rate limit retries were exhausted".to_string());
            break;
        }

        match client.commits_page(file, page) {
            Ok(commits) => {
                report.pages += 1;
                if commits.is_empty() {
                    break;
                }
                for raw in &commits {
                    match extract(file, raw, precision) {
                        Some(record) => {
                            if deduper.insert(&record) {
                                records.push(record);
                            } else {
                                report.duplicates += 1;
                            }
                        }
                        None => report.skipped += 1,
                    }
                }
                page += 1;
            }
            Err(err) => {
                if matches!(err, TouchmapError::RetriesExhausted { .. }) {
                    abort.store(true, Ordering::Relaxed);
                }
                report.error = Some(err.to_string());
                break;
            }
        }
    }

    report.touches = records.len();
    FileResult { records, report }
}

/// Mine every file across a bounded worker pool and merge the results in
/// file order, then emission order within a file. One exhausted rate limit
/// aborts the whole run gracefully: in-flight files stop after their current
/// page and everything aggregated so far is preserved.
pub fn mine_files(
    client: &GithubClient,
    files: &[String],
    precision: Precision,
    jobs: usize,
    show_progress: bool,
) -> Result<(Dataset, Vec<FileReport>)> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| TouchmapError::Other(e.to_string()))?;

    let bar = if show_progress {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("Mining file histories...");
        bar
    } else {
        ProgressBar::hidden()
    };

    let abort = AtomicBool::new(false);
    let results: Vec<FileResult> = pool.install(|| {
        files
            .par_iter()
            .progress_with(bar.clone())
            .map(|file| mine_file(client, file, precision, &abort))
            .collect()
    });
    bar.finish_and_clear();

    let mut dataset = Dataset::new();
    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        dataset.extend(result.records);
        reports.push(result.report);
    }

    Ok((dataset, reports))
}
