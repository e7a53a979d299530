use super::{mine_files, output_json, output_ndjson, output_summary, write_touches_csv};
use crate::cli::CommonArgs;
use crate::error::TouchmapError;
use crate::github::{ClientConfig, GithubClient};
use crate::model::Precision;
use anyhow::Context;
use std::path::PathBuf;
use std::time::Duration;

pub fn exec(
    common: CommonArgs,
    files: PathBuf,
    out: Option<PathBuf>,
    precision: Precision,
    json: bool,
    ndjson: bool,
) -> anyhow::Result<()> {
    // Credential resolution is fatal before any request goes out
    let token = common
        .token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .filter(|token| !token.is_empty())
        .ok_or(TouchmapError::MissingToken)?;
    let repo = common
        .repo
        .clone()
        .ok_or_else(|| TouchmapError::InvalidConfig("--repo is required for mine".to_string()))?;

    let config = ClientConfig::new(repo, token)
        .with_api_url(common.api_url.clone())
        .with_page_size(common.page_size)
        .with_backoff(Duration::from_secs(common.backoff))
        .with_max_retries(common.max_retries)
        .with_timeout(Duration::from_secs(common.timeout));
    let client = GithubClient::new(config).context("Failed to configure GitHub client")?;

    let file_list = crate::util::read_file_list(&files)
        .with_context(|| format!("Failed to read file list from {}", files.display()))?;

    let quiet = json || ndjson;
    if !quiet {
        println!("Loaded {} source files from {}", file_list.len(), files.display());
    }

    let (dataset, reports) = mine_files(&client, &file_list, precision, common.jobs, !quiet)
        .context("Failed to mine file histories")?;

    if let Some(out_path) = &out {
        write_touches_csv(out_path, &dataset, precision)
            .with_context(|| format!("Failed to write dataset to {}", out_path.display()))?;
    }

    if json {
        output_json(&dataset, &reports, &client.config().repo, precision)?;
    } else if ndjson {
        output_ndjson(&dataset)?;
    } else {
        output_summary(&dataset, &reports, out.as_deref())?;
    }

    Ok(())
}
