use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::error::TouchmapError;
use crate::model::{PlotOutput, SCHEMA_VERSION};
use crate::plot::bucket::start_of;
use crate::plot::index::{top_authors, PlotIndex};
use crate::plot::input::read_touches;
use crate::plot::output;

pub fn exec(input: PathBuf, top: usize, json: bool, ndjson: bool) -> Result<()> {
    let rows = read_touches(&input)
        .with_context(|| format!("Failed to read touch dataset from {}", input.display()))?;

    let start = start_of(&rows)
        .ok_or_else(|| TouchmapError::EmptyDataset(input.display().to_string()))?;

    let index = PlotIndex::build(&rows);
    let points = index.points(&rows, start);
    let weeks = points.iter().map(|p| p.week_index).max().unwrap_or(0) + 1;

    let plot = PlotOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        source: input.display().to_string(),
        start,
        weeks,
        files: index.files().to_vec(),
        authors: index.authors().to_vec(),
        top_authors: top_authors(&rows, top),
        points,
    };

    if json {
        output::output_json(&plot)?;
    } else if ndjson {
        output::output_ndjson(&plot)?;
    } else {
        output::output_table(&plot)?;
    }

    Ok(())
}
