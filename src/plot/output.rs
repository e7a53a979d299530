use crate::model::PlotOutput;
use anyhow::Result;
use console::style;

pub fn output_json(plot: &PlotOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(plot)?);
    Ok(())
}

pub fn output_ndjson(plot: &PlotOutput) -> Result<()> {
    for point in &plot.points {
        println!("{}", serde_json::to_string(point)?);
    }
    Ok(())
}

pub fn output_table(plot: &PlotOutput) -> Result<()> {
    println!("{}", style("File-touch scatter data").bold());
    println!("{}", "─".repeat(50));
    println!("Rows: {}", style(plot.points.len()).cyan());
    println!("Files: {}", style(plot.files.len()).cyan());
    println!("Authors: {}", style(plot.authors.len()).cyan());
    println!("Weeks: {}", style(plot.weeks).cyan());
    println!("Start: {}", style(plot.start.format("%Y-%m-%d")).dim());

    println!("\n{}", style("Top authors (touch count)").bold());
    println!("{}", "─".repeat(50));
    for entry in &plot.top_authors {
        println!("{:<40} {:>8}", entry.author, entry.touches);
    }

    println!("\nUse --json or --ndjson flags to export the plot data.");
    Ok(())
}
