use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::Precision;

#[derive(Parser)]
#[command(name = "touchmap")]
#[command(about = "GitHub file-touch mining tool for author activity datasets and plots")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "GitHub repository as owner/name")]
    pub repo: Option<String>,

    #[arg(long, help = "GitHub API token (defaults to the GITHUB_TOKEN environment variable)")]
    pub token: Option<String>,

    #[arg(long, default_value = "https://api.github.com", help = "Base URL of the GitHub API")]
    pub api_url: String,

    #[arg(long, default_value_t = 100, help = "Commits per history page (1-100)")]
    pub page_size: u32,

    #[arg(long, default_value_t = 15, help = "Seconds to wait before retrying a rate-limited page")]
    pub backoff: u64,

    #[arg(long, default_value_t = 5, help = "Retry attempts per page after rate limiting")]
    pub max_retries: u32,

    #[arg(long, default_value_t = 60, help = "HTTP request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, default_value_t = 4, help = "Worker threads for mining (0 = one per core)")]
    pub jobs: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    Mine {
        #[arg(long, help = "CSV listing the source files to mine (Filename column)")]
        files: PathBuf,

        #[arg(long, help = "Write the touch dataset to this CSV path")]
        out: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Precision::Instant, help = "Timestamp precision for the dataset")]
        precision: Precision,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    Plot {
        #[arg(long, help = "Touch dataset CSV produced by mine")]
        input: PathBuf,

        #[arg(long, default_value_t = 12, help = "Number of authors in the ranked legend")]
        top_authors: usize,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Mine { files, out, precision, json, ndjson } => {
                crate::mine::exec(self.common, files, out, precision, json, ndjson)
            }
            Commands::Plot { input, top_authors, json, ndjson } => {
                crate::plot::exec(input, top_authors, json, ndjson)
            }
        }
    }
}
