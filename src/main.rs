use anyhow::Result;
use clap::Parser;
use touchmap::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
