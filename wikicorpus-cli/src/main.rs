//! Command-line entry point for wikicorpus

use anyhow::Result;
use clap::Parser;
use wikicorpus_cli::commands::{Commands, ListCommands};

/// Build sentence-per-line text corpora from MediaWiki XML dumps
#[derive(Debug, Parser)]
#[command(name = "wikicorpus", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::List { subcommand } => match subcommand {
            ListCommands::Languages(args) => args.execute(),
        },
        Commands::GenerateConfig(args) => args.execute(),
    }
}
