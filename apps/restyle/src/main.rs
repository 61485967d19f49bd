use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;
use std::io::{BufWriter, Write};

mod commands;
mod reformat;

use commands::{FilesArgs, FormatArgs, StyleArgs};

#[derive(Parser)]
#[command(name = "restyle")]
#[command(about = "Reformat Python sources using the nearest style file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the source files the given paths expand to
    Files(FilesArgs),
    /// Show which style applies to each source file
    Style(StyleArgs),
    /// Reformat source files, in place or to stdout
    Format(FormatArgs),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let failures = match cli.command {
        Commands::Files(args) => commands::run_files(&args, &mut stdout)?,
        Commands::Style(args) => commands::run_style(&args, &mut stdout)?,
        Commands::Format(args) => commands::run_format(&args, &mut stdout)?,
    };
    stdout.flush()?;

    if failures > 0 {
        // Non-zero exit so scripts notice files that were skipped
        std::process::exit(1);
    }
    Ok(())
}
