use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use log::{debug, info, warn};
use rayon::prelude::*;
use restyle_core::{
    DEFAULT_ENCODING, Destination, ResourceConfig, StyleCache, StyleLocation, collect_files_with,
    read_source, write_reformatted_code,
};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use crate::reformat::reformat;

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Files and directories to process
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Gitignore-style pattern to leave out (repeatable)
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

impl InputArgs {
    fn collect(&self) -> Result<Vec<PathBuf>> {
        let mut files = collect_files_with(
            &self.paths,
            self.recursive,
            &self.exclude,
            &ResourceConfig::default(),
        )
        .context("Failed to collect source files")?;
        files.sort();
        info!("Collected {} source files", files.len());
        Ok(files)
    }
}

#[derive(Debug, Clone, Args)]
pub struct FilesArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct StyleArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct FormatArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Rewrite files instead of printing the result
    #[arg(short, long)]
    pub in_place: bool,

    /// Encoding used to read and write sources
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,
}

/// Each `run_*` returns the number of files that failed.
pub fn run_files<W: Write>(args: &FilesArgs, out: &mut W) -> Result<usize> {
    for file in args.input.collect()? {
        writeln!(out, "{}", file.display())?;
    }
    Ok(0)
}

pub fn run_style<W: Write>(args: &StyleArgs, out: &mut W) -> Result<usize> {
    let files = args.input.collect()?;
    let cache = StyleCache::new(ResourceConfig::default());

    let resolved: Vec<(PathBuf, Result<StyleLocation>)> = files
        .into_par_iter()
        .map(|file| {
            let style = cache
                .resolve(&file)
                .with_context(|| format!("Failed to resolve style for {}", file.display()));
            (file, style)
        })
        .collect();
    debug!("Style cache holds {} directories", cache.len());

    let mut failures = 0;
    let mut entries = Vec::new();
    for (file, style) in resolved {
        match style {
            Ok(style) => entries.push((file, style)),
            Err(e) => {
                warn!("{:#}", e);
                failures += 1;
            }
        }
    }

    if args.json {
        let json: Vec<serde_json::Value> = entries
            .iter()
            .map(|(file, style)| serde_json::json!({ "file": file, "style": style }))
            .collect();
        serde_json::to_writer_pretty(&mut *out, &json)?;
        writeln!(out)?;
    } else {
        for (file, style) in &entries {
            writeln!(out, "{}: {}", file.display(), style)?;
        }
    }
    Ok(failures)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Changed,
    Unchanged,
}

pub fn run_format<W: Write>(args: &FormatArgs, out: &mut W) -> Result<usize> {
    let start = Instant::now();
    let files = args.input.collect()?;
    let cache = StyleCache::new(ResourceConfig::default());

    let outcomes: Vec<Result<Outcome>> = if args.in_place {
        files
            .par_iter()
            .map(|file| format_file(file, &cache, &args.encoding, true, &mut io::sink()))
            .collect()
    } else {
        // stdout output must stay in file order
        files
            .iter()
            .map(|file| format_file(file, &cache, &args.encoding, false, &mut *out))
            .collect()
    };

    let (mut changed, mut failures) = (0, 0);
    for (file, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok(Outcome::Changed) => changed += 1,
            Ok(Outcome::Unchanged) => {}
            Err(e) => {
                warn!("Skipping {}: {:#}", file.display(), e);
                failures += 1;
            }
        }
    }

    let summary = format!(
        "\n{} Finished in {}ms on {} files ({} changed, {} failed).",
        "●".bright_blue(),
        start.elapsed().as_millis().to_string().cyan(),
        files.len().to_string().cyan(),
        changed.to_string().cyan(),
        if failures > 0 { failures.to_string().red() } else { failures.to_string().cyan() },
    );
    eprintln!("{}", summary);
    Ok(failures)
}

fn format_file<W: Write + ?Sized>(
    file: &Path,
    cache: &StyleCache,
    encoding: &str,
    in_place: bool,
    out: &mut W,
) -> Result<Outcome> {
    let style = cache.resolve(file)?;
    debug!("Formatting {} with style {}", file.display(), style);

    let source = read_source(file, encoding)?;
    let formatted = reformat(&source, &style);
    let outcome = if formatted == source { Outcome::Unchanged } else { Outcome::Changed };

    if in_place && outcome == Outcome::Unchanged {
        debug!("{} already formatted", file.display());
        return Ok(outcome);
    }

    let destination = Destination::File(file.to_path_buf());
    write_reformatted_code(&destination, &formatted, in_place, encoding, out)
        .with_context(|| format!("Failed to write {}", destination))?;
    Ok(outcome)
}
