use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{CodecLimits, WireLimits};
use tools::{
    decode_capture, format_decode_pretty, format_inspect_pretty, inspect_capture, InspectReport,
};

#[derive(Parser)]
#[command(
    name = "propwire-tools",
    version,
    about = "propwire capture inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect record framing and sizes.
    Inspect {
        /// Capture file, or a directory when used with --glob.
        capture_path: PathBuf,
        /// Glob filter for capture files inside a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected captures.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of reported captures (after sorting).
        #[arg(long)]
        limit: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Decode records into entity property dumps.
    Decode {
        /// Capture file.
        capture_file: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            capture_path,
            glob,
            sort,
            limit,
            format,
        } => inspect(&capture_path, glob.as_deref(), sort, limit, format),
        Command::Decode {
            capture_file,
            format,
        } => decode(&capture_file, format),
    }
}

fn inspect(
    capture_path: &Path,
    pattern: Option<&str>,
    sort: Option<InspectSort>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let wire_limits = WireLimits::default();
    let mut reports: Vec<InspectReport> = Vec::new();

    for path in collect_paths(capture_path, pattern)? {
        let bytes = fs::read(&path)
            .with_context(|| format!("failed to read capture {}", path.display()))?;
        reports.push(inspect_capture(
            &path.display().to_string(),
            &bytes,
            &wire_limits,
        )?);
    }

    if let Some(InspectSort::Size) = sort {
        reports.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));
    }
    if let Some(limit) = limit {
        reports.truncate(limit);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Pretty => {
            for report in &reports {
                print!("{}", format_inspect_pretty(report));
            }
        }
    }
    Ok(())
}

fn decode(capture_file: &Path, format: OutputFormat) -> Result<()> {
    let bytes = fs::read(capture_file)
        .with_context(|| format!("failed to read capture {}", capture_file.display()))?;
    let entities = decode_capture(&bytes, &WireLimits::default(), &CodecLimits::default())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entities)?),
        OutputFormat::Pretty => print!("{}", format_decode_pretty(&entities)),
    }
    Ok(())
}

fn collect_paths(capture_path: &Path, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    if capture_path.is_file() {
        return Ok(vec![capture_path.to_path_buf()]);
    }
    if !capture_path.is_dir() {
        bail!("{} is neither a file nor a directory", capture_path.display());
    }

    let matcher = pattern
        .map(glob::Pattern::new)
        .transpose()
        .context("invalid glob pattern")?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(capture_path)
        .with_context(|| format!("failed to list {}", capture_path.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = matcher.as_ref().map_or(true, |matcher| {
            path.file_name()
                .map_or(false, |name| matcher.matches(&name.to_string_lossy()))
        });
        if matches {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
