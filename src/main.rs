use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ifnorm::{BatchReport, FileFormat, InputFile, SkipReason};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "ifnorm")]
#[command(about = "Normalize network interface status exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files (or whole directories) into normalized interface records.
    Parse {
        /// .xlsx, .xls, .csv or .txt files; directories are walked recursively.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write the JSON report here instead of stdout.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,

        /// Emit single-line JSON.
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Parse {
            paths,
            out,
            compact,
        } => {
            // 1) Expand directories, keeping argument order.
            let files = expand_inputs(&paths)?;

            // 2) Decode sequentially; per-file errors are recorded, not raised.
            let mut report = BatchReport::default();
            for path in &files {
                let name = path.display().to_string();
                if FileFormat::from_name(&name).is_none() {
                    report.push_skipped(&name, SkipReason::UnsupportedFormat);
                    continue;
                }
                match InputFile::read(path) {
                    Ok(file) => report.ingest(&file),
                    Err(err) => report.push_failed(&name, &err),
                }
            }
            info!(
                success = report.success_count(),
                skipped = report.skipped_count(),
                failed = report.failed_count(),
                records = report.records.len(),
                "batch done"
            );

            // 3) Emit JSON.
            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            match &out {
                Some(out) => {
                    std::fs::write(out, json)
                        .with_context(|| format!("write report {}", out.display()))?;
                    info!("wrote {}", out.display());
                }
                None => println!("{}", json),
            }

            if report.failed_count() > 0 && report.success_count() == 0 {
                bail!(
                    "failed to process {} file(s): {}",
                    report.failed_count(),
                    report.errors().join("; ")
                );
            }
        }
    }

    Ok(())
}

/// Files are taken as given; directories contribute every file beneath them
/// in sorted path order.
fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        if !path.is_dir() {
            out.push(path.clone());
            continue;
        }
        out.extend(walk_dir(path)?);
    }
    Ok(out)
}

fn walk_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*", glob::Pattern::escape(&dir.display().to_string()));
    let mut found = Vec::new();
    let entries =
        glob::glob(&pattern).with_context(|| format!("bad directory pattern {}", pattern))?;
    for entry in entries {
        let path = entry.with_context(|| format!("walk {}", dir.display()))?;
        if path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
