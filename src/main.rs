//! CLI entry point for get-comics.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use get_comics_core::pipeline::{self, RunContext};
use tracing::{debug, info};

mod app_config;
mod cli;

use app_config::{build_run_options, load_default_file_config};
use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let file_config = load_default_file_config()?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => file_config
                .as_ref()
                .and_then(|cfg| cfg.verbosity)
                .map_or("info", |v| v.filter_level()),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");
    if let Some(cfg) = &file_config {
        debug!(
            verbosity = cfg.verbosity.map_or("unset", |v| v.as_str()),
            "config file loaded"
        );
    }

    let options = build_run_options(&args, file_config.as_ref());
    info!(
        output = %options.output_dir.display(),
        base_url = %options.base_url(),
        pages = options.pages,
        start = options.start,
        "get-comics starting"
    );

    let show_progress = !args.quiet && io::stderr().is_terminal();
    let context = RunContext::live(&options, show_progress)?;
    let summary = pipeline::run(&options, &context)
        .await
        .context("run aborted")?;

    if let Some(path) = &summary.links_file {
        info!(path = %path.display(), "links saved");
    }
    info!(
        records = summary.records,
        downloaded = summary.stats.downloaded,
        skipped = summary.stats.skipped,
        failed = summary.stats.exhausted,
        "Download complete"
    );

    Ok(())
}
