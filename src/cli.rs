//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Crawl a comics aggregator and download every issue it lists.
///
/// Walks the site's listing pages (optionally filtered by search query, tag,
/// or category), extracts per-issue links for each file host, and downloads
/// each issue from the first host that delivers it.
#[derive(Parser, Debug)]
#[command(name = "get-comics")]
#[command(author, version, about)]
pub struct Args {
    /// Output directory for downloads and the links file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace files that already exist in the output directory
    #[arg(short = 'w', long)]
    pub overwrite: bool,

    /// Write the extracted links to links_<timestamp>.json before downloading
    #[arg(short = 'l', long)]
    pub save_links: bool,

    /// Keep downloaded .zip archives instead of extracting them
    #[arg(long)]
    pub no_extract: bool,

    /// Convert .cbr files to .cbz after download
    #[arg(long)]
    pub cbz: bool,

    /// Extract zip entries by file name only, ignoring their folders
    #[arg(long)]
    pub flatten: bool,

    /// Number of listing pages to walk (0 walks until the last page)
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,

    /// First listing page to walk
    #[arg(short, long, default_value_t = 1)]
    pub start: u32,

    /// Download from a single content page instead of walking listings
    #[arg(short, long, conflicts_with_all = ["query", "tag", "category"])]
    pub url: Option<String>,

    /// Site search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Tag filter (takes precedence over --category)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Category filter
    #[arg(short, long)]
    pub category: Option<String>,

    /// Site origin to crawl
    #[arg(long)]
    pub base_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,
}
