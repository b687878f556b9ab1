//! Command-line interface definitions for Awful News Search.
//!
//! The tool replays what a reader's browser does on a published edition
//! page: it loads the page, optionally restores a query from a URL fragment
//! or types one into the search box, turns to the requested result page and
//! reports what is visible.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Awful News Search tool.
///
/// # Examples
///
/// ```sh
/// # Default view of an edition page
/// awful_news_search book/daily_news.html
///
/// # Second page of results for "climate", as JSON
/// awful_news_search book/daily_news.html -q climate -p 2 --json
///
/// # Page loaded with a fragment, written back out pre-rendered
/// awful_news_search book/daily_news.html --hash '#climate' -o climate.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Rendered edition page (HTML) to search
    pub page_file: PathBuf,

    /// Query typed into the search box after the page has loaded
    #[arg(short, long)]
    pub query: Option<String>,

    /// URL fragment present when the page loads (e.g. "#climate")
    #[arg(long)]
    pub hash: Option<String>,

    /// Result page to show
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Optional path to a search config YAML file
    #[arg(short, long, env = "NEWS_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the re-rendered page to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the result as JSON instead of text
    #[arg(long)]
    pub json: bool,
}
