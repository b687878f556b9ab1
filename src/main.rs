//! # Awful News Search CLI
//!
//! Runs the edition page search outside the browser. The page is loaded and
//! indexed exactly like the in-page component does it, then the requested
//! query, fragment and result page are applied and the visible state is
//! reported.
//!
//! ## Usage
//!
//! ```sh
//! awful_news_search book/daily_news.html -q climate
//! ```
//!
//! ## Pipeline
//!
//! 1. **Load**: read the page and the optional YAML config
//! 2. **Index**: extract searchable fields from every article card
//! 3. **Search**: restore the fragment or apply the typed query
//! 4. **Page**: step forward to the requested result page
//! 5. **Output**: print the snapshot, optionally write the re-rendered HTML

#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use awful_news_search::{HtmlPage, Location, MemoryLocation, NewsSearch, SearchConfig, Snapshot};
    use clap::Parser;
    use cli::Cli;
    use itertools::Itertools;
    use scraper::Html;
    use tracing::{debug, error, info, warn};
    use tracing_subscriber::{EnvFilter, fmt as tfmt};

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Load config & page ----
    let config = match &args.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    info!(mode = ?config.mode, page_size = config.page_size, "Using search configuration");

    let source = match tokio::fs::read_to_string(&args.page_file).await {
        Ok(source) => source,
        Err(e) => {
            error!(path = %args.page_file.display(), error = %e, "Failed to read page");
            return Err(e.into());
        }
    };
    let html = Html::parse_document(&source);
    info!(path = %args.page_file.display(), bytes = source.len(), "Parsed page");

    let mut location = MemoryLocation::default();
    if let Some(hash) = args.hash.as_deref().map(|h| h.trim_start_matches('#')) {
        if !hash.is_empty() {
            location.set_hash(hash);
        }
    }

    // ---- Index and search ----
    let mut search = NewsSearch::attach(HtmlPage::new(&html), location, config)?;
    search.init();
    if let Some(query) = &args.query {
        search.search(query);
    }

    for _ in 1..args.page {
        if !search.next_page() {
            warn!(requested = args.page, reached = search.page(), "Requested page is past the last page");
            break;
        }
    }

    // ---- Output ----
    let snapshot = Snapshot::capture(&search);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", snapshot.status);
        if let Some(label) = &snapshot.pagination {
            println!("{label}");
        }
        for article in &snapshot.articles {
            let stamp = article.timestamp.as_deref().unwrap_or("undated");
            let line = [stamp, article.source.as_str(), article.title.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .join(" | ");
            println!("  {line}");
        }
    }

    if let Some(output) = &args.output {
        let rendered = search.dom().to_html();
        tokio::fs::write(output, rendered).await?;
        info!(path = %output.display(), "Wrote rendered page");
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, articles = snapshot.total_articles, matches = ?snapshot.matches, "Execution complete");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
