//! # Awful News Search
//!
//! Search box for a published Awful Text News edition page. The page already
//! contains every article card, grouped by source inside day sections; this
//! crate narrows that list to the cards matching a typed query, optionally
//! pages through the matches, and keeps the query in the URL fragment.
//!
//! ## Features
//!
//! - Indexes title, description and source name of every article once
//! - Case-insensitive substring matching across those fields
//! - Hides day sections and source groups left without visible articles
//! - Opens the details of matched articles
//! - Newest-first pagination with previous/next controls
//! - Query persistence in `location.hash`
//!
//! ## Architecture
//!
//! The component is written against two host traits:
//! 1. [`dom::Dom`]: the document (an in-memory [`HtmlPage`] or, with the
//!    `browser` feature on `wasm32`, the live browser document)
//! 2. [`url_sync::Location`]: the page URL ([`MemoryLocation`] or the
//!    browser's location and history)
//!
//! [`NewsSearch`] ties the index, matcher, renderer, paginator and URL sync
//! together.
//!
//! ## Usage
//!
//! ```ignore
//! use awful_news_search::{HtmlPage, MemoryLocation, NewsSearch, SearchConfig};
//! use scraper::Html;
//!
//! let html = Html::parse_document(&page_source);
//! let mut search = NewsSearch::attach(HtmlPage::new(&html), MemoryLocation::default(), SearchConfig::default())?;
//! search.init();
//! let rendered = search.search("climate");
//! println!("{}", rendered.status);
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod index;
pub mod matcher;
pub mod paginator;
pub mod render;
pub mod search;
pub mod snapshot;
pub mod url_sync;
pub mod utils;

pub use config::{Mode, SearchConfig};
pub use dom::Dom;
pub use dom::page::{HtmlPage, PageNode};
pub use error::{Result, SearchError};
pub use search::{Handles, NewsSearch, Rendered};
pub use snapshot::Snapshot;
pub use url_sync::{Location, MemoryLocation};
