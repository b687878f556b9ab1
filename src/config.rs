//! Search configuration.
//!
//! Everything the search component needs to know about the page it is bound
//! to lives here: which display policy to use, how many articles make up a
//! page, the CSS selectors that locate articles and their fields, and the ids
//! of the few singleton elements (input box, status line, content root).
//!
//! The defaults match the markup of a published edition page, so an empty
//! YAML file (or no file at all) is a valid configuration.
//!
//! # Example
//!
//! ```yaml
//! mode: paginated
//! page_size: 20
//! selectors:
//!   day_section: ".daily-content"
//! ```

use crate::error::{Result, SearchError};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Default number of articles per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// How the component treats the empty query and whether it paginates.
///
/// A paginated page shows the newest slice when nothing is typed. A show-all
/// page shows everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Articles are sorted newest first, results are split into pages, and
    /// the empty query shows only the newest page.
    #[default]
    Paginated,
    /// Collection order is kept, every match is shown at once, and the empty
    /// query matches every article.
    ShowAll,
}

/// CSS selectors used to read the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Selectors {
    /// One syndicated item.
    pub article: String,
    /// Title element, searched inside the article.
    pub title: String,
    /// Description element, searched inside the article.
    pub description: String,
    /// Container grouping one source's articles within a day.
    pub source_group: String,
    /// Source name heading, searched inside the closest source group.
    pub source_name: String,
    /// Container grouping all source groups of one day.
    pub day_section: String,
    /// Element carrying the machine-readable timestamp.
    pub timestamp: String,
    /// Attribute of the timestamp element holding the date-time.
    pub timestamp_attr: String,
    /// Collapsible region forced open on search results.
    pub details: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            article: "article".to_string(),
            title: ".article-expander__title".to_string(),
            description: ".media-object__text span:first-child".to_string(),
            source_group: ".card__section".to_string(),
            source_name: ".source-heading__name".to_string(),
            day_section: ".daily-content".to_string(),
            timestamp: "time".to_string(),
            timestamp_attr: "datetime".to_string(),
            details: "details".to_string(),
        }
    }
}

impl Selectors {
    /// Check that every selector parses.
    pub fn validate(&self) -> Result<()> {
        for selector in [
            &self.article,
            &self.title,
            &self.description,
            &self.source_group,
            &self.source_name,
            &self.day_section,
            &self.timestamp,
            &self.details,
        ] {
            Selector::parse(selector).map_err(|e| SearchError::InvalidSelector {
                selector: selector.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Ids of the singleton elements the component binds to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ElementIds {
    pub search_input: String,
    pub status: String,
    pub content_root: String,
    pub pagination: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            search_input: "search-input".to_string(),
            status: "search-stats".to_string(),
            content_root: "content".to_string(),
            pagination: "pagination-controls".to_string(),
        }
    }
}

/// Complete configuration for a [`crate::NewsSearch`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mode: Mode,
    pub page_size: usize,
    pub selectors: Selectors,
    pub ids: ElementIds,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            selectors: Selectors::default(),
            ids: ElementIds::default(),
        }
    }
}

impl SearchConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document, treat it as all defaults
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&yaml)?;
        debug!(mode = ?config.mode, page_size = config.page_size, "Loaded search configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(SearchError::InvalidPageSize);
        }
        self.selectors.validate()
    }

    pub fn paginated(&self) -> bool {
        self.mode == Mode::Paginated
    }
}
