//! Article index built once from the page.
//!
//! Every article node present when the index is built is read exactly once:
//! its title, description and source name are lowercased and stored together
//! with its optional timestamp. Later queries scan this flat list instead of
//! re-reading the document.
//!
//! The index is a separate table keyed by node handle; nothing is attached to
//! the nodes themselves. If the page is mutated after the index is built the
//! index goes stale, there is no re-indexing.

use crate::config::Selectors;
use crate::dom::Dom;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, info, instrument};

/// Raw text of an article's searchable fields, as found in the page.
///
/// Missing sub-elements give empty strings, a missing or empty timestamp
/// attribute gives `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFields {
    pub title: String,
    pub description: String,
    pub source: String,
    pub timestamp: Option<String>,
}

impl ArticleFields {
    /// Read the fields of `article` from the page.
    pub fn extract<D: Dom>(dom: &D, article: D::Node, selectors: &Selectors) -> Self {
        let text_of = |node: Option<D::Node>| node.map(|n| dom.text_content(n)).unwrap_or_default();

        let title = text_of(dom.query(article, &selectors.title));
        let description = text_of(dom.query(article, &selectors.description));
        let source = text_of(
            dom.closest(article, &selectors.source_group)
                .and_then(|group| dom.query(group, &selectors.source_name)),
        );
        let timestamp = dom
            .query(article, &selectors.timestamp)
            .and_then(|time| dom.attribute(time, &selectors.timestamp_attr))
            .filter(|ts| !ts.is_empty());

        Self {
            title,
            description,
            source,
            timestamp,
        }
    }
}

/// Searchable view of one article node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord<N> {
    #[serde(skip)]
    pub node: N,
    /// Lowercased title text.
    pub title: String,
    /// Lowercased description text.
    pub description: String,
    /// Lowercased source name.
    pub source: String,
    /// Machine-readable date-time, if the article carries one.
    pub timestamp: Option<String>,
}

impl<N> ArticleRecord<N> {
    pub fn new(node: N, fields: ArticleFields) -> Self {
        Self {
            node,
            title: fields.title.to_lowercase(),
            description: fields.description.to_lowercase(),
            source: fields.source.to_lowercase(),
            timestamp: fields.timestamp,
        }
    }

    /// Parsed timestamp used for newest-first ordering. Missing or
    /// unparseable timestamps sort as the Unix epoch.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Parse an ISO-like date-time.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`
/// (read as UTC, optional fractional seconds) and bare `YYYY-MM-DD` dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Ordered list of article records plus a node-to-record lookup.
#[derive(Debug, Clone)]
pub struct ArticleIndex<N> {
    records: Vec<ArticleRecord<N>>,
    positions: HashMap<N, usize>,
}

impl<N> Default for ArticleIndex<N> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> ArticleIndex<N> {
    /// Scan the page for articles, in document order.
    #[instrument(level = "debug", skip_all, fields(selector = %selectors.article))]
    pub fn build<D: Dom<Node = N>>(dom: &D, selectors: &Selectors) -> Self {
        let records = dom
            .query_all(None, &selectors.article)
            .into_iter()
            .map(|node| ArticleRecord::new(node, ArticleFields::extract(dom, node, selectors)))
            .collect();
        let index = Self::from_records(records);
        info!(count = index.len(), "Indexed articles");
        index
    }

    pub fn from_records(records: Vec<ArticleRecord<N>>) -> Self {
        let mut index = Self {
            records,
            positions: HashMap::new(),
        };
        index.reindex_positions();
        index
    }

    /// Reorder records newest first. Ties keep their document order.
    ///
    /// Each timestamp is parsed once.
    pub fn sort_newest_first(&mut self) {
        self.records.sort_by_cached_key(|record| Reverse(record.sort_key()));
        self.reindex_positions();
        debug!(count = self.records.len(), "Sorted articles newest first");
    }

    fn reindex_positions(&mut self) {
        self.positions = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.node, i))
            .collect();
    }

    pub fn records(&self) -> &[ArticleRecord<N>] {
        &self.records
    }

    pub fn get(&self, node: N) -> Option<&ArticleRecord<N>> {
        self.positions.get(&node).map(|&i| &self.records[i])
    }

    pub fn contains(&self, node: N) -> bool {
        self.positions.contains_key(&node)
    }

    /// Node handles in index order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.records.iter().map(|record| record.node)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
