//! Serializable summary of what a search session currently shows.
//!
//! Used by the command-line tool to print results as text or JSON. Article
//! fields are read back from the page so they keep their original casing.

use crate::dom::Dom;
use crate::index::ArticleFields;
use crate::render::View;
use crate::search::NewsSearch;
use crate::url_sync::Location;
use crate::utils::collapse_whitespace;
use serde::Serialize;

/// One visible article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotArticle {
    pub title: String,
    pub description: String,
    pub source: String,
    pub timestamp: Option<String>,
}

/// Visible state of a search session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub query: String,
    pub view: View,
    pub status: String,
    /// URL fragment, `""` when none.
    pub hash: String,
    pub page: usize,
    pub total_pages: usize,
    /// Label of the pagination bar, `None` when the bar is hidden.
    pub pagination: Option<String>,
    pub total_articles: usize,
    /// Size of the match set, `None` when no query is applied.
    pub matches: Option<usize>,
    pub articles: Vec<SnapshotArticle>,
}

impl Snapshot {
    pub fn capture<D: Dom, L: Location>(search: &NewsSearch<D, L>) -> Self {
        let rendered = search.rendered();
        let selectors = &search.config().selectors;
        let articles = rendered
            .visible
            .iter()
            .map(|&node| {
                let fields = ArticleFields::extract(search.dom(), node, selectors);
                SnapshotArticle {
                    title: collapse_whitespace(&fields.title),
                    description: collapse_whitespace(&fields.description),
                    source: collapse_whitespace(&fields.source),
                    timestamp: fields.timestamp,
                }
            })
            .collect();

        Self {
            query: search.query().to_string(),
            view: rendered.view,
            status: rendered.status.clone(),
            hash: search.location().hash(),
            page: rendered.bar.page,
            total_pages: rendered.bar.total_pages,
            pagination: rendered.bar.visible.then(|| rendered.bar.label()),
            total_articles: search.index().len(),
            matches: (rendered.view == View::Results).then(|| search.current().len()),
            articles,
        }
    }
}
