//! Visibility updates and the status line.
//!
//! Rendering one state of the result list is always the same sequence:
//! hide every indexed article, show the articles of the current slice
//! (opening their details regions on search results), then hide every day
//! section and source group that is left without a visible article, and
//! finally write the status line.

use crate::config::Selectors;
use crate::dom::Dom;
use crate::index::ArticleIndex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, instrument};

/// Which kind of list is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Nothing typed: the newest slice, or everything in show-all mode.
    Default,
    /// The match set of a non-empty query.
    Results,
}

/// Status line shown above the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Default view of a paginated page.
    Newest { shown: usize, total: usize },
    /// One page of paginated search results, `start` and `end` 1-based.
    /// A search without hits reads `Found 0 articles`, with no range.
    Page { found: usize, start: usize, end: usize },
    /// Search results on a show-all page.
    Found { visible: usize, total: usize },
}

impl Status {
    /// Status for a paginated result set of `found` items showing the
    /// 0-based half-open `range`.
    pub fn page(found: usize, range: std::ops::Range<usize>) -> Self {
        Status::Page {
            found,
            start: range.start + 1,
            end: range.end,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Status::Newest { shown, total } => {
                write!(f, "Showing newest {shown} of {total} articles")
            }
            Status::Page { found: 0, .. } => write!(f, "Found 0 articles"),
            Status::Page { found, start, end } => {
                write!(f, "Found {found} articles, showing {start}-{end}")
            }
            Status::Found { visible, total } if visible == total => {
                write!(f, "Showing all {total} articles")
            }
            Status::Found { visible, total } => write!(f, "Found {visible} of {total} articles"),
        }
    }
}

/// Day sections and source groups, each with the indexed articles it holds.
///
/// Collected once next to the index so a render pass never has to query the
/// page for containers again.
#[derive(Debug, Clone)]
pub struct Containers<N> {
    /// Day sections first, then source groups.
    entries: Vec<(N, Vec<N>)>,
    days: usize,
}

impl<N> Default for Containers<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            days: 0,
        }
    }
}

impl<N: Copy + Eq + Hash> Containers<N> {
    #[instrument(level = "debug", skip_all)]
    pub fn collect<D: Dom<Node = N>>(dom: &D, index: &ArticleIndex<N>, selectors: &Selectors) -> Self {
        let members = |container: N| -> Vec<N> {
            dom.query_all(Some(container), &selectors.article)
                .into_iter()
                .filter(|&article| index.contains(article))
                .collect()
        };
        let days = dom.query_all(None, &selectors.day_section);
        let groups = dom.query_all(None, &selectors.source_group);
        let day_count = days.len();
        let entries: Vec<(N, Vec<N>)> = days
            .into_iter()
            .chain(groups)
            .map(|container| (container, members(container)))
            .collect();
        debug!(days = day_count, groups = entries.len() - day_count, "Collected containers");
        Self {
            entries,
            days: day_count,
        }
    }

    /// Number of day sections plus source groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Make exactly `shown` visible among the indexed articles and fix up the
/// enclosing containers.
///
/// With `expand` set every details region inside a shown article is opened.
/// Returns the number of visible articles.
#[instrument(level = "debug", skip_all, fields(shown = shown.len(), expand = expand))]
pub fn apply_visibility<D: Dom>(
    dom: &mut D,
    index: &ArticleIndex<D::Node>,
    containers: &Containers<D::Node>,
    selectors: &Selectors,
    shown: &[D::Node],
    expand: bool,
) -> usize {
    for node in index.nodes() {
        dom.set_hidden(node, true);
    }

    let visible: HashSet<D::Node> = shown.iter().copied().collect();
    for &node in shown {
        dom.set_hidden(node, false);
        if expand {
            for details in dom.query_all(Some(node), &selectors.details) {
                dom.set_open(details, true);
            }
        }
    }

    sync_containers(dom, containers, &visible);
    visible.len()
}

/// Show a container iff it holds at least one visible article.
///
/// Every day section and every source group is decided on its own, so a
/// source group inside a hidden day is hidden as well.
fn sync_containers<D: Dom>(dom: &mut D, containers: &Containers<D::Node>, visible: &HashSet<D::Node>) {
    let mut hidden_days = 0usize;
    let mut hidden_groups = 0usize;
    for (i, (container, articles)) in containers.entries.iter().enumerate() {
        let empty = !articles.iter().any(|article| visible.contains(article));
        dom.set_hidden(*container, empty);
        if i < containers.days {
            hidden_days += usize::from(empty);
        } else {
            hidden_groups += usize::from(empty);
        }
    }
    debug!(hidden_days, hidden_groups, "Synced container visibility");
}
