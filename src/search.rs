//! The search component.
//!
//! [`NewsSearch`] owns everything one page needs: the article index, the
//! current query, the current match set and the page window. Each entry point
//! ([`NewsSearch::search`], [`NewsSearch::next_page`],
//! [`NewsSearch::prev_page`]) runs the whole pipeline synchronously:
//!
//! ```text
//! Idle -> Matching -> Rendering -> Idle
//! ```
//!
//! # Modes
//!
//! | Mode | Order | Empty query | Results |
//! |------|-------|-------------|---------|
//! | [`Mode::Paginated`] | newest first | newest page only | pages of `page_size` |
//! | [`Mode::ShowAll`] | page order | every article | all at once |

use crate::config::{Mode, SearchConfig};
use crate::dom::Dom;
use crate::error::{Result, SearchError};
use crate::index::ArticleIndex;
use crate::matcher::{match_articles, normalize_query};
use crate::paginator::{PageWindow, PaginationBar};
use crate::render::{Containers, Status, View, apply_visibility};
use crate::url_sync::{Location, restore_query, sync_query};
use crate::utils::truncate_for_log;
use tracing::{debug, info, instrument};

/// Element handles the component writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handles<N> {
    /// Status line element.
    pub status: N,
    /// Search box, pre-filled when a query is restored from the URL.
    pub input: Option<N>,
    /// Element the pagination bar is appended to.
    pub content_root: Option<N>,
}

/// Result of the last render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered<N> {
    pub view: View,
    pub status: String,
    /// Visible article nodes in display order.
    pub visible: Vec<N>,
    pub bar: PaginationBar,
}

impl<N> Default for Rendered<N> {
    fn default() -> Self {
        Self {
            view: View::Default,
            status: String::new(),
            visible: Vec::new(),
            bar: PaginationBar::hidden(),
        }
    }
}

/// Filtering and pagination of the article cards on one page.
#[derive(Debug)]
pub struct NewsSearch<D: Dom, L: Location> {
    dom: D,
    location: L,
    config: SearchConfig,
    handles: Handles<D::Node>,
    pagination: Option<D::Node>,
    index: ArticleIndex<D::Node>,
    containers: Containers<D::Node>,
    query: String,
    current: Vec<D::Node>,
    view: View,
    window: PageWindow,
    rendered: Rendered<D::Node>,
}

impl<D: Dom, L: Location> NewsSearch<D, L> {
    /// Bind to a page, looking the singleton elements up by id.
    ///
    /// The status element is required. The search input and content root are
    /// optional; without a content root no pagination bar is drawn.
    pub fn attach(dom: D, location: L, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let status = dom
            .element_by_id(&config.ids.status)
            .ok_or_else(|| SearchError::MissingElement(config.ids.status.clone()))?;
        let handles = Handles {
            status,
            input: dom.element_by_id(&config.ids.search_input),
            content_root: dom.element_by_id(&config.ids.content_root),
        };
        debug!(?handles, "Resolved page elements");
        Ok(Self::with_handles(dom, location, config, handles))
    }

    /// Bind to a page with explicitly provided element handles.
    pub fn with_handles(dom: D, location: L, config: SearchConfig, handles: Handles<D::Node>) -> Self {
        let window = PageWindow::new(config.page_size);
        Self {
            dom,
            location,
            config,
            handles,
            pagination: None,
            index: ArticleIndex::default(),
            containers: Containers::default(),
            query: String::new(),
            current: Vec::new(),
            view: View::Default,
            window,
            rendered: Rendered::default(),
        }
    }

    /// Read every article on the page into the index and record which day
    /// section and source group holds which article.
    ///
    /// Paginated pages are ordered newest first.
    pub fn build_index(&mut self) {
        self.index = ArticleIndex::build(&self.dom, &self.config.selectors);
        if self.config.paginated() {
            self.index.sort_newest_first();
        }
        self.containers = Containers::collect(&self.dom, &self.index, &self.config.selectors);
    }

    /// Start-up sequence: index the page, mount the pagination bar, then
    /// either replay the query found in the URL fragment or show the
    /// default view.
    #[instrument(level = "info", skip_all, fields(mode = ?self.config.mode))]
    pub fn init(&mut self) -> &Rendered<D::Node> {
        self.build_index();

        if self.config.paginated() {
            if let Some(root) = self.handles.content_root {
                self.pagination = self.dom.mount_pagination(root, &self.config.ids.pagination);
            }
        }

        match restore_query(&self.location) {
            Some(query) => {
                if let Some(input) = self.handles.input {
                    self.dom.set_input_value(input, &query);
                }
                self.search(&query)
            }
            None => {
                self.show_default();
                &self.rendered
            }
        }
    }

    /// Run the pipeline for the current value of the search input, the way
    /// an `input` event does.
    pub fn handle_input(&mut self) -> &Rendered<D::Node> {
        let raw = self
            .handles
            .input
            .map(|input| self.dom.input_value(input))
            .unwrap_or_default();
        self.search(&raw)
    }

    /// Submit a query: update the URL, match, reset to page 1 and render.
    #[instrument(level = "debug", skip_all, fields(query = %truncate_for_log(raw, 80)))]
    pub fn search(&mut self, raw: &str) -> &Rendered<D::Node> {
        let query = normalize_query(raw);
        sync_query(&mut self.location, &query);
        self.query = query;

        if self.query.is_empty() {
            self.show_default();
            return &self.rendered;
        }

        self.window.reset();
        self.current = match_articles(self.index.records(), &self.query);
        self.view = View::Results;
        info!(
            query = %truncate_for_log(&self.query, 80),
            matches = self.current.len(),
            "Search matched articles"
        );
        self.render();
        &self.rendered
    }

    /// Default view: the newest page on a paginated page, everything on a
    /// show-all page.
    fn show_default(&mut self) {
        self.window.reset();
        self.current = match self.config.mode {
            Mode::Paginated => self.index.nodes().take(self.window.page_size()).collect(),
            Mode::ShowAll => self.index.nodes().collect(),
        };
        self.view = View::Default;
        self.render();
    }

    /// Move to the next page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        let len = self.current.len();
        self.turn_page(|window| window.next(len))
    }

    /// Move to the previous page. Returns `false` on page 1.
    pub fn prev_page(&mut self) -> bool {
        self.turn_page(PageWindow::prev)
    }

    fn turn_page(&mut self, step: impl FnOnce(&mut PageWindow) -> bool) -> bool {
        if !self.config.paginated() || !step(&mut self.window) {
            return false;
        }
        debug!(page = self.window.page(), "Turned page");
        self.render();
        self.dom.scroll_to_top();
        true
    }

    fn render(&mut self) {
        let len = self.current.len();
        let (range, bar) = match self.config.mode {
            Mode::Paginated => (self.window.range(len), self.window.bar(len)),
            Mode::ShowAll => (0..len, PaginationBar::hidden()),
        };
        let shown = &self.current[range.clone()];
        let expand = self.view == View::Results;
        let visible = apply_visibility(
            &mut self.dom,
            &self.index,
            &self.containers,
            &self.config.selectors,
            shown,
            expand,
        );

        let status = match (self.config.mode, self.view) {
            (Mode::Paginated, View::Default) => Status::Newest {
                shown: visible,
                total: self.index.len(),
            },
            (Mode::Paginated, View::Results) => Status::page(len, range),
            (Mode::ShowAll, _) => Status::Found {
                visible,
                total: self.index.len(),
            },
        }
        .to_string();
        self.dom.set_text(self.handles.status, &status);

        if let Some(container) = self.pagination {
            self.dom.render_pagination(container, &bar);
        }

        debug!(%status, visible, page = bar.page, total_pages = bar.total_pages, "Rendered");
        self.rendered = Rendered {
            view: self.view,
            status,
            visible: shown.to_vec(),
            bar,
        };
    }

    /// Normalized query currently applied.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn page(&self) -> usize {
        self.window.page()
    }

    /// Match set of the current query, or the default set.
    pub fn current(&self) -> &[D::Node] {
        &self.current
    }

    pub fn rendered(&self) -> &Rendered<D::Node> {
        &self.rendered
    }

    pub fn index(&self) -> &ArticleIndex<D::Node> {
        &self.index
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn handles(&self) -> &Handles<D::Node> {
        &self.handles
    }

    /// Mounted pagination container, if any.
    pub fn pagination(&self) -> Option<D::Node> {
        self.pagination
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Give back the page and URL.
    pub fn into_parts(self) -> (D, L) {
        (self.dom, self.location)
    }
}
