//! Host document abstraction.
//!
//! The search component never talks to a concrete DOM. It reads and mutates
//! the page through the [`Dom`] trait, which keeps the filtering logic
//! testable against an in-memory page and lets the same code drive a live
//! browser document.
//!
//! # Implementations
//!
//! | Host | Module | Node handle | Notes |
//! |------|--------|-------------|-------|
//! | Parsed HTML | [`page`] | [`page::PageNode`] | Built on `scraper`; used by tests and the CLI |
//! | Browser | `browser` | arena index | `wasm32` + `browser` feature only; backed by `web-sys` |
//!
//! # Write contract
//!
//! Implementations only ever change:
//! - the `display` of a node (`""` when shown, `none` when hidden)
//! - the `open` state of details regions
//! - the text of the status element and the value of the search input
//! - one pagination container appended to the content root

use crate::paginator::PaginationBar;
use std::fmt::Debug;
use std::hash::Hash;

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
pub mod browser;
pub mod page;

/// Read and write access to the document the search component is bound to.
///
/// Selectors are CSS selector strings. A selector the host cannot parse
/// matches nothing.
pub trait Dom {
    /// Stable handle to one element.
    type Node: Copy + Eq + Hash + Debug;

    /// All elements matching `selector` in document order, searched below
    /// `scope` or across the whole document when `scope` is `None`.
    fn query_all(&self, scope: Option<Self::Node>, selector: &str) -> Vec<Self::Node>;

    /// First descendant of `scope` matching `selector`.
    fn query(&self, scope: Self::Node, selector: &str) -> Option<Self::Node> {
        self.query_all(Some(scope), selector).into_iter().next()
    }

    /// `node` itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: Self::Node, selector: &str) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: Self::Node) -> String;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Whether the node's own `display` is `none`.
    fn is_hidden(&self, node: Self::Node) -> bool;

    fn set_hidden(&mut self, node: Self::Node, hidden: bool);

    /// Open or close a details region.
    fn set_open(&mut self, node: Self::Node, open: bool);

    /// Replace the text content of `node`.
    fn set_text(&mut self, node: Self::Node, text: &str);

    fn input_value(&self, node: Self::Node) -> String;

    fn set_input_value(&mut self, node: Self::Node, value: &str);

    /// Create the pagination container with the given id and append it to
    /// `root`. Returns the handle of the new container, or `None` when the
    /// host could not create it.
    fn mount_pagination(&mut self, root: Self::Node, id: &str) -> Option<Self::Node>;

    /// Redraw the pagination container from `bar`. A bar that is not
    /// visible hides the whole container.
    fn render_pagination(&mut self, container: Self::Node, bar: &PaginationBar);

    fn scroll_to_top(&mut self);
}
