//! Fixed-size paging over the current match set.
//!
//! [`PageWindow`] tracks the 1-based current page and slices the match set.
//! [`PaginationBar`] is the state of the control bar drawn by the host:
//! previous and next buttons, a "Page X of Y" label, and whether the bar is
//! shown at all.

use serde::Serialize;
use std::ops::Range;

/// Label of the previous-page button.
pub const PREV_LABEL: &str = "← Previous";
/// Label of the next-page button.
pub const NEXT_LABEL: &str = "Next →";

/// Current page plus the fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: usize,
    page_size: usize,
}

impl PageWindow {
    /// A window on page 1. `page_size` is clamped to at least 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// `ceil(len / page_size)`.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Indices of the current page within a match set of `len` items.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    /// Advance one page. Returns `false` when already on the last page.
    pub fn next(&mut self, len: usize) -> bool {
        if self.page < self.total_pages(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` when already on page 1.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Control bar state for a match set of `len` items.
    pub fn bar(&self, len: usize) -> PaginationBar {
        let total_pages = self.total_pages(len);
        PaginationBar {
            page: self.page,
            total_pages,
            visible: total_pages > 1,
            prev_disabled: self.page <= 1,
            next_disabled: self.page >= total_pages,
        }
    }
}

/// What the pagination control bar should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationBar {
    pub page: usize,
    pub total_pages: usize,
    /// Hidden entirely when there is at most one page.
    pub visible: bool,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl PaginationBar {
    /// Bar for a host that has nothing to page through.
    pub fn hidden() -> Self {
        Self {
            page: 1,
            total_pages: 0,
            visible: false,
            prev_disabled: true,
            next_disabled: true,
        }
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let window = PageWindow::new(20);
        assert_eq!(window.total_pages(0), 0);
        assert_eq!(window.total_pages(1), 1);
        assert_eq!(window.total_pages(20), 1);
        assert_eq!(window.total_pages(21), 2);
        assert_eq!(window.total_pages(45), 3);
    }

    #[test]
    fn test_first_page_range() {
        let window = PageWindow::new(20);
        assert_eq!(window.range(45), 0..20);
        assert_eq!(window.range(7), 0..7);
        assert_eq!(window.range(0), 0..0);
    }

    #[test]
    fn test_last_page_is_partial() {
        let mut window = PageWindow::new(20);
        assert!(window.next(25));
        assert_eq!(window.page(), 2);
        assert_eq!(window.range(25), 20..25);
        assert!(!window.next(25));
        assert_eq!(window.page(), 2);
    }

    #[test]
    fn test_prev_clamps_at_one() {
        let mut window = PageWindow::new(20);
        assert!(!window.prev());
        assert_eq!(window.page(), 1);
        window.next(60);
        window.next(60);
        assert!(window.prev());
        assert_eq!(window.page(), 2);
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut window = PageWindow::new(10);
        window.next(30);
        window.next(30);
        window.reset();
        assert_eq!(window.page(), 1);
    }

    #[test]
    fn test_bar_disables_buttons_at_boundaries() {
        let mut window = PageWindow::new(20);
        let bar = window.bar(45);
        assert!(bar.visible);
        assert!(bar.prev_disabled);
        assert!(!bar.next_disabled);
        assert_eq!(bar.label(), "Page 1 of 3");

        window.next(45);
        let bar = window.bar(45);
        assert!(!bar.prev_disabled);
        assert!(!bar.next_disabled);

        window.next(45);
        let bar = window.bar(45);
        assert!(!bar.prev_disabled);
        assert!(bar.next_disabled);
        assert_eq!(bar.label(), "Page 3 of 3");
    }

    #[test]
    fn test_bar_hidden_for_single_page() {
        let window = PageWindow::new(20);
        assert!(!window.bar(20).visible);
        assert!(!window.bar(0).visible);
        assert!(window.bar(21).visible);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let window = PageWindow::new(0);
        assert_eq!(window.page_size(), 1);
        assert_eq!(window.total_pages(3), 3);
    }
}
