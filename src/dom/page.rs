//! In-memory page built from rendered HTML.
//!
//! [`HtmlPage`] wraps a parsed [`scraper::Html`] document and layers the
//! search component's writes (display, details state, status text, input
//! value, pagination bar) on top of it without touching the parsed tree.
//! [`HtmlPage::to_html`] applies those writes to a copy of the tree and
//! serializes it with scraper's serializer, which yields a pre-rendered
//! result page.

use super::Dom;
use crate::paginator::{NEXT_LABEL, PREV_LABEL, PaginationBar};
use ego_tree::{NodeId, NodeMut};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector, StrTendril};
use std::collections::HashMap;
use tracing::warn;

/// Handle of one element: its position in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageNode(usize);

#[derive(Debug, Clone)]
struct MountedPagination {
    node: PageNode,
    root: PageNode,
    id: String,
    bar: Option<PaginationBar>,
}

/// A parsed page plus the display state written by the search component.
#[derive(Debug)]
pub struct HtmlPage<'a> {
    html: &'a Html,
    elements: Vec<ElementRef<'a>>,
    positions: HashMap<NodeId, usize>,
    display: HashMap<PageNode, bool>,
    open: HashMap<PageNode, bool>,
    text: HashMap<PageNode, String>,
    values: HashMap<PageNode, String>,
    pagination: Option<MountedPagination>,
    scrolls: usize,
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(selector, error = %e, "Unparseable selector matches nothing");
            None
        }
    }
}

/// Whether an inline `style` attribute sets `display: none`.
fn style_hides(style: &str) -> bool {
    style.split(';').any(|decl| match decl.split_once(':') {
        Some((prop, value)) => {
            prop.trim().eq_ignore_ascii_case("display") && value.trim().eq_ignore_ascii_case("none")
        }
        None => false,
    })
}

/// Inline style with any `display` declaration replaced by the given value.
fn patch_style(style: &str, display: Option<&str>) -> String {
    let mut decls: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            decl.split_once(':')
                .is_none_or(|(prop, _)| !prop.trim().eq_ignore_ascii_case("display"))
        })
        .map(str::to_string)
        .collect();
    if let Some(display) = display {
        decls.push(format!("display: {display}"));
    }
    decls.join("; ")
}

/// Unprefixed attribute `local` of `element`, if present.
fn attr_mut<'e>(element: &'e mut Element, local: &str) -> Option<&'e mut StrTendril> {
    element
        .attrs
        .iter_mut()
        .find(|(name, _)| name.prefix.is_none() && &*name.local == local)
        .map(|(_, value)| value)
}

/// Set an unprefixed attribute, keeping its position when it already exists.
fn set_attr(element: &mut Element, local: &str, value: &str) {
    if let Some(existing) = attr_mut(element, local) {
        *existing = StrTendril::from(value);
        return;
    }
    // attribute names carry no namespace on HTML and foreign elements alike
    let mut name = element.name.clone();
    name.prefix = None;
    name.ns = "".into();
    name.local = local.into();
    element.attrs.push((name, StrTendril::from(value)));
}

fn remove_attr(element: &mut Element, local: &str) {
    element
        .attrs
        .retain(|(name, _)| !(name.prefix.is_none() && &*name.local == local));
}

fn with_element(node: &mut NodeMut<'_, Node>, edit: impl FnOnce(&mut Element)) {
    if let Node::Element(element) = node.value() {
        edit(element);
    }
}

/// Set the display of an element, writing `display: none` or dropping the
/// declaration again.
fn write_display(element: &mut Element, display: Option<&str>) {
    let current = attr_mut(element, "style").map(|style| String::from(&**style));
    match (current, display) {
        (Some(style), _) => {
            let patched = patch_style(&style, display);
            if patched.is_empty() {
                remove_attr(element, "style");
            } else {
                set_attr(element, "style", &patched);
            }
        }
        (None, Some(display)) => set_attr(element, "style", &format!("display: {display}")),
        (None, None) => {}
    }
}

fn replace_children_with_text(node: &mut NodeMut<'_, Node>, text: &str) {
    while let Some(mut child) = node.first_child() {
        child.detach();
    }
    node.append(Node::Text(Text {
        text: StrTendril::from(text),
    }));
}

/// Bare `div`, `button` and `span` element nodes the pagination bar is
/// assembled from.
struct PagerParts {
    div: Node,
    button: Node,
    span: Node,
}

impl PagerParts {
    fn parse() -> Option<Self> {
        let fragment = Html::parse_fragment("<div></div><button></button><span></span>");
        let find = |tag: &str| {
            fragment
                .tree
                .values()
                .find(|node| node.as_element().is_some_and(|element| element.name() == tag))
                .cloned()
        };
        Some(Self {
            div: find("div")?,
            button: find("button")?,
            span: find("span")?,
        })
    }
}

impl<'a> HtmlPage<'a> {
    pub fn new(html: &'a Html) -> Self {
        let root = html.root_element();
        let elements: Vec<ElementRef<'a>> = root.descendants().filter_map(ElementRef::wrap).collect();
        let positions = elements
            .iter()
            .enumerate()
            .map(|(i, element)| (element.id(), i))
            .collect();
        Self {
            html,
            elements,
            positions,
            display: HashMap::new(),
            open: HashMap::new(),
            text: HashMap::new(),
            values: HashMap::new(),
            pagination: None,
            scrolls: 0,
        }
    }

    fn element(&self, node: PageNode) -> Option<ElementRef<'a>> {
        self.elements.get(node.0).copied()
    }

    fn node_of(&self, element: &ElementRef<'a>) -> Option<PageNode> {
        self.positions.get(&element.id()).map(|&i| PageNode(i))
    }

    /// Whether `node` and every ancestor are displayed.
    pub fn is_rendered(&self, node: PageNode) -> bool {
        if self.is_hidden(node) {
            return false;
        }
        let Some(element) = self.element(node) else {
            return true;
        };
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .filter_map(|ancestor| self.node_of(&ancestor))
            .all(|ancestor| !self.is_hidden(ancestor))
    }

    /// Whether a details region is open, taking writes into account.
    pub fn is_open(&self, node: PageNode) -> bool {
        match self.open.get(&node) {
            Some(&open) => open,
            None => self
                .element(node)
                .is_some_and(|element| element.value().attr("open").is_some()),
        }
    }

    /// Current pagination bar, if one has been mounted and drawn.
    pub fn pagination_bar(&self) -> Option<&PaginationBar> {
        self.pagination.as_ref().and_then(|mounted| mounted.bar.as_ref())
    }

    /// How many times the viewport was scrolled to the top.
    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }

    /// Serialize the document with every write applied.
    pub fn to_html(&self) -> String {
        let mut doc = self.html.clone();

        for (&node, &hidden) in &self.display {
            self.edit(&mut doc, node, |n| {
                with_element(n, |element| write_display(element, hidden.then_some("none")))
            });
        }
        for (&node, &open) in &self.open {
            self.edit(&mut doc, node, |n| {
                with_element(n, |element| {
                    if open {
                        set_attr(element, "open", "");
                    } else {
                        remove_attr(element, "open");
                    }
                })
            });
        }
        for (&node, value) in &self.values {
            self.edit(&mut doc, node, |n| with_element(n, |element| set_attr(element, "value", value)));
        }
        for (&node, text) in &self.text {
            self.edit(&mut doc, node, |n| replace_children_with_text(n, text));
        }
        if let Some(mounted) = &self.pagination {
            self.write_pagination(&mut doc, mounted);
        }

        doc.html()
    }

    /// Apply `edit` to the copy of `node` inside `doc`.
    fn edit(&self, doc: &mut Html, node: PageNode, edit: impl FnOnce(&mut NodeMut<'_, Node>)) {
        let Some(id) = self.element(node).map(|element| element.id()) else {
            return;
        };
        if let Some(mut target) = doc.tree.get_mut(id) {
            edit(&mut target);
        }
    }

    fn write_pagination(&self, doc: &mut Html, mounted: &MountedPagination) {
        let Some(parts) = PagerParts::parse() else {
            warn!("Failed to build pagination markup");
            return;
        };
        let visible = mounted.bar.is_some_and(|bar| bar.visible) && !self.is_hidden(mounted.node);
        let bar = mounted.bar.filter(|_| visible);

        self.edit(doc, mounted.root, |root| {
            let mut pager = root.append(parts.div.clone());
            with_element(&mut pager, |element| {
                set_attr(element, "id", &mounted.id);
                set_attr(element, "class", "pagination-controls");
                set_attr(element, "style", if visible { "display: flex" } else { "display: none" });
            });
            let Some(bar) = bar else {
                return;
            };
            append_button(&mut pager, &parts, "prev", PREV_LABEL, bar.prev_disabled);
            let mut info = pager.append(parts.span.clone());
            with_element(&mut info, |element| set_attr(element, "class", "pagination-info"));
            replace_children_with_text(&mut info, &bar.label());
            append_button(&mut pager, &parts, "next", NEXT_LABEL, bar.next_disabled);
        });
    }
}

fn append_button(pager: &mut NodeMut<'_, Node>, parts: &PagerParts, action: &str, label: &str, disabled: bool) {
    let mut button = pager.append(parts.button.clone());
    with_element(&mut button, |element| {
        set_attr(element, "class", "pagination-button");
        set_attr(element, "data-page-action", action);
        if disabled {
            set_attr(element, "disabled", "");
        }
    });
    replace_children_with_text(&mut button, label);
}

impl<'a> Dom for HtmlPage<'a> {
    type Node = PageNode;

    fn query_all(&self, scope: Option<PageNode>, selector: &str) -> Vec<PageNode> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        match scope {
            None => self
                .html
                .select(&selector)
                .filter_map(|element| self.node_of(&element))
                .collect(),
            Some(scope) => {
                let Some(scope_element) = self.element(scope) else {
                    return Vec::new();
                };
                scope_element
                    .select(&selector)
                    .filter_map(|element| self.node_of(&element))
                    .filter(|&node| node != scope)
                    .collect()
            }
        }
    }

    fn closest(&self, node: PageNode, selector: &str) -> Option<PageNode> {
        let selector = parse_selector(selector)?;
        let element = self.element(node)?;
        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .find(|candidate| selector.matches(candidate))
            .and_then(|found| self.node_of(&found))
    }

    fn element_by_id(&self, id: &str) -> Option<PageNode> {
        if let Some(mounted) = &self.pagination {
            if mounted.id == id {
                return Some(mounted.node);
            }
        }
        self.elements
            .iter()
            .position(|element| element.value().id() == Some(id))
            .map(PageNode)
    }

    fn text_content(&self, node: PageNode) -> String {
        if let Some(text) = self.text.get(&node) {
            return text.clone();
        }
        if let Some(mounted) = &self.pagination {
            if mounted.node == node {
                return mounted
                    .bar
                    .filter(|bar| bar.visible)
                    .map(|bar| format!("{PREV_LABEL}{}{NEXT_LABEL}", bar.label()))
                    .unwrap_or_default();
            }
        }
        self.element(node)
            .map(|element| element.text().collect())
            .unwrap_or_default()
    }

    fn attribute(&self, node: PageNode, name: &str) -> Option<String> {
        self.element(node)
            .and_then(|element| element.value().attr(name))
            .map(str::to_string)
    }

    fn is_hidden(&self, node: PageNode) -> bool {
        if let Some(&hidden) = self.display.get(&node) {
            return hidden;
        }
        self.element(node)
            .and_then(|element| element.value().attr("style"))
            .is_some_and(style_hides)
    }

    fn set_hidden(&mut self, node: PageNode, hidden: bool) {
        self.display.insert(node, hidden);
    }

    fn set_open(&mut self, node: PageNode, open: bool) {
        self.open.insert(node, open);
    }

    fn set_text(&mut self, node: PageNode, text: &str) {
        self.text.insert(node, text.to_string());
    }

    fn input_value(&self, node: PageNode) -> String {
        self.values
            .get(&node)
            .cloned()
            .or_else(|| self.attribute(node, "value"))
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, node: PageNode, value: &str) {
        self.values.insert(node, value.to_string());
    }

    fn mount_pagination(&mut self, root: PageNode, id: &str) -> Option<PageNode> {
        if let Some(mounted) = &self.pagination {
            return Some(mounted.node);
        }
        let node = PageNode(self.elements.len());
        self.pagination = Some(MountedPagination {
            node,
            root,
            id: id.to_string(),
            bar: None,
        });
        Some(node)
    }

    fn render_pagination(&mut self, container: PageNode, bar: &PaginationBar) {
        if let Some(mounted) = self.pagination.as_mut().filter(|m| m.node == container) {
            mounted.bar = Some(*bar);
            self.display.insert(container, !bar.visible);
        }
    }

    fn scroll_to_top(&mut self) {
        self.scrolls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body><div id="content">
<input id="search-input" value="seed">
<p id="search-stats">loading</p>
<section class="daily-content">
  <div class="card__section" style="color: red; display:none">
    <h3 class="source-heading__name">CNN</h3>
    <article id="a1"><details><summary>One &amp; only</summary></details></article>
  </div>
</section>
<script>if (a < b) {}</script>
</div></body></html>"#;

    #[test]
    fn test_query_all_in_document_order() {
        let html = Html::parse_document(PAGE);
        let page = HtmlPage::new(&html);
        let articles = page.query_all(None, "article");
        assert_eq!(articles.len(), 1);
        assert_eq!(page.attribute(articles[0], "id").as_deref(), Some("a1"));
    }

    #[test]
    fn test_scoped_query_and_closest() {
        let html = Html::parse_document(PAGE);
        let page = HtmlPage::new(&html);
        let article = page.element_by_id("a1").unwrap();
        let group = page.closest(article, ".card__section").unwrap();
        let heading = page.query(group, ".source-heading__name").unwrap();
        assert_eq!(page.text_content(heading), "CNN");
        assert_eq!(page.closest(article, "article"), Some(article));
        assert_eq!(page.closest(article, ".missing"), None);
        assert!(page.query(group, ".card__section").is_none());
    }

    #[test]
    fn test_bad_selector_matches_nothing() {
        let html = Html::parse_document(PAGE);
        let page = HtmlPage::new(&html);
        assert!(page.query_all(None, "[[").is_empty());
    }

    #[test]
    fn test_inline_style_and_overrides() {
        let html = Html::parse_document(PAGE);
        let mut page = HtmlPage::new(&html);
        let article = page.element_by_id("a1").unwrap();
        let group = page.closest(article, ".card__section").unwrap();
        assert!(page.is_hidden(group));
        assert!(!page.is_rendered(article));
        page.set_hidden(group, false);
        assert!(!page.is_hidden(group));
        assert!(page.is_rendered(article));
    }

    #[test]
    fn test_input_value_and_text_writes() {
        let html = Html::parse_document(PAGE);
        let mut page = HtmlPage::new(&html);
        let input = page.element_by_id("search-input").unwrap();
        assert_eq!(page.input_value(input), "seed");
        page.set_input_value(input, "climate");
        assert_eq!(page.input_value(input), "climate");

        let stats = page.element_by_id("search-stats").unwrap();
        page.set_text(stats, "Found 1 articles, showing 1-1");
        assert_eq!(page.text_content(stats), "Found 1 articles, showing 1-1");
    }

    #[test]
    fn test_to_html_applies_writes() {
        let html = Html::parse_document(PAGE);
        let mut page = HtmlPage::new(&html);
        let article = page.element_by_id("a1").unwrap();
        let group = page.closest(article, ".card__section").unwrap();
        let details = page.query(article, "details").unwrap();
        let stats = page.element_by_id("search-stats").unwrap();
        let input = page.element_by_id("search-input").unwrap();
        let root = page.element_by_id("content").unwrap();

        page.set_hidden(group, false);
        page.set_hidden(article, true);
        page.set_open(details, true);
        page.set_text(stats, "Found <1>");
        page.set_input_value(input, "a \"b\"");
        let pager = page.mount_pagination(root, "pagination-controls").unwrap();
        page.render_pagination(
            pager,
            &PaginationBar {
                page: 1,
                total_pages: 2,
                visible: true,
                prev_disabled: true,
                next_disabled: false,
            },
        );

        let out = page.to_html();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains(r#"<div class="card__section" style="color: red">"#));
        assert!(out.contains(r#"<article id="a1" style="display: none">"#));
        assert!(out.contains("<details open=\"\">"));
        assert!(out.contains("<p id=\"search-stats\">Found &lt;1&gt;</p>"));
        assert!(out.contains(r#"value="a &quot;b&quot;""#));
        assert!(out.contains("One &amp; only"));
        assert!(out.contains("if (a < b) {}"));
        assert!(out.contains(r#"<div id="pagination-controls" class="pagination-controls" style="display: flex">"#));
        assert!(out.contains(r#"data-page-action="prev" disabled="">← Previous</button>"#));
        assert!(out.contains(r#"data-page-action="next">Next →</button>"#));
        assert!(out.contains("<span class=\"pagination-info\">Page 1 of 2</span>"));
        assert!(!out.contains("<input id=\"search-input\" value=\"seed\""));
        assert!(!out.contains("</input>"));
    }

    #[test]
    fn test_to_html_keeps_foreign_attributes() {
        let html = Html::parse_document(
            r##"<html><body><p id="search-stats"></p><svg viewBox="0 0 8 8"><use xlink:href="#icon"></use></svg></body></html>"##,
        );
        let mut page = HtmlPage::new(&html);
        let stats = page.element_by_id("search-stats").unwrap();
        page.set_text(stats, "Found 0 articles");

        let out = page.to_html();
        assert!(out.contains(r##"<use xlink:href="#icon">"##));
        assert!(out.contains(r#"viewBox="0 0 8 8""#));
        assert!(out.contains("Found 0 articles"));
    }

    #[test]
    fn test_to_html_leaves_parsed_page_untouched() {
        let html = Html::parse_document(PAGE);
        let before = html.html();
        let mut page = HtmlPage::new(&html);
        let article = page.element_by_id("a1").unwrap();
        page.set_hidden(article, true);
        let stats = page.element_by_id("search-stats").unwrap();
        page.set_text(stats, "Found 1 articles, showing 1-1");

        assert_ne!(page.to_html(), before);
        assert_eq!(html.html(), before);
        assert!(!page.is_hidden(page.element_by_id("search-input").unwrap()));
    }

    #[test]
    fn test_handles_are_stable_across_lookups() {
        let html = Html::parse_document(PAGE);
        let page = HtmlPage::new(&html);
        let by_id = page.element_by_id("a1").unwrap();
        let by_query = page.query_all(None, "#a1");
        assert_eq!(by_query, vec![by_id]);

        let details = page.query(by_id, "details").unwrap();
        assert_eq!(page.closest(details, "article"), Some(by_id));
        let group = page.closest(by_id, ".card__section").unwrap();
        assert_eq!(page.query_all(Some(group), "article"), vec![by_id]);
    }

    #[test]
    fn test_pagination_container_is_addressable() {
        let html = Html::parse_document(PAGE);
        let mut page = HtmlPage::new(&html);
        let root = page.element_by_id("content").unwrap();
        let pager = page.mount_pagination(root, "pagination-controls").unwrap();
        assert_eq!(page.element_by_id("pagination-controls"), Some(pager));
        assert_eq!(page.mount_pagination(root, "pagination-controls"), Some(pager));
        page.render_pagination(pager, &PaginationBar::hidden());
        assert!(page.is_hidden(pager));
        assert_eq!(page.text_content(pager), "");
    }
}
