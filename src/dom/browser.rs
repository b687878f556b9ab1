//! Live browser document and location through `web-sys`.
//!
//! Only compiled for `wasm32` with the `browser` feature. [`start`] is the
//! page entry point: it binds a [`NewsSearch`] to the current document, runs
//! the start-up sequence and wires the `input` event of the search box and
//! the clicks of the pagination buttons.
//!
//! Element handles are indices into an arena of `web_sys::Element`s that
//! grows as elements are first seen. A JS `Map` from element to index makes
//! the lookup of an already seen element constant time.

use super::Dom;
use crate::config::SearchConfig;
use crate::paginator::{NEXT_LABEL, PREV_LABEL, PaginationBar};
use crate::search::NewsSearch;
use crate::url_sync::Location;
use js_sys::Map;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlDetailsElement, HtmlElement,
    HtmlInputElement, NodeList, ScrollBehavior, ScrollToOptions, Window,
};

/// Attribute naming the action of a pagination button.
const PAGE_ACTION_ATTR: &str = "data-page-action";

/// The browser document.
#[derive(Debug)]
pub struct BrowserDom {
    window: Window,
    document: Document,
    arena: RefCell<Vec<Element>>,
    handles: Map,
}

impl BrowserDom {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            arena: RefCell::new(Vec::new()),
            handles: Map::new(),
        }
    }

    fn intern(&self, element: Element) -> usize {
        if let Some(known) = self.handles.get(&element).as_f64() {
            return known as usize;
        }
        let mut arena = self.arena.borrow_mut();
        let handle = arena.len();
        self.handles.set(&element, &JsValue::from_f64(handle as f64));
        arena.push(element);
        handle
    }

    /// The element behind a handle.
    pub fn element(&self, node: usize) -> Option<Element> {
        self.arena.borrow().get(node).cloned()
    }

    fn html_element(&self, node: usize) -> Option<HtmlElement> {
        self.element(node)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn collect(&self, list: Result<NodeList, JsValue>) -> Vec<usize> {
        let Ok(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect()
    }

    fn draw_bar(&self, container: &HtmlElement, bar: &PaginationBar) -> Result<(), JsValue> {
        container.style().set_property("display", "flex")?;
        container.set_inner_html("");

        let prev = self.button("prev", PREV_LABEL, bar.prev_disabled)?;
        container.append_child(&prev)?;

        let info = self.document.create_element("span")?;
        info.set_class_name("pagination-info");
        info.set_text_content(Some(&bar.label()));
        container.append_child(&info)?;

        let next = self.button("next", NEXT_LABEL, bar.next_disabled)?;
        container.append_child(&next)?;
        Ok(())
    }

    fn button(&self, action: &str, label: &str, disabled: bool) -> Result<HtmlButtonElement, JsValue> {
        let button = self
            .document
            .create_element("button")?
            .dyn_into::<HtmlButtonElement>()
            .map_err(JsValue::from)?;
        button.set_class_name("pagination-button");
        button.set_attribute(PAGE_ACTION_ATTR, action)?;
        button.set_text_content(Some(label));
        button.set_disabled(disabled);
        Ok(button)
    }
}

impl Dom for BrowserDom {
    type Node = usize;

    fn query_all(&self, scope: Option<usize>, selector: &str) -> Vec<usize> {
        match scope {
            None => self.collect(self.document.query_selector_all(selector)),
            Some(scope) => match self.element(scope) {
                Some(element) => self.collect(element.query_selector_all(selector)),
                None => Vec::new(),
            },
        }
    }

    fn closest(&self, node: usize, selector: &str) -> Option<usize> {
        let found = self.element(node)?.closest(selector).ok().flatten()?;
        Some(self.intern(found))
    }

    fn element_by_id(&self, id: &str) -> Option<usize> {
        let element = self.document.get_element_by_id(id)?;
        Some(self.intern(element))
    }

    fn text_content(&self, node: usize) -> String {
        self.element(node)
            .and_then(|element| element.text_content())
            .unwrap_or_default()
    }

    fn attribute(&self, node: usize, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn is_hidden(&self, node: usize) -> bool {
        self.html_element(node)
            .and_then(|element| element.style().get_property_value("display").ok())
            .is_some_and(|display| display == "none")
    }

    fn set_hidden(&mut self, node: usize, hidden: bool) {
        if let Some(element) = self.html_element(node) {
            let display = if hidden { "none" } else { "" };
            if let Err(e) = element.style().set_property("display", display) {
                warn!(error = ?e, "Failed to set display");
            }
        }
    }

    fn set_open(&mut self, node: usize, open: bool) {
        if let Some(details) = self
            .element(node)
            .and_then(|element| element.dyn_into::<HtmlDetailsElement>().ok())
        {
            details.set_open(open);
        }
    }

    fn set_text(&mut self, node: usize, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn input_value(&self, node: usize) -> String {
        self.element(node)
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, node: usize, value: &str) {
        if let Some(input) = self
            .element(node)
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(value);
        }
    }

    fn mount_pagination(&mut self, root: usize, id: &str) -> Option<usize> {
        if let Some(existing) = self.document.get_element_by_id(id) {
            return Some(self.intern(existing));
        }
        let root = self.element(root)?;
        let container = self.document.create_element("div").ok()?;
        container.set_id(id);
        container.set_class_name("pagination-controls");
        root.append_child(&container).ok()?;
        Some(self.intern(container))
    }

    fn render_pagination(&mut self, container: usize, bar: &PaginationBar) {
        let Some(element) = self.html_element(container) else {
            return;
        };
        let drawn = if bar.visible {
            self.draw_bar(&element, bar)
        } else {
            element.style().set_property("display", "none")
        };
        if let Err(e) = drawn {
            warn!(error = ?e, "Failed to render pagination controls");
        }
    }

    fn scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

/// The browser location and history.
#[derive(Debug, Clone)]
pub struct BrowserLocation {
    window: Window,
}

impl BrowserLocation {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Location for BrowserLocation {
    fn hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_hash(&mut self, fragment: &str) {
        if let Err(e) = self.window.location().set_hash(fragment) {
            warn!(error = ?e, "Failed to set location hash");
        }
    }

    fn clear_hash(&mut self) {
        let Ok(href) = self.window.location().href() else {
            return;
        };
        let base = href.split('#').next().unwrap_or_default();
        let replaced = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(base)));
        if let Err(e) = replaced {
            warn!(error = ?e, "Failed to clear location hash");
        }
    }
}

type BrowserSearch = NewsSearch<BrowserDom, BrowserLocation>;

/// Bind the search component to the current page.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let dom = BrowserDom::new(window.clone(), document);
    let location = BrowserLocation::new(window);
    let search = NewsSearch::attach(dom, location, SearchConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let search: Rc<RefCell<BrowserSearch>> = Rc::new(RefCell::new(search));
    search.borrow_mut().init();

    let (input, pager) = {
        let search = search.borrow();
        let input = search.handles().input.and_then(|n| search.dom().element(n));
        let pager = search.pagination().and_then(|n| search.dom().element(n));
        (input, pager)
    };

    if let Some(input) = input {
        let handler = Rc::clone(&search);
        let on_input = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            handler.borrow_mut().handle_input();
        });
        input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }

    if let Some(pager) = pager {
        let handler = Rc::clone(&search);
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let action = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.get_attribute(PAGE_ACTION_ATTR));
            let mut search = handler.borrow_mut();
            match action.as_deref() {
                Some("prev") => {
                    search.prev_page();
                }
                Some("next") => {
                    search.next_page();
                }
                _ => {}
            }
        });
        pager.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    Ok(())
}
