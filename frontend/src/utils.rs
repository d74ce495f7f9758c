use std::cell::RefCell;

use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use crate::error::{describe_js, Error};
use crate::schedule::{ScheduledTask, SharedScheduler};

pub fn window() -> Result<Window, Error> {
    web_sys::window().ok_or(Error::MissingElement("window"))
}

pub fn document() -> Result<Document, Error> {
    window()?.document().ok_or(Error::MissingElement("document"))
}

fn selector_error(selector: &str, err: JsValue) -> Error {
    Error::Selector {
        selector: selector.to_string(),
        message: describe_js(&err),
    }
}

fn first(selector: &str, found: Result<Option<Element>, JsValue>) -> Option<Element> {
    match found.map_err(|e| selector_error(selector, e)) {
        Ok(found) => found,
        Err(e) => {
            warn!("Selection error: {}", e);
            None
        }
    }
}

fn all(selector: &str, found: Result<NodeList, JsValue>) -> Vec<Element> {
    match found.map_err(|e| selector_error(selector, e)) {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(e) => {
            warn!("Multiple selection error: {}", e);
            Vec::new()
        }
    }
}

/// First element matching `selector` in the document. Bad selectors are
/// logged and treated as no match.
pub fn query(selector: &str) -> Option<Element> {
    let doc = document().ok()?;
    first(selector, doc.query_selector(selector))
}

pub fn query_within(root: &Element, selector: &str) -> Option<Element> {
    first(selector, root.query_selector(selector))
}

pub fn query_all(selector: &str) -> Vec<Element> {
    match document() {
        Ok(doc) => all(selector, doc.query_selector_all(selector)),
        Err(_) => Vec::new(),
    }
}

pub fn query_all_within(root: &Element, selector: &str) -> Vec<Element> {
    all(selector, root.query_selector_all(selector))
}

pub fn query_html(selector: &str) -> Option<HtmlElement> {
    query(selector).and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .map(|mql| mql.matches())
        .unwrap_or(false)
}

pub fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Trailing-edge debounce owned by whoever registers the listener. Each
/// `trigger` replaces the pending call, so only the last call of a quiet
/// window runs.
pub struct Debouncer {
    scheduler: SharedScheduler,
    wait_ms: u32,
    pending: RefCell<Option<ScheduledTask>>,
}

impl Debouncer {
    pub fn new(scheduler: SharedScheduler, wait_ms: u32) -> Self {
        Self {
            scheduler,
            wait_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn trigger(&self, f: impl FnOnce() + 'static) {
        let task = self.scheduler.schedule(self.wait_ms, Box::new(f));
        let previous = self.pending.replace(Some(task));
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Drops the pending call, if any.
    pub fn dispose(&self) {
        let pending = self.pending.borrow_mut().take();
        if let Some(task) = pending {
            task.cancel();
        }
    }
}
