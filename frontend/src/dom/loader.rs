use std::rc::Rc;

use web_sys::HtmlElement;

use super::{set_attr, set_style};
use crate::config::SiteConfig;
use crate::loader::{Loader, LoaderView};
use crate::schedule::SharedScheduler;
use crate::utils::{prefers_reduced_motion, query, query_html};

pub const LOADER_SELECTOR: &str = ".modern-loader";
pub const LOADING_TEXT_SELECTOR: &str = ".loading-text";

const FADE_TRANSITION: &str = "opacity 0.8s ease-out, visibility 0.8s ease-out";

pub struct DomLoaderView {
    element: HtmlElement,
}

impl DomLoaderView {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl LoaderView for DomLoaderView {
    fn show(&self) {
        set_style(&self.element, "opacity", "1");
        set_style(&self.element, "visibility", "visible");
        set_attr(&self.element, "aria-hidden", "false");
    }

    fn set_step_label(&self, label: &str) {
        if let Some(text) = query(LOADING_TEXT_SELECTOR) {
            text.set_text_content(Some(label));
        }
    }

    fn hide(&self, animate: bool) {
        if animate {
            set_style(&self.element, "transition", FADE_TRANSITION);
        }
        set_style(&self.element, "opacity", "0");
        set_style(&self.element, "visibility", "hidden");
        set_attr(&self.element, "aria-hidden", "true");
    }

    fn remove(&self) {
        self.element.remove();
    }
}

pub fn mount(config: &SiteConfig, scheduler: SharedScheduler) -> Option<Rc<Loader>> {
    let view = query_html(LOADER_SELECTOR)
        .map(|el| Rc::new(DomLoaderView::new(el)) as Rc<dyn LoaderView>);
    Loader::attach(
        view,
        scheduler,
        Box::new(prefers_reduced_motion),
        config.loader_duration_ms,
    )
}
