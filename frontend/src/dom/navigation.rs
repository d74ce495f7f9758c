use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions};

use super::{listen, set_attr};
use crate::config::SiteConfig;
use crate::error::Error;
use crate::navigation::{log_mobile_menu, NavLink, Navigation, NavigationView, SectionBounds};
use crate::schedule::SharedScheduler;
use crate::utils::{self, query, query_all};

pub const NAV_LINK_SELECTOR: &str = r##"nav a[href^="#"]"##;
pub const SECTION_SELECTOR: &str = "section[id]";
pub const HEADER_SELECTOR: &str = ".dual-logo-header";

pub struct DomNavLink {
    element: Element,
}

impl NavLink for DomNavLink {
    fn target_id(&self) -> Option<String> {
        self.element
            .get_attribute("href")
            .and_then(|href| href.strip_prefix('#').map(str::to_string))
            .filter(|id| !id.is_empty())
    }

    fn set_active(&self, active: bool) {
        let classes = self.element.class_list();
        let updated = if active {
            classes.add_1("active")
        } else {
            classes.remove_1("active")
        };
        if let Err(e) = updated {
            warn!("Could not update nav link class: {}", Error::from(e));
        }
        set_attr(&self.element, "aria-current", if active { "page" } else { "false" });
    }
}

/// Sections are collected once, when the controller is mounted.
pub struct DomNavigationView {
    sections: Vec<HtmlElement>,
}

impl DomNavigationView {
    pub fn collect() -> Self {
        Self {
            sections: query_all(SECTION_SELECTOR)
                .into_iter()
                .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
                .collect(),
        }
    }
}

impl NavigationView for DomNavigationView {
    fn sections(&self) -> Vec<SectionBounds> {
        self.sections
            .iter()
            .map(|section| SectionBounds {
                id: section.id(),
                top: f64::from(section.offset_top()),
                height: f64::from(section.offset_height()),
            })
            .collect()
    }

    fn target_top(&self, id: &str) -> Option<f64> {
        utils::document()
            .ok()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
            .map(|el| f64::from(el.offset_top()))
    }

    fn scroll_y(&self) -> f64 {
        utils::window()
            .ok()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let Ok(window) = utils::window() else {
            return;
        };
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }

    fn viewport_width(&self) -> f64 {
        utils::viewport_width()
    }

    fn has_header(&self) -> bool {
        query(HEADER_SELECTOR).is_some()
    }
}

pub fn mount(config: &SiteConfig, scheduler: SharedScheduler) -> Result<Rc<Navigation>, Error> {
    let elements = query_all(NAV_LINK_SELECTOR);
    let links = elements
        .iter()
        .map(|el| {
            Rc::new(DomNavLink {
                element: el.clone(),
            }) as Rc<dyn NavLink>
        })
        .collect();

    let nav = Navigation::new(
        links,
        Rc::new(DomNavigationView::collect()),
        scheduler,
        config,
        Box::new(log_mobile_menu),
    );

    for (index, element) in elements.iter().enumerate() {
        let nav = Rc::clone(&nav);
        listen(element, "click", move |event: MouseEvent| {
            event.prevent_default();
            nav.on_link_click(index);
        })?;
    }

    let window = utils::window()?;
    {
        let nav = Rc::clone(&nav);
        listen(&window, "scroll", move |_: Event| nav.on_scroll())?;
    }

    nav.init_mobile();
    {
        let nav = Rc::clone(&nav);
        listen(&window, "resize", move |_: Event| nav.on_resize())?;
    }

    Ok(nav)
}
