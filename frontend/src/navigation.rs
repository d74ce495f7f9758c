use std::cell::Cell;
use std::rc::Rc;

use log::info;

use crate::config::SiteConfig;
use crate::schedule::SharedScheduler;
use crate::utils::Debouncer;

/// An in-page navigation anchor.
pub trait NavLink {
    /// Section id this link points at (`href="#id"` without the `#`).
    fn target_id(&self) -> Option<String>;
    fn set_active(&self, active: bool);
}

/// Page geometry the controller reads and the scroll it drives.
pub trait NavigationView {
    fn sections(&self) -> Vec<SectionBounds>;
    /// Document offset of the element with `id`, if it exists.
    fn target_top(&self, id: &str) -> Option<f64>;
    fn scroll_y(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64);
    fn viewport_width(&self) -> f64;
    /// Whether the header the mobile menu hangs off is present.
    fn has_header(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Section containing `position`. Sections are disjoint on a well-formed
/// page; if several match, the last one in document order wins.
pub fn section_at(sections: &[SectionBounds], position: f64) -> Option<&SectionBounds> {
    sections.iter().rev().find(|s| s.contains(position))
}

/// The nav links and which one is active. At most one link is active after
/// any call to [`ActiveLinks::activate`].
pub struct ActiveLinks {
    links: Vec<Rc<dyn NavLink>>,
    active: Cell<Option<usize>>,
}

impl ActiveLinks {
    pub fn new(links: Vec<Rc<dyn NavLink>>) -> Self {
        Self {
            links,
            active: Cell::new(None),
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rc<dyn NavLink>> {
        self.links.get(index)
    }

    pub fn active(&self) -> Option<usize> {
        self.active.get()
    }

    pub fn activate(&self, index: Option<usize>) {
        for link in &self.links {
            link.set_active(false);
        }
        let index = index.filter(|&i| i < self.links.len());
        if let Some(i) = index {
            self.links[i].set_active(true);
        }
        self.active.set(index);
    }

    pub fn index_of_target(&self, id: &str) -> Option<usize> {
        self.links
            .iter()
            .position(|link| link.target_id().as_deref() == Some(id))
    }
}

pub struct Navigation {
    links: ActiveLinks,
    view: Rc<dyn NavigationView>,
    scroll_offset: f64,
    mobile_breakpoint: f64,
    scroll_spy: Debouncer,
    resize: Debouncer,
    mobile_menu: Box<dyn Fn()>,
}

/// Default mobile-menu hook. The page has no mobile menu yet.
pub fn log_mobile_menu() {
    info!("Mobile menu enabled");
}

impl Navigation {
    pub fn new(
        links: Vec<Rc<dyn NavLink>>,
        view: Rc<dyn NavigationView>,
        scheduler: SharedScheduler,
        config: &SiteConfig,
        mobile_menu: Box<dyn Fn()>,
    ) -> Rc<Self> {
        Rc::new(Self {
            links: ActiveLinks::new(links),
            view,
            scroll_offset: config.scroll_offset,
            mobile_breakpoint: config.mobile_breakpoint,
            scroll_spy: Debouncer::new(scheduler.clone(), config.scroll_spy_debounce_ms),
            resize: Debouncer::new(scheduler, config.resize_debounce_ms),
            mobile_menu,
        })
    }

    pub fn links(&self) -> &ActiveLinks {
        &self.links
    }

    /// Smooth-scrolls to the section behind link `index` and activates the
    /// link. Links whose target does not exist are ignored; returns whether
    /// a scroll happened.
    pub fn on_link_click(&self, index: usize) -> bool {
        let Some(link) = self.links.get(index) else {
            return false;
        };
        let Some(top) = link
            .target_id()
            .and_then(|id| self.view.target_top(&id))
        else {
            return false;
        };
        self.view.smooth_scroll_to(top - self.scroll_offset);
        self.links.activate(Some(index));
        true
    }

    pub fn on_scroll(self: &Rc<Self>) {
        let nav = Rc::clone(self);
        self.scroll_spy.trigger(move || nav.sync_active_with_scroll());
    }

    /// Activates the link of the section under the header. Leaves the
    /// current state alone when no section (or no link for it) matches.
    pub fn sync_active_with_scroll(&self) {
        let position = self.view.scroll_y() + self.scroll_offset;
        let sections = self.view.sections();
        let Some(section) = section_at(&sections, position) else {
            return;
        };
        if let Some(index) = self.links.index_of_target(&section.id) {
            self.links.activate(Some(index));
        }
    }

    pub fn init_mobile(&self) {
        if self.view.has_header() && self.is_mobile() {
            (self.mobile_menu)();
        }
    }

    pub fn on_resize(self: &Rc<Self>) {
        let nav = Rc::clone(self);
        self.resize.trigger(move || {
            if nav.is_mobile() {
                (nav.mobile_menu)();
            }
        });
    }

    fn is_mobile(&self) -> bool {
        self.view.viewport_width() <= self.mobile_breakpoint
    }

    /// Cancels pending debounced work. Nothing calls this on a live page;
    /// the controller lives as long as the document.
    pub fn dispose(&self) {
        self.scroll_spy.dispose();
        self.resize.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::schedule::manual::ManualScheduler;

    struct FakeLink {
        target: String,
        active: Cell<bool>,
    }

    impl NavLink for FakeLink {
        fn target_id(&self) -> Option<String> {
            Some(self.target.clone())
        }

        fn set_active(&self, active: bool) {
            self.active.set(active);
        }
    }

    struct FakeView {
        sections: Vec<SectionBounds>,
        scroll_y: Cell<f64>,
        width: Cell<f64>,
        scrolled_to: RefCell<Vec<f64>>,
    }

    impl NavigationView for FakeView {
        fn sections(&self) -> Vec<SectionBounds> {
            self.sections.clone()
        }

        fn target_top(&self, id: &str) -> Option<f64> {
            self.sections.iter().find(|s| s.id == id).map(|s| s.top)
        }

        fn scroll_y(&self) -> f64 {
            self.scroll_y.get()
        }

        fn smooth_scroll_to(&self, top: f64) {
            self.scrolled_to.borrow_mut().push(top);
        }

        fn viewport_width(&self) -> f64 {
            self.width.get()
        }

        fn has_header(&self) -> bool {
            true
        }
    }

    fn section(id: &str, top: f64, height: f64) -> SectionBounds {
        SectionBounds {
            id: id.to_string(),
            top,
            height,
        }
    }

    struct Fixture {
        clock: ManualScheduler,
        links: Vec<Rc<FakeLink>>,
        view: Rc<FakeView>,
        nav: Rc<Navigation>,
        mobile_calls: Rc<Cell<u32>>,
    }

    fn fixture(targets: &[&str]) -> Fixture {
        let clock = ManualScheduler::new();
        let links: Vec<Rc<FakeLink>> = targets
            .iter()
            .map(|t| {
                Rc::new(FakeLink {
                    target: t.to_string(),
                    active: Cell::new(false),
                })
            })
            .collect();
        let view = Rc::new(FakeView {
            sections: vec![
                section("home", 0.0, 600.0),
                section("about", 600.0, 800.0),
                section("contact", 1400.0, 500.0),
            ],
            scroll_y: Cell::new(0.0),
            width: Cell::new(1280.0),
            scrolled_to: RefCell::new(Vec::new()),
        });
        let mobile_calls = Rc::new(Cell::new(0));
        let calls = mobile_calls.clone();
        let nav = Navigation::new(
            links.iter().map(|l| l.clone() as Rc<dyn NavLink>).collect(),
            view.clone(),
            Rc::new(clock.clone()),
            &SiteConfig::default(),
            Box::new(move || calls.set(calls.get() + 1)),
        );
        Fixture {
            clock,
            links,
            view,
            nav,
            mobile_calls,
        }
    }

    fn active_targets(links: &[Rc<FakeLink>]) -> Vec<&str> {
        links
            .iter()
            .filter(|l| l.active.get())
            .map(|l| l.target.as_str())
            .collect()
    }

    #[test]
    fn click_scrolls_below_the_header_and_activates() {
        let f = fixture(&["home", "about", "contact"]);
        assert!(f.nav.on_link_click(1));
        assert_eq!(*f.view.scrolled_to.borrow(), vec![520.0]);
        assert_eq!(active_targets(&f.links), vec!["about"]);
    }

    #[test]
    fn click_on_unknown_target_is_swallowed() {
        let f = fixture(&["home", "missing"]);
        f.nav.on_link_click(0);
        assert!(!f.nav.on_link_click(1));
        assert!(f.view.scrolled_to.borrow().len() == 1);
        assert_eq!(active_targets(&f.links), vec!["home"]);
    }

    #[test]
    fn at_most_one_link_is_active_and_it_is_the_latest() {
        let f = fixture(&["home", "about", "contact"]);
        for index in [2, 0, 1, 1] {
            f.nav.links().activate(Some(index));
            let active = active_targets(&f.links);
            assert_eq!(active.len(), 1);
            assert_eq!(active[0], f.links[index].target);
        }
        f.nav.links().activate(None);
        assert!(active_targets(&f.links).is_empty());
        f.nav.links().activate(Some(99));
        assert!(active_targets(&f.links).is_empty());
    }

    #[test]
    fn scroll_spy_is_debounced() {
        let f = fixture(&["home", "about", "contact"]);
        f.view.scroll_y.set(1330.0);
        f.nav.on_scroll();
        f.clock.advance(60);
        f.nav.on_scroll();
        f.clock.advance(60);
        assert!(active_targets(&f.links).is_empty());

        f.clock.advance(40);
        assert_eq!(active_targets(&f.links), vec!["contact"]);
    }

    #[test]
    fn scroll_outside_every_section_keeps_the_current_link() {
        let f = fixture(&["home", "about", "contact"]);
        f.nav.links().activate(Some(1));
        f.view.scroll_y.set(5000.0);
        f.nav.sync_active_with_scroll();
        assert_eq!(active_targets(&f.links), vec!["about"]);
    }

    #[test]
    fn overlapping_sections_resolve_to_the_last() {
        let sections = vec![section("a", 0.0, 500.0), section("b", 400.0, 500.0)];
        assert_eq!(section_at(&sections, 450.0).unwrap().id, "b");
        assert_eq!(section_at(&sections, 100.0).unwrap().id, "a");
        assert!(section_at(&sections, 900.0).is_none());
    }

    #[test]
    fn mobile_hook_runs_on_narrow_viewports() {
        let f = fixture(&["home"]);
        f.nav.init_mobile();
        assert_eq!(f.mobile_calls.get(), 0);

        f.view.width.set(768.0);
        f.nav.init_mobile();
        assert_eq!(f.mobile_calls.get(), 1);

        f.nav.on_resize();
        f.nav.on_resize();
        f.clock.advance(250);
        assert_eq!(f.mobile_calls.get(), 2);
    }
}
