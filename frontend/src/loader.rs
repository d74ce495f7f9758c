use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::schedule::SharedScheduler;

/// Delay between hiding the splash and detaching it, long enough for the
/// fade-out transition to finish.
pub const REMOVAL_DELAY_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingStep {
    pub label: &'static str,
    pub progress: u8,
}

pub const LOADING_STEPS: [LoadingStep; 4] = [
    LoadingStep { label: "Loading styles...", progress: 25 },
    LoadingStep { label: "Loading images...", progress: 50 },
    LoadingStep { label: "Initializing...", progress: 75 },
    LoadingStep { label: "Finishing...", progress: 100 },
];

pub trait LoaderView {
    fn show(&self);
    fn set_step_label(&self, label: &str);
    /// Hides the splash; `animate` is false when the user prefers reduced
    /// motion.
    fn hide(&self, animate: bool);
    fn remove(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    Hidden,
    Visible,
    FadingOut,
    Removed,
}

pub struct Loader {
    view: Rc<dyn LoaderView>,
    scheduler: SharedScheduler,
    reduced_motion: Box<dyn Fn() -> bool>,
    phase: Cell<LoaderPhase>,
    is_loaded: Cell<bool>,
    next_step: Cell<usize>,
}

impl Loader {
    pub fn new(
        view: Rc<dyn LoaderView>,
        scheduler: SharedScheduler,
        reduced_motion: Box<dyn Fn() -> bool>,
    ) -> Rc<Self> {
        Rc::new(Self {
            view,
            scheduler,
            reduced_motion,
            phase: Cell::new(LoaderPhase::Hidden),
            is_loaded: Cell::new(false),
            next_step: Cell::new(0),
        })
    }

    /// Shows the splash and starts the step sequence. A page without a
    /// splash gets a warning and nothing else.
    pub fn attach(
        view: Option<Rc<dyn LoaderView>>,
        scheduler: SharedScheduler,
        reduced_motion: Box<dyn Fn() -> bool>,
        duration_ms: u32,
    ) -> Option<Rc<Self>> {
        let Some(view) = view else {
            warn!("Loader not found");
            return None;
        };
        let loader = Self::new(view, scheduler, reduced_motion);
        loader.show_loader();
        loader.start_loading_sequence(duration_ms);
        Some(loader)
    }

    pub fn phase(&self) -> LoaderPhase {
        self.phase.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded.get()
    }

    pub fn show_loader(&self) {
        self.view.show();
        self.phase.set(LoaderPhase::Visible);
    }

    /// Plays the steps at `duration_ms / steps` intervals, then hides the
    /// splash one interval after the last label.
    pub fn start_loading_sequence(self: &Rc<Self>, duration_ms: u32) {
        let interval = duration_ms / LOADING_STEPS.len() as u32;
        self.schedule_step(interval);
    }

    fn schedule_step(self: &Rc<Self>, interval: u32) {
        let loader = Rc::clone(self);
        self.scheduler
            .schedule(interval, Box::new(move || loader.advance(interval)))
            .detach();
    }

    fn advance(self: &Rc<Self>, interval: u32) {
        let index = self.next_step.get();
        match LOADING_STEPS.get(index) {
            Some(step) => {
                debug!("Loading step {}: {} ({}%)", index + 1, step.label, step.progress);
                self.view.set_step_label(step.label);
                self.next_step.set(index + 1);
                self.schedule_step(interval);
            }
            None => {
                self.hide_loader();
            }
        }
    }

    /// Hides the splash and schedules its removal. Only the first call does
    /// anything; returns whether this call did.
    pub fn hide_loader(self: &Rc<Self>) -> bool {
        if self.is_loaded.replace(true) {
            return false;
        }

        self.view.hide(!(self.reduced_motion)());
        self.phase.set(LoaderPhase::FadingOut);

        let loader = Rc::clone(self);
        self.scheduler
            .schedule(
                REMOVAL_DELAY_MS,
                Box::new(move || {
                    loader.view.remove();
                    loader.phase.set(LoaderPhase::Removed);
                    info!("Loader removed");
                }),
            )
            .detach();
        true
    }
}
