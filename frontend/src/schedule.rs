//! Timer abstraction. Every timed sequence in the crate (loader steps, button
//! phases, debounced listeners, form reset) goes through a [`Scheduler`], so
//! the sequences can be driven by a manual clock in tests.

use std::rc::Rc;

use gloo_timers::callback::Timeout;

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> ScheduledTask;
}

pub type SharedScheduler = Rc<dyn Scheduler>;

/// Backend-specific side of a scheduled task.
pub trait TaskHandle {
    fn cancel(self: Box<Self>);
    fn detach(self: Box<Self>);
}

/// A pending callback. Dropping it cancels the callback, like a gloo
/// `Timeout`; call [`ScheduledTask::detach`] to let it run regardless.
#[must_use = "dropping a ScheduledTask cancels it"]
pub struct ScheduledTask {
    handle: Option<Box<dyn TaskHandle>>,
}

impl ScheduledTask {
    pub fn new(handle: impl TaskHandle + 'static) -> Self {
        Self {
            handle: Some(Box::new(handle)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    pub fn detach(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.detach();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

/// `setTimeout` through gloo.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooScheduler;

impl TaskHandle for Timeout {
    fn cancel(self: Box<Self>) {
        let _ = (*self).cancel();
    }

    fn detach(self: Box<Self>) {
        let _ = (*self).forget();
    }
}

impl Scheduler for GlooScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> ScheduledTask {
        ScheduledTask::new(Timeout::new(delay_ms, callback))
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::manual::ManualScheduler;
    use super::*;

    #[test]
    fn tasks_fire_in_due_order() {
        let clock = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, "c"), (10, "a"), (10, "b")] {
            let log = log.clone();
            clock
                .schedule(delay, Box::new(move || log.borrow_mut().push(tag)))
                .detach();
        }
        clock.advance(20);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        clock.advance(10);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn dropping_a_task_cancels_it() {
        let clock = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        {
            let fired = fired.clone();
            let _task = clock.schedule(5, Box::new(move || *fired.borrow_mut() = true));
        }
        clock.advance(10);
        assert!(!*fired.borrow());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn nested_tasks_inside_the_window_run() {
        let clock = ManualScheduler::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let inner_clock = clock.clone();
        let inner_hits = hits.clone();
        clock
            .schedule(
                10,
                Box::new(move || {
                    inner_hits.borrow_mut().push(inner_clock.now());
                    let hits = inner_hits.clone();
                    let at = inner_clock.clone();
                    inner_clock
                        .schedule(10, Box::new(move || hits.borrow_mut().push(at.now())))
                        .detach();
                }),
            )
            .detach();
        clock.advance(25);
        assert_eq!(*hits.borrow(), vec![10, 20]);
        assert_eq!(clock.now(), 25);
    }
}
