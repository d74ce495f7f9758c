use std::cell::Cell;
use std::rc::Rc;

use crate::form::ButtonControl;
use crate::schedule::SharedScheduler;

pub const OPENING_CONTENT: &str = r#"<span class="whatsapp-icon">⏳</span> Opening WhatsApp..."#;
pub const SENT_CONTENT: &str = r#"<span class="whatsapp-icon">✅</span> Message sent!"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPhase {
    Idle,
    Opening,
    Sent,
}

impl ButtonPhase {
    /// How long the button stays in this phase before moving on.
    pub fn duration_ms(self) -> Option<u32> {
        match self {
            ButtonPhase::Idle => None,
            ButtonPhase::Opening => Some(1000),
            ButtonPhase::Sent => Some(2000),
        }
    }
}

/// Drives the WhatsApp button through `Idle → Opening → Sent → Idle`.
pub struct ButtonAnimation {
    button: Rc<dyn ButtonControl>,
    scheduler: SharedScheduler,
    phase: Rc<Cell<ButtonPhase>>,
}

impl ButtonAnimation {
    pub fn new(button: Rc<dyn ButtonControl>, scheduler: SharedScheduler) -> Self {
        Self {
            button,
            scheduler,
            phase: Rc::new(Cell::new(ButtonPhase::Idle)),
        }
    }

    pub fn phase(&self) -> ButtonPhase {
        self.phase.get()
    }

    /// Starts the animation; `on_sent` runs when the button switches to the
    /// sent phase. Ignored (returns false) while a run is in progress.
    pub fn run(&self, on_sent: impl FnOnce() + 'static) -> bool {
        if self.phase.get() != ButtonPhase::Idle {
            return false;
        }

        let original = self.button.content();
        self.button.set_content(OPENING_CONTENT);
        self.button.set_disabled(true);
        self.phase.set(ButtonPhase::Opening);

        let button = Rc::clone(&self.button);
        let phase = Rc::clone(&self.phase);
        let scheduler = Rc::clone(&self.scheduler);
        let opening = ButtonPhase::Opening.duration_ms().unwrap_or_default();
        self.scheduler
            .schedule(
                opening,
                Box::new(move || {
                    button.set_content(SENT_CONTENT);
                    phase.set(ButtonPhase::Sent);
                    on_sent();

                    let sent = ButtonPhase::Sent.duration_ms().unwrap_or_default();
                    scheduler
                        .schedule(
                            sent,
                            Box::new(move || {
                                button.set_content(&original);
                                button.set_disabled(false);
                                phase.set(ButtonPhase::Idle);
                            }),
                        )
                        .detach();
                }),
            )
            .detach();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::testing::FakeButton;
    use crate::schedule::manual::ManualScheduler;

    #[test]
    fn phases_and_restore() {
        let clock = ManualScheduler::new();
        let button = FakeButton::new("<b>Send</b>");
        let animation = ButtonAnimation::new(button.clone(), Rc::new(clock.clone()));
        let sent_at = Rc::new(Cell::new(None));

        let (at, probe) = (sent_at.clone(), clock.clone());
        assert!(animation.run(move || at.set(Some(probe.now()))));
        assert_eq!(animation.phase(), ButtonPhase::Opening);
        assert!(button.disabled.get());
        assert!(!animation.run(|| panic!("second run must be ignored")));

        clock.advance(1000);
        assert_eq!(sent_at.get(), Some(1000));
        assert_eq!(animation.phase(), ButtonPhase::Sent);
        assert_eq!(button.content(), SENT_CONTENT);

        clock.advance(2000);
        assert_eq!(animation.phase(), ButtonPhase::Idle);
        assert_eq!(button.content(), "<b>Send</b>");
        assert!(!button.disabled.get());
        assert_eq!(
            *button.history.borrow(),
            vec![OPENING_CONTENT, SENT_CONTENT, "<b>Send</b>"]
        );
    }
}
