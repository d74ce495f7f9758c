use std::rc::Rc;

use log::{debug, info};

use crate::form::{ButtonControl, FieldSet};
use crate::schedule::SharedScheduler;

pub const SENDING_LABEL: &str = "Sending...";
pub const SENDING_DELAY_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed; the first one was focused.
    Invalid,
    /// The button shows the sending label; native submission follows.
    Sending,
    /// Valid, but the form has no submit button to drive.
    NoButton,
}

/// The plain contact form. Valid submissions are handed to the browser's
/// native form submission after a short "sending" state.
pub struct ContactForm {
    fields: Rc<FieldSet>,
    button: Option<Rc<dyn ButtonControl>>,
    native_submit: Rc<dyn Fn()>,
    scheduler: SharedScheduler,
}

impl ContactForm {
    pub fn new(
        fields: FieldSet,
        button: Option<Rc<dyn ButtonControl>>,
        native_submit: Rc<dyn Fn()>,
        scheduler: SharedScheduler,
    ) -> Rc<Self> {
        Rc::new(Self {
            fields: Rc::new(fields),
            button,
            native_submit,
            scheduler,
        })
    }

    pub fn fields(&self) -> &Rc<FieldSet> {
        &self.fields
    }

    pub fn handle_submit(&self) -> SubmitOutcome {
        if !self.fields.validate_all(false) {
            if let Some(field) = self.fields.first_error() {
                field.focus();
            }
            debug!("Contact form has invalid fields");
            return SubmitOutcome::Invalid;
        }

        let Some(button) = self.button.clone() else {
            return SubmitOutcome::NoButton;
        };

        let original = button.content();
        button.set_content(SENDING_LABEL);
        button.set_disabled(true);

        let submit = Rc::clone(&self.native_submit);
        self.scheduler
            .schedule(
                SENDING_DELAY_MS,
                Box::new(move || {
                    button.set_content(&original);
                    button.set_disabled(false);
                    info!("Submitting contact form");
                    submit();
                }),
            )
            .detach();
        SubmitOutcome::Sending
    }
}
