//! The WhatsApp contact form: validate, build the message, turn it into a
//! `wa.me` deep link and open it.

pub mod animation;
pub mod link;
pub mod message;
pub mod opener;

use std::rc::Rc;

use log::{debug, info};

use crate::form::{ButtonControl, FieldSet};
use crate::schedule::SharedScheduler;

use animation::ButtonAnimation;
use link::WhatsAppLink;
use message::{FormSnapshot, MessageTemplate, WhatsAppMessage};
use opener::LinkOpener;

/// Time between the open attempt and clearing the form.
pub const RESET_DELAY_MS: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the first bad field was focused.
    Invalid,
    /// The link is being opened.
    Sending(WhatsAppLink),
    /// A previous submission is still animating.
    Busy,
}

pub struct WhatsAppForm {
    fields: Rc<FieldSet>,
    animation: Option<ButtonAnimation>,
    opener: Rc<LinkOpener>,
    scheduler: SharedScheduler,
    number: String,
    template: MessageTemplate,
}

impl WhatsAppForm {
    pub fn new(
        fields: FieldSet,
        button: Option<Rc<dyn ButtonControl>>,
        opener: LinkOpener,
        scheduler: SharedScheduler,
        number: impl Into<String>,
        template: MessageTemplate,
    ) -> Rc<Self> {
        Rc::new(Self {
            fields: Rc::new(fields),
            animation: button.map(|b| ButtonAnimation::new(b, scheduler.clone())),
            opener: Rc::new(opener),
            scheduler,
            number: number.into(),
            template,
        })
    }

    pub fn fields(&self) -> &Rc<FieldSet> {
        &self.fields
    }

    pub fn handle_submit(&self) -> SubmitOutcome {
        if !self.fields.validate_all(true) {
            if let Some(field) = self.fields.first_error() {
                field.focus();
                field.scroll_into_view();
            }
            debug!("WhatsApp form has invalid fields");
            return SubmitOutcome::Invalid;
        }

        let snapshot = FormSnapshot::read(&self.fields);
        let message = WhatsAppMessage::build(&snapshot, &self.template);
        let link = WhatsAppLink::new(&self.number, &message);
        info!("WhatsApp link for {}: {}", link.number(), link);
        debug!("Raw message: {}", message);

        let send = {
            let url = link.to_string();
            let opener = Rc::clone(&self.opener);
            let fields = Rc::clone(&self.fields);
            let scheduler = Rc::clone(&self.scheduler);
            move || {
                let outcome = opener.open(&url);
                debug!("Open outcome: {:?}", outcome);
                scheduler
                    .schedule(RESET_DELAY_MS, Box::new(move || fields.reset()))
                    .detach();
            }
        };

        match &self.animation {
            Some(animation) => {
                if !animation.run(send) {
                    return SubmitOutcome::Busy;
                }
            }
            None => send(),
        }
        SubmitOutcome::Sending(link)
    }
}
