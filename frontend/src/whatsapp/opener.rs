//! Opening the deep link. Browsers differ in what they allow from a click
//! handler, so the link is tried through an ordered list of strategies and
//! ends, if all of them fail, with a manual copy-and-paste fallback.

use std::rc::Rc;

use log::{error, info, warn};

use crate::error::Error;

pub const NEW_TAB_FEATURES: &str = "noopener,noreferrer,width=800,height=600";
pub const FALLBACK_WINDOW_NAME: &str = "whatsapp";
pub const FALLBACK_WINDOW_FEATURES: &str = "width=400,height=600,scrollbars=yes,resizable=yes";
pub const PASTE_INSTRUCTIONS: &str =
    "Please paste the copied link into your browser to open WhatsApp.";

/// Browser primitives the opener needs.
pub trait BrowserHost {
    /// `window.open`; `Ok(false)` when the browser returned no window.
    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<bool, Error>;
    /// Clicks a throwaway `<a target="_blank">` attached to the body.
    fn click_temporary_anchor(&self, url: &str) -> Result<(), Error>;
    /// Copies asynchronously; failures are logged by the host.
    fn copy_to_clipboard(&self, text: &str);
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Opened,
    /// The strategy ran but cannot tell whether anything opened.
    NoHandle,
}

pub trait OpenStrategy {
    fn name(&self) -> &'static str;
    fn attempt(&self, host: &dyn BrowserHost, url: &str) -> Result<Attempt, Error>;
}

/// `window.open` into a new tab.
pub struct NewTab;

impl OpenStrategy for NewTab {
    fn name(&self) -> &'static str {
        "new-tab"
    }

    fn attempt(&self, host: &dyn BrowserHost, url: &str) -> Result<Attempt, Error> {
        if host.open_window(url, "_blank", NEW_TAB_FEATURES)? {
            Ok(Attempt::Opened)
        } else {
            Ok(Attempt::NoHandle)
        }
    }
}

/// Programmatic click on a temporary anchor.
pub struct TemporaryAnchor;

impl OpenStrategy for TemporaryAnchor {
    fn name(&self) -> &'static str {
        "temporary-anchor"
    }

    fn attempt(&self, host: &dyn BrowserHost, url: &str) -> Result<Attempt, Error> {
        host.click_temporary_anchor(url)?;
        Ok(Attempt::Opened)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualOutcome {
    /// The user dismissed the prompt; the link is on the clipboard.
    Declined,
    Reopened,
    /// The last open failed and the user was told to paste the link.
    Alerted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened { strategy: &'static str },
    Manual(ManualOutcome),
}

pub struct LinkOpener {
    host: Rc<dyn BrowserHost>,
    strategies: Vec<Box<dyn OpenStrategy>>,
}

impl LinkOpener {
    pub fn new(host: Rc<dyn BrowserHost>, strategies: Vec<Box<dyn OpenStrategy>>) -> Self {
        Self { host, strategies }
    }

    /// New tab first, then the temporary anchor.
    pub fn with_default_strategies(host: Rc<dyn BrowserHost>) -> Self {
        Self::new(host, vec![Box::new(NewTab), Box::new(TemporaryAnchor)])
    }

    /// Tries each strategy in order and stops at the first that opens the
    /// link. An error from any strategy, or every strategy coming back
    /// without a handle, ends in the manual fallback.
    pub fn open(&self, url: &str) -> OpenOutcome {
        info!("Trying to open WhatsApp");
        for strategy in &self.strategies {
            match strategy.attempt(self.host.as_ref(), url) {
                Ok(Attempt::Opened) => {
                    info!("WhatsApp opened via {}", strategy.name());
                    return OpenOutcome::Opened {
                        strategy: strategy.name(),
                    };
                }
                Ok(Attempt::NoHandle) => {
                    warn!("{} returned no window, trying next strategy", strategy.name());
                }
                Err(e) => {
                    error!("Opening WhatsApp via {} failed: {}", strategy.name(), e);
                    return OpenOutcome::Manual(self.manual_fallback(url));
                }
            }
        }
        warn!("No strategy opened WhatsApp");
        OpenOutcome::Manual(self.manual_fallback(url))
    }

    fn manual_fallback(&self, url: &str) -> ManualOutcome {
        self.host.copy_to_clipboard(url);

        if !self.host.confirm(&manual_prompt(url)) {
            return ManualOutcome::Declined;
        }
        match self
            .host
            .open_window(url, FALLBACK_WINDOW_NAME, FALLBACK_WINDOW_FEATURES)
        {
            Ok(_) => ManualOutcome::Reopened,
            Err(e) => {
                error!("Last attempt to open WhatsApp failed: {}", e);
                self.host.alert(PASTE_INSTRUCTIONS);
                ManualOutcome::Alerted
            }
        }
    }
}

/// Instructions shown when the link could not be opened automatically.
pub fn manual_prompt(url: &str) -> String {
    let preview: String = url.chars().take(50).collect();
    format!(
        "📱 To open WhatsApp with your message:\n\n\
         1️⃣ The link has been copied automatically\n\
         2️⃣ Paste it into your browser\n\
         3️⃣ Or click \"OK\" then Ctrl+V\n\n\
         🔗 Link: {}...\n\n\
         Do you want me to try opening WhatsApp now?",
        preview
    )
}
