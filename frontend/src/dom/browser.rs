use log::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlAnchorElement, HtmlDocument, HtmlElement, HtmlTextAreaElement};

use super::set_style;
use crate::error::Error;
use crate::schedule::SharedScheduler;
use crate::utils::{document, window};
use crate::whatsapp::opener::BrowserHost;

/// How long the temporary anchor stays in the document after the click.
pub const ANCHOR_CLEANUP_MS: u32 = 100;

pub struct DomBrowserHost {
    scheduler: SharedScheduler,
}

impl DomBrowserHost {
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self { scheduler }
    }

    fn body() -> Result<HtmlElement, Error> {
        document()?.body().ok_or(Error::MissingElement("body"))
    }

    /// Hidden textarea + `execCommand("copy")` for insecure contexts.
    fn copy_with_textarea(text: &str) -> Result<(), Error> {
        let doc = document()?;
        let area: HtmlTextAreaElement = doc
            .create_element("textarea")?
            .dyn_into()
            .map_err(|_| Error::MissingElement("textarea"))?;
        area.set_value(text);
        set_style(&area, "position", "fixed");
        set_style(&area, "left", "-999999px");
        set_style(&area, "top", "-999999px");

        Self::body()?.append_child(&area)?;
        let _ = area.focus();
        area.select();
        let copied = doc
            .dyn_into::<HtmlDocument>()
            .map_err(|_| Error::MissingElement("html document"))
            .and_then(|html| Ok(html.exec_command("copy")?));
        area.remove();
        copied.map(|_| ())
    }
}

impl BrowserHost for DomBrowserHost {
    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<bool, Error> {
        let opened = window()?.open_with_url_and_target_and_features(url, target, features)?;
        Ok(opened.is_some())
    }

    fn click_temporary_anchor(&self, url: &str) -> Result<(), Error> {
        let anchor: HtmlAnchorElement = document()?
            .create_element("a")?
            .dyn_into()
            .map_err(|_| Error::MissingElement("anchor"))?;
        anchor.set_href(url);
        anchor.set_target("_blank");
        anchor.set_rel("noopener noreferrer");

        Self::body()?.append_child(&anchor)?;
        anchor.click();

        self.scheduler
            .schedule(ANCHOR_CLEANUP_MS, Box::new(move || anchor.remove()))
            .detach();
        info!("WhatsApp link clicked");
        Ok(())
    }

    fn copy_to_clipboard(&self, text: &str) {
        let Ok(window) = window() else {
            return;
        };
        if window.is_secure_context() {
            let promise = window.navigator().clipboard().write_text(text);
            spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => info!("Link copied to clipboard"),
                    Err(e) => error!("Copy failed: {}", Error::from(e)),
                }
            });
        } else {
            match Self::copy_with_textarea(text) {
                Ok(()) => info!("Link copied (fallback)"),
                Err(e) => error!("Copy failed: {}", e),
            }
        }
    }

    fn confirm(&self, message: &str) -> bool {
        window()
            .and_then(|w| Ok(w.confirm_with_message(message)?))
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Ok(window) = window() {
            let _ = window.alert_with_message(message);
        }
    }
}
