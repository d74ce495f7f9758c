//! Startup: wait for the document, mount every component, install the
//! window-wide diagnostics.

use std::rc::Rc;

use log::{error, info};
use web_sys::{ErrorEvent, Event, PromiseRejectionEvent};

use crate::config::SiteConfig;
use crate::dom::{self, listen, listen_once};
use crate::error::{describe_js, Error};
use crate::schedule::{GlooScheduler, SharedScheduler};
use crate::utils;

/// Runs [`run`] now, or on `DOMContentLoaded` if the document is still
/// loading.
pub fn start() {
    let document = match utils::document() {
        Ok(document) => document,
        Err(e) => {
            error!("Cannot start: {}", e);
            return;
        }
    };

    if document.ready_state() == "loading" {
        if let Err(e) = listen_once(&document, "DOMContentLoaded", |_| run()) {
            error!("Cannot wait for DOMContentLoaded: {}", e);
        }
    } else {
        run();
    }
}

/// Mounts a component, logging instead of propagating a failure so the
/// remaining components still get their turn.
fn mount<T>(name: &str, init: impl FnOnce() -> Result<T, Error>) -> Option<T> {
    match init() {
        Ok(component) => Some(component),
        Err(e) => {
            error!("Failed to initialize {}: {}", name, e);
            None
        }
    }
}

pub fn run() {
    info!("Initializing portfolio");
    let config = SiteConfig::load();
    let scheduler: SharedScheduler = Rc::new(GlooScheduler);

    // Components stay alive through the listeners that capture them.
    let loader = mount("loader", || {
        Ok(dom::loader::mount(&config, scheduler.clone()))
    });
    let navigation = mount("navigation", || {
        dom::navigation::mount(&config, scheduler.clone())
    });
    let contact = mount("contact form", || {
        dom::forms::mount_contact_form(scheduler.clone())
    });
    let whatsapp = mount("whatsapp form", || {
        dom::forms::mount_whatsapp_form(&config, scheduler.clone())
    });

    info!(
        "Mounted: loader={} navigation={} contact={} whatsapp={}",
        matches!(loader, Some(Some(_))),
        navigation.is_some(),
        matches!(contact, Some(Some(_))),
        matches!(whatsapp, Some(Some(_))),
    );

    if let Err(e) = install_global_listeners() {
        error!("Failed to install global listeners: {}", e);
    }
    info!("Application initialized");
}

fn install_global_listeners() -> Result<(), Error> {
    let window = utils::window()?;

    listen(&window, "error", |event: ErrorEvent| {
        let detail = event.error();
        if detail.is_undefined() || detail.is_null() {
            error!("JavaScript error: {}", event.message());
        } else {
            error!("JavaScript error: {}", describe_js(&detail));
        }
    })?;

    listen(&window, "unhandledrejection", |event: PromiseRejectionEvent| {
        error!("Unhandled promise rejection: {}", describe_js(&event.reason()));
    })?;

    listen(&window, "load", |_: Event| {
        if let Some(performance) = web_sys::window().and_then(|w| w.performance()) {
            info!("Page loaded in {}ms", performance.now().round());
        }
    })?;

    Ok(())
}
