//! `web-sys` side of the components: element-backed implementations of the
//! view traits and the functions that find the elements and wire listeners.

pub mod browser;
pub mod forms;
pub mod loader;
pub mod navigation;

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, CssStyleDeclaration, Event, EventTarget, HtmlElement};

use crate::error::Error;

/// Adds a listener for the lifetime of the page. Events that are not an `E`
/// are ignored.
pub fn listen<E, F>(target: &EventTarget, event: &str, mut handler: F) -> Result<(), Error>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::wrap(Box::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    }) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Like [`listen`], removed by the browser after the first event.
pub fn listen_once<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), Error>
where
    F: FnOnce(Event) + 'static,
{
    let callback = Closure::once(handler);
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

pub(crate) fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let style: CssStyleDeclaration = element.style();
    if let Err(e) = style.set_property(property, value) {
        warn!("Could not set {}: {}", property, Error::from(e));
    }
}

pub(crate) fn set_attr(element: &web_sys::Element, name: &str, value: &str) {
    if let Err(e) = element.set_attribute(name, value) {
        warn!("Could not set {}: {}", name, Error::from(e));
    }
}
