use std::rc::Rc;

use log::{error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use super::browser::DomBrowserHost;
use super::{listen, set_attr, set_style};
use crate::config::SiteConfig;
use crate::contact_form::ContactForm;
use crate::error::Error;
use crate::form::{ButtonControl, FieldSet, FormField};
use crate::schedule::SharedScheduler;
use crate::utils::{self, query, query_all_within, query_within};
use crate::validation::{FieldKind, FieldSpec, RuleSet};
use crate::whatsapp::message::MessageTemplate;
use crate::whatsapp::opener::LinkOpener;
use crate::whatsapp::WhatsAppForm;

pub const CONTACT_FORM_SELECTOR: &str = "#contact form";
pub const WHATSAPP_FORM_SELECTOR: &str = "#whatsapp-form";
pub const WHATSAPP_BUTTON_SELECTOR: &str = ".whatsapp-btn";
pub const SUBMIT_BUTTON_SELECTOR: &str = r#"button[type="submit"]"#;
pub const FIELD_SELECTOR: &str = "input, textarea";
pub const ERROR_CLASS: &str = "error";
pub const ERROR_MESSAGE_SELECTOR: &str = ".error-message";

enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

pub struct DomField {
    control: Control,
    element: HtmlElement,
}

impl DomField {
    pub fn from_element(element: Element) -> Option<Self> {
        let control = match element.dyn_ref::<HtmlInputElement>() {
            Some(input) => Control::Input(input.clone()),
            None => Control::TextArea(element.dyn_ref::<HtmlTextAreaElement>()?.clone()),
        };
        Some(Self {
            control,
            element: element.dyn_into().ok()?,
        })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// `#<field-id>-error`, the element that displays this field's message.
    fn error_element(&self) -> Option<HtmlElement> {
        let id = self.element.id();
        if id.is_empty() {
            return None;
        }
        utils::document()
            .ok()?
            .get_element_by_id(&format!("{}-error", id))?
            .dyn_into()
            .ok()
    }
}

impl FormField for DomField {
    fn spec(&self) -> FieldSpec {
        let required = self.element.has_attribute("required");
        match &self.control {
            Control::Input(input) => FieldSpec::new(
                input.name(),
                FieldKind::from_input_type(&input.type_()),
                required,
            ),
            Control::TextArea(area) => FieldSpec::new(area.name(), FieldKind::TextArea, required),
        }
    }

    fn value(&self) -> String {
        match &self.control {
            Control::Input(input) => input.value(),
            Control::TextArea(area) => area.value(),
        }
    }

    fn clear_value(&self) {
        match &self.control {
            Control::Input(input) => input.set_value(""),
            Control::TextArea(area) => area.set_value(""),
        }
    }

    fn show_error(&self, message: &str) {
        let has_error = !message.is_empty();
        if let Some(error_element) = self.error_element() {
            error_element.set_text_content(Some(message));
            set_style(&error_element, "display", if has_error { "block" } else { "none" });
        }
        if let Err(e) = self
            .element
            .class_list()
            .toggle_with_force(ERROR_CLASS, has_error)
        {
            warn!("Could not toggle error class: {}", Error::from(e));
        }
        set_attr(&self.element, "aria-invalid", if has_error { "true" } else { "false" });
    }

    fn has_error(&self) -> bool {
        self.element.class_list().contains(ERROR_CLASS)
    }

    fn focus(&self) {
        let _ = self.element.focus();
    }

    fn scroll_into_view(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        self.element
            .scroll_into_view_with_scroll_into_view_options(&options);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentMode {
    Text,
    Html,
}

pub struct DomButton {
    element: HtmlElement,
    mode: ContentMode,
}

impl DomButton {
    /// Button whose label is plain text.
    pub fn text(element: Element) -> Option<Self> {
        Self::with_mode(element, ContentMode::Text)
    }

    /// Button whose content carries markup (an icon span and a label).
    pub fn html(element: Element) -> Option<Self> {
        Self::with_mode(element, ContentMode::Html)
    }

    fn with_mode(element: Element, mode: ContentMode) -> Option<Self> {
        Some(Self {
            element: element.dyn_into().ok()?,
            mode,
        })
    }
}

impl ButtonControl for DomButton {
    fn content(&self) -> String {
        match self.mode {
            ContentMode::Text => self.element.text_content().unwrap_or_default(),
            ContentMode::Html => self.element.inner_html(),
        }
    }

    fn set_content(&self, content: &str) {
        match self.mode {
            ContentMode::Text => self.element.set_text_content(Some(content)),
            ContentMode::Html => self.element.set_inner_html(content),
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.element.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            set_attr(&self.element, "disabled", "");
        } else if let Err(e) = self.element.remove_attribute("disabled") {
            warn!("Could not enable button: {}", Error::from(e));
        }
    }
}

fn collect_fields(form: &Element) -> Vec<Rc<DomField>> {
    query_all_within(form, FIELD_SELECTOR)
        .into_iter()
        .filter_map(DomField::from_element)
        .map(Rc::new)
        .collect()
}

fn as_form_fields(fields: &[Rc<DomField>]) -> Vec<Rc<dyn FormField>> {
    fields
        .iter()
        .map(|f| Rc::clone(f) as Rc<dyn FormField>)
        .collect()
}

/// Validates on blur, clears the error as soon as the user types.
fn wire_field_validation(fields: &[Rc<DomField>], set: &Rc<FieldSet>) -> Result<(), Error> {
    for field in fields {
        let target = field.element().clone();
        {
            let (field, set) = (Rc::clone(field), Rc::clone(set));
            listen(&target, "blur", move |_: Event| {
                set.validate(field.as_ref());
            })?;
        }
        let (field, set) = (Rc::clone(field), Rc::clone(set));
        listen(&target, "input", move |_: Event| {
            set.clear_error(field.as_ref());
        })?;
    }
    Ok(())
}

pub fn mount_contact_form(scheduler: SharedScheduler) -> Result<Option<Rc<ContactForm>>, Error> {
    let Some(element) = query(CONTACT_FORM_SELECTOR) else {
        return Ok(None);
    };
    let form_element: HtmlFormElement = element
        .dyn_into()
        .map_err(|_| Error::MissingElement("contact form"))?;

    let fields = collect_fields(&form_element);
    let button = query_within(&form_element, SUBMIT_BUTTON_SELECTOR)
        .and_then(DomButton::text)
        .map(|b| Rc::new(b) as Rc<dyn ButtonControl>);
    let native_submit: Rc<dyn Fn()> = {
        let form_element = form_element.clone();
        Rc::new(move || {
            if let Err(e) = form_element.submit() {
                error!("Contact form submission failed: {}", Error::from(e));
            }
        })
    };

    let form = ContactForm::new(
        FieldSet::new(as_form_fields(&fields), RuleSet::Contact),
        button,
        native_submit,
        scheduler,
    );
    wire_field_validation(&fields, form.fields())?;

    {
        let form = Rc::clone(&form);
        listen(&form_element, "submit", move |event: Event| {
            event.prevent_default();
            form.handle_submit();
        })?;
    }
    Ok(Some(form))
}

pub fn mount_whatsapp_form(
    config: &SiteConfig,
    scheduler: SharedScheduler,
) -> Result<Option<Rc<WhatsAppForm>>, Error> {
    let Some(form_element) = query(WHATSAPP_FORM_SELECTOR) else {
        return Ok(None);
    };

    let fields = collect_fields(&form_element);
    let button_element = query_within(&form_element, WHATSAPP_BUTTON_SELECTOR);
    let button = button_element
        .clone()
        .and_then(DomButton::html)
        .map(|b| Rc::new(b) as Rc<dyn ButtonControl>);
    let host = Rc::new(DomBrowserHost::new(scheduler.clone()));
    let hide_messages = {
        let form_element = form_element.clone();
        move || {
            for message in query_all_within(&form_element, ERROR_MESSAGE_SELECTOR) {
                if let Ok(message) = message.dyn_into::<HtmlElement>() {
                    set_style(&message, "display", "none");
                }
            }
        }
    };

    let form = WhatsAppForm::new(
        FieldSet::new(as_form_fields(&fields), RuleSet::WhatsApp).on_reset(hide_messages),
        button,
        LinkOpener::with_default_strategies(host),
        scheduler,
        config.whatsapp_number.clone(),
        MessageTemplate::from(config),
    );
    wire_field_validation(&fields, form.fields())?;

    {
        let form = Rc::clone(&form);
        listen(&form_element, "submit", move |event: Event| {
            event.prevent_default();
            event.stop_propagation();
            info!("WhatsApp form submitted");
            form.handle_submit();
        })?;
    }

    match button_element {
        Some(button_element) => {
            let form = Rc::clone(&form);
            listen(&button_element, "click", move |event: MouseEvent| {
                event.prevent_default();
                event.stop_propagation();
                info!("WhatsApp button clicked");
                form.handle_submit();
            })?;
        }
        None => error!("WhatsApp button not found"),
    }

    Ok(Some(form))
}
