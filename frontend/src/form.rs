use std::rc::Rc;

use crate::validation::{validate_field, FieldSpec, RuleSet};

/// One input or textarea as the form components see it.
pub trait FormField {
    fn spec(&self) -> FieldSpec;
    fn value(&self) -> String;
    fn clear_value(&self);
    /// Shows `message` in the field's error element and flags the field.
    /// An empty message hides the element and clears the flag.
    fn show_error(&self, message: &str);
    fn has_error(&self) -> bool;
    fn focus(&self);
    fn scroll_into_view(&self);
}

/// A clickable control whose content changes while a submission runs.
pub trait ButtonControl {
    fn content(&self) -> String;
    fn set_content(&self, content: &str);
    fn set_disabled(&self, disabled: bool);
}

/// The fields of one form, in document order.
pub struct FieldSet {
    fields: Vec<Rc<dyn FormField>>,
    rules: RuleSet,
    on_reset: Option<Box<dyn Fn()>>,
}

impl FieldSet {
    pub fn new(fields: Vec<Rc<dyn FormField>>, rules: RuleSet) -> Self {
        Self {
            fields,
            rules,
            on_reset: None,
        }
    }

    /// Extra cleanup run at the end of [`FieldSet::reset`], for form-level
    /// markup that belongs to no single field.
    pub fn on_reset(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_reset = Some(Box::new(hook));
        self
    }

    pub fn fields(&self) -> &[Rc<dyn FormField>] {
        &self.fields
    }

    /// Validates one field and updates its error display.
    pub fn validate(&self, field: &dyn FormField) -> bool {
        let result = validate_field(&field.spec(), &field.value(), self.rules);
        field.show_error(&result.message);
        result.valid
    }

    pub fn clear_error(&self, field: &dyn FormField) {
        field.show_error("");
    }

    /// Validates every field (or only the required ones) without stopping
    /// at the first failure, so every error is displayed.
    pub fn validate_all(&self, required_only: bool) -> bool {
        self.fields
            .iter()
            .filter(|f| !required_only || f.spec().required)
            .fold(true, |all_valid, f| self.validate(f.as_ref()) && all_valid)
    }

    pub fn first_error(&self) -> Option<Rc<dyn FormField>> {
        self.fields.iter().find(|f| f.has_error()).cloned()
    }

    /// Raw value of the field named `name`, empty when there is none.
    pub fn value_of(&self, name: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.spec().name == name)
            .map(|f| f.value())
            .unwrap_or_default()
    }

    pub fn reset(&self) {
        for field in &self.fields {
            field.clear_value();
            field.show_error("");
        }
        if let Some(hook) = &self.on_reset {
            hook();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::validation::FieldKind;

    /// In-memory field recording what the components did to it.
    pub struct FakeField {
        pub spec: FieldSpec,
        pub value: RefCell<String>,
        pub error: RefCell<String>,
        pub focused: Cell<bool>,
        pub scrolled: Cell<bool>,
    }

    impl FakeField {
        pub fn new(name: &str, kind: FieldKind, required: bool, value: &str) -> Rc<Self> {
            Rc::new(Self {
                spec: FieldSpec::new(name, kind, required),
                value: RefCell::new(value.to_string()),
                error: RefCell::new(String::new()),
                focused: Cell::new(false),
                scrolled: Cell::new(false),
            })
        }

        pub fn set(&self, value: &str) {
            *self.value.borrow_mut() = value.to_string();
        }

        pub fn error(&self) -> String {
            self.error.borrow().clone()
        }
    }

    impl FormField for FakeField {
        fn spec(&self) -> FieldSpec {
            self.spec.clone()
        }

        fn value(&self) -> String {
            self.value.borrow().clone()
        }

        fn clear_value(&self) {
            self.value.borrow_mut().clear();
        }

        fn show_error(&self, message: &str) {
            *self.error.borrow_mut() = message.to_string();
        }

        fn has_error(&self) -> bool {
            !self.error.borrow().is_empty()
        }

        fn focus(&self) {
            self.focused.set(true);
        }

        fn scroll_into_view(&self) {
            self.scrolled.set(true);
        }
    }

    pub struct FakeButton {
        pub content: RefCell<String>,
        pub disabled: Cell<bool>,
        pub history: RefCell<Vec<String>>,
    }

    impl FakeButton {
        pub fn new(content: &str) -> Rc<Self> {
            Rc::new(Self {
                content: RefCell::new(content.to_string()),
                disabled: Cell::new(false),
                history: RefCell::new(Vec::new()),
            })
        }
    }

    impl ButtonControl for FakeButton {
        fn content(&self) -> String {
            self.content.borrow().clone()
        }

        fn set_content(&self, content: &str) {
            *self.content.borrow_mut() = content.to_string();
            self.history.borrow_mut().push(content.to_string());
        }

        fn set_disabled(&self, disabled: bool) {
            self.disabled.set(disabled);
        }
    }

    pub fn as_fields(fields: &[Rc<FakeField>]) -> Vec<Rc<dyn FormField>> {
        fields
            .iter()
            .map(|f| f.clone() as Rc<dyn FormField>)
            .collect()
    }
}
