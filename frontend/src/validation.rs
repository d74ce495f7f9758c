//! Per-field validation shared by both contact forms. Everything here is pure:
//! the result depends only on the field description and its current value.

use once_cell::sync::Lazy;
use regex::Regex;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const NAME_TOO_SHORT_MESSAGE: &str = "Name must be at least 2 characters";
pub const MESSAGE_TOO_SHORT_MESSAGE: &str = "Message must be at least 10 characters";

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_MESSAGE_LEN: usize = 10;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[0-9\s\-()]{8,}$").expect("phone pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    TextArea,
    Other,
}

impl FieldKind {
    /// Maps an input's `type` attribute.
    pub fn from_input_type(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "" | "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "tel" => FieldKind::Tel,
            "textarea" => FieldKind::TextArea,
            _ => FieldKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
        }
    }
}

/// Which checks apply. The WhatsApp form adds phone format and minimum
/// lengths on top of the contact form rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    Contact,
    WhatsApp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    /// Empty when the field is valid.
    pub message: String,
}

impl FieldValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    fn fail(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }
}

/// Checks run in a fixed order and a later failure replaces an earlier one,
/// so the reported message is the last rule that rejected the value.
pub fn validate_field(spec: &FieldSpec, raw_value: &str, rules: RuleSet) -> FieldValidation {
    let value = raw_value.trim();
    let mut result = FieldValidation::ok();

    if spec.required && value.is_empty() {
        result = FieldValidation::fail(REQUIRED_MESSAGE);
    }

    if spec.kind == FieldKind::Email && !value.is_empty() && !EMAIL_RE.is_match(value) {
        result = FieldValidation::fail(EMAIL_MESSAGE);
    }

    if rules == RuleSet::WhatsApp {
        if spec.kind == FieldKind::Tel && !value.is_empty() && !PHONE_RE.is_match(value) {
            result = FieldValidation::fail(PHONE_MESSAGE);
        }

        let len = value.chars().count();
        if spec.name == "name" && len > 0 && len < MIN_NAME_LEN {
            result = FieldValidation::fail(NAME_TOO_SHORT_MESSAGE);
        }
        if spec.name == "message" && len > 0 && len < MIN_MESSAGE_LEN {
            result = FieldValidation::fail(MESSAGE_TOO_SHORT_MESSAGE);
        }
    }

    result
}
