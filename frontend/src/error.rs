use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("javascript error: {0}")]
    Js(String),

    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(describe_js(&value))
    }
}

/// Best-effort text for a thrown JS value.
pub fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
