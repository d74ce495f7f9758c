use serde::Deserialize;

use crate::error::Error;

/// Id of the optional `<script type="application/json">` block a page can use
/// to override any of the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Total length of the fake loading sequence.
    pub loader_duration_ms: u32,
    /// Height of the fixed header, subtracted from every scroll target.
    pub scroll_offset: f64,
    pub mobile_breakpoint: f64,
    pub scroll_spy_debounce_ms: u32,
    pub resize_debounce_ms: u32,
    /// Destination number for the WhatsApp form. Punctuation is allowed,
    /// only the digits end up in the link.
    pub whatsapp_number: String,
    pub owner_name: String,
    pub signature: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            loader_duration_ms: 3000,
            scroll_offset: 80.0,
            mobile_breakpoint: 768.0,
            scroll_spy_debounce_ms: 100,
            resize_debounce_ms: 250,
            whatsapp_number: "+22898131393".to_string(),
            owner_name: "MARTINOS-DEV".to_string(),
            signature: "martinosdev.com".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Defaults merged with the page override, if the page carries one.
    /// A malformed override is logged and ignored.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(config) => {
                    log::debug!("Loaded site config override");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring site config override: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            SiteConfig::from_json(r#"{"scrollOffset": 64, "whatsappNumber": "+1 555 0100"}"#)
                .unwrap();
        assert_eq!(config.scroll_offset, 64.0);
        assert_eq!(config.whatsapp_number, "+1 555 0100");
        assert_eq!(config.loader_duration_ms, 3000);
        assert_eq!(config.mobile_breakpoint, 768.0);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn malformed_override_is_an_error() {
        let err = SiteConfig::from_json(r#"{"loaderDurationMs": "soon"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
