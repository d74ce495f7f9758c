use std::fmt;

use super::message::WhatsAppMessage;

pub const WA_ME_BASE: &str = "https://wa.me/";

/// Strips everything but ASCII digits, so `+228 98-13-13-93` and
/// `+22898131393` give the same path.
pub fn digits_only(number: &str) -> String {
    number.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `https://wa.me/<digits>?text=<message>` deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppLink {
    number: String,
    url: String,
}

impl WhatsAppLink {
    pub fn new(number: &str, message: &WhatsAppMessage) -> Self {
        let number = digits_only(number);
        let url = format!(
            "{}{}?text={}",
            WA_ME_BASE,
            number,
            urlencoding::encode(message.as_str())
        );
        Self { number, url }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for WhatsAppLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::whatsapp::message::{FormSnapshot, MessageTemplate};

    fn message(text: &str) -> WhatsAppMessage {
        let snapshot = FormSnapshot {
            name: "Ana".into(),
            email: "a@b.com".into(),
            subject: "Hi".into(),
            phone: String::new(),
            message: text.into(),
        };
        WhatsAppMessage::build(&snapshot, &MessageTemplate::from(&SiteConfig::default()))
    }

    fn text_param(url: &str) -> String {
        let (_, encoded) = url.split_once("?text=").unwrap();
        urlencoding::decode(encoded).unwrap().into_owned()
    }

    #[test]
    fn path_is_digits_only() {
        let msg = message("Hello there, testing");
        for number in ["+22898131393", "+228 98 13 13 93", "(228) 98-131-393"] {
            let link = WhatsAppLink::new(number, &msg);
            assert_eq!(link.number(), "22898131393");
            assert!(link
                .as_str()
                .starts_with("https://wa.me/22898131393?text="));
        }
    }

    #[test]
    fn text_parameter_round_trips() {
        let msg = message("Line one\nLine two & more 🚀 ça marche? 100% #ok");
        let link = WhatsAppLink::new("+22898131393", &msg);
        assert!(!link.as_str().contains('\n'));
        assert!(!link.as_str().contains(' '));
        assert_eq!(text_param(link.as_str()), msg.as_str());
    }
}
