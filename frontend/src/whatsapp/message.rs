use std::fmt;

use crate::config::SiteConfig;
use crate::form::FieldSet;

pub const DEFAULT_SUBJECT: &str = "New contact";

/// Values read from the WhatsApp form at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub phone: String,
    pub message: String,
}

impl FormSnapshot {
    pub fn read(fields: &FieldSet) -> Self {
        let subject = fields.value_of("subject");
        Self {
            name: fields.value_of("name"),
            email: fields.value_of("email"),
            subject: if subject.is_empty() {
                DEFAULT_SUBJECT.to_string()
            } else {
                subject
            },
            phone: fields.value_of("phone"),
            message: fields.value_of("message"),
        }
    }
}

/// Who the message greets and how it is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub owner: String,
    pub signature: String,
}

impl From<&SiteConfig> for MessageTemplate {
    fn from(config: &SiteConfig) -> Self {
        Self {
            owner: config.owner_name.clone(),
            signature: config.signature.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppMessage(String);

impl WhatsAppMessage {
    pub fn build(snapshot: &FormSnapshot, template: &MessageTemplate) -> Self {
        let mut text = format!(
            "Hello {}!\n\nNew contact from your website:\n\n Name: {}\n Email: {}",
            template.owner, snapshot.name, snapshot.email
        );
        if !snapshot.phone.trim().is_empty() {
            text.push_str(&format!("\n Phone: {}", snapshot.phone));
        }
        text.push_str(&format!(
            "\n Subject: {}\n\n Message:\n{}\n\n---\nSent from {}",
            snapshot.subject, snapshot.message, template.signature
        ));
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WhatsAppMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(phone: &str) -> FormSnapshot {
        FormSnapshot {
            name: "Ana".into(),
            email: "a@b.com".into(),
            subject: "Hi".into(),
            phone: phone.into(),
            message: "Hello there, testing".into(),
        }
    }

    fn template() -> MessageTemplate {
        MessageTemplate::from(&SiteConfig::default())
    }

    #[test]
    fn phone_line_only_when_given() {
        let without = WhatsAppMessage::build(&snapshot(""), &template());
        assert!(!without.as_str().contains("Phone:"));

        let blank = WhatsAppMessage::build(&snapshot("   "), &template());
        assert!(!blank.as_str().contains("Phone:"));

        let with = WhatsAppMessage::build(&snapshot("+228 1234567"), &template());
        let phone_lines: Vec<&str> = with
            .as_str()
            .lines()
            .filter(|l| l.contains("Phone:"))
            .collect();
        assert_eq!(phone_lines, vec![" Phone: +228 1234567"]);
    }

    #[test]
    fn full_layout() {
        let message = WhatsAppMessage::build(&snapshot(""), &template());
        assert_eq!(
            message.as_str(),
            "Hello MARTINOS-DEV!\n\
             \n\
             New contact from your website:\n\
             \n \
             Name: Ana\n \
             Email: a@b.com\n \
             Subject: Hi\n\
             \n \
             Message:\n\
             Hello there, testing\n\
             \n\
             ---\n\
             Sent from martinosdev.com"
        );
    }

    #[test]
    fn building_is_deterministic() {
        let a = WhatsAppMessage::build(&snapshot("+228 1234567"), &template());
        let b = WhatsAppMessage::build(&snapshot("+228 1234567"), &template());
        assert_eq!(a, b);
    }
}
