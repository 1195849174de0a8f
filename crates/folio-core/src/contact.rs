//! Contact form to `mailto:` conversion
//!
//! Submitting the form never touches the network. The message is encoded
//! into a `mailto:` link and handed to the visitor's mail client through
//! page navigation.

use tracing::debug;

use crate::config::ContactConfig;
use crate::host::PageHost;

/// Values read from the contact form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Plain-text mail body, lines separated by CRLF.
    pub fn body(&self) -> String {
        format!(
            "Name: {}\r\nEmail: {}\r\n\r\nMessage:\r\n{}",
            self.name, self.email, self.message
        )
    }
}

/// Build a `mailto:` link with percent-encoded subject and body.
pub fn compose_mailto(recipient: &str, message: &ContactMessage) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        urlencoding::encode(&message.subject),
        urlencoding::encode(&message.body())
    )
}

/// Wires the contact form fields to mail composition
#[derive(Clone, Debug, Default)]
pub struct ContactAdapter {
    config: ContactConfig,
}

impl ContactAdapter {
    pub fn new(config: ContactConfig) -> Self {
        Self { config }
    }

    /// Whether the page has a contact form to wire up.
    pub fn is_available(&self, host: &impl PageHost) -> bool {
        host.element_by_id(&self.config.form_id).is_some()
    }

    /// Read the form. Missing fields read as empty strings.
    pub fn read(&self, host: &impl PageHost) -> ContactMessage {
        let field = |id: &str| host.field_value(id).unwrap_or_default();
        ContactMessage {
            name: field(&self.config.name_field),
            email: field(&self.config.email_field),
            subject: field(&self.config.subject_field),
            message: field(&self.config.message_field),
        }
    }

    /// Handle a form submission.
    ///
    /// Opens the mail client on the composed link, shows the notice and
    /// clears the form. Returns the link.
    pub fn submit(&self, host: &impl PageHost) -> String {
        let message = self.read(host);
        let link = compose_mailto(&self.config.recipient, &message);

        host.navigate(&link);
        host.notify(&self.config.notice);
        host.reset_form(&self.config.form_id);
        debug!(subject = %message.subject, "contact message handed to mail client");
        link
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPage;

    fn query_param(link: &str, key: &str) -> String {
        let query = link.split_once('?').map(|(_, q)| q).unwrap_or_default();
        let raw = query
            .split('&')
            .find_map(|pair| pair.strip_prefix(&format!("{}=", key)))
            .unwrap();
        urlencoding::decode(raw).unwrap().into_owned()
    }

    fn ann() -> ContactMessage {
        ContactMessage {
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        }
    }

    #[test]
    fn test_body_layout() {
        assert_eq!(
            ann().body(),
            "Name: Ann\r\nEmail: a@x.com\r\n\r\nMessage:\r\nHello"
        );
    }

    #[test]
    fn test_compose_mailto() {
        let link = compose_mailto("me@example.com", &ann());

        assert!(link.starts_with("mailto:me@example.com?subject=Hi&body="));
        assert_eq!(query_param(&link, "subject"), "Hi");
        assert_eq!(
            query_param(&link, "body"),
            "Name: Ann\r\nEmail: a@x.com\r\n\r\nMessage:\r\nHello"
        );
        assert!(link.contains("%0D%0A"));
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let message = ContactMessage {
            subject: "Q&A = fun?".to_string(),
            message: "50% off & more".to_string(),
            ..ann()
        };
        let link = compose_mailto("me@example.com", &message);

        assert_eq!(link.matches('&').count(), 1);
        assert_eq!(query_param(&link, "subject"), "Q&A = fun?");
        assert!(query_param(&link, "body").ends_with("50% off & more"));
    }

    #[test]
    fn test_submit_navigates_notifies_and_resets() {
        let page = MemoryPage::new();
        page.create_form("contactForm");
        page.create_field("contactForm", "name", "Ann");
        page.create_field("contactForm", "email", "a@x.com");
        page.create_field("contactForm", "subject", "Hi");
        page.create_field("contactForm", "message", "Hello");
        let adapter = ContactAdapter::default();

        assert!(adapter.is_available(&page));
        let link = adapter.submit(&page);

        assert_eq!(page.location(), Some(link.clone()));
        assert!(link.starts_with("mailto:silmiyushini1919@gmail.com?"));
        assert_eq!(page.notices(), vec!["Opening your email client...".to_string()]);
        assert_eq!(page.reset_count("contactForm"), 1);
        assert_eq!(page.field_value("name"), Some(String::new()));
    }

    #[test]
    fn test_missing_fields_read_empty() {
        let page = MemoryPage::new();
        page.create_form("contactForm");
        page.create_field("contactForm", "name", "Ann");
        let adapter = ContactAdapter::default();

        let message = adapter.read(&page);
        assert_eq!(message.name, "Ann");
        assert_eq!(message.email, "");
        assert_eq!(message.subject, "");
    }

    #[test]
    fn test_absent_form_not_available() {
        let page = MemoryPage::new();
        assert!(!ContactAdapter::default().is_available(&page));
    }
}
