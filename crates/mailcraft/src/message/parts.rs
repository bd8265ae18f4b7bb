//! Structured message fields handed to the MIME builder, and what comes back.

use crate::address::Address;

/// Plain-text alternative sent with every HTML body.
pub const TEXT_FALLBACK: &str = "To view this message, please use an HTML compatible email viewer.";

const HTML_HEAD: &str = "<html><head><style type='text/css'>\
body { margin:0px; font-family:arial,helvetica,sans-serif; font-size:13px; }\
</style></head><body>";

const HTML_TAIL: &str = "</body></html>";

/// Wraps body content in the standard HTML document.
#[must_use]
pub fn html_document(content: &str) -> String {
    let mut html = String::with_capacity(HTML_HEAD.len() + content.len() + HTML_TAIL.len());
    html.push_str(HTML_HEAD);
    html.push_str(content);
    html.push_str(HTML_TAIL);
    html
}

/// A file attachment loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPart {
    /// Filename presented to the recipient.
    pub filename: String,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

/// Everything a [`MimeMessageBuilder`](crate::MimeMessageBuilder) needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageParts {
    /// Subject line.
    pub subject: String,
    /// Sender.
    pub from: Address,
    /// Primary recipients, never empty.
    pub to: Vec<Address>,
    /// Carbon-copy recipients.
    pub cc: Vec<Address>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<Address>,
    /// Reply-To header.
    pub reply_to: Option<Address>,
    /// Full HTML document.
    pub html_body: String,
    /// Plain-text alternative.
    pub text_body: String,
    /// Attachments in registration order.
    pub attachments: Vec<AttachmentPart>,
}

/// A transport-ready message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledMessage {
    parts: MessageParts,
    formatted: Vec<u8>,
    return_path: Option<Address>,
}

impl AssembledMessage {
    /// Pairs the structured parts with their RFC 5322 serialization.
    #[must_use]
    pub const fn new(parts: MessageParts, formatted: Vec<u8>) -> Self {
        Self {
            parts,
            formatted,
            return_path: None,
        }
    }

    /// Returns the message with a bounce address set.
    #[must_use]
    pub fn with_return_path(mut self, return_path: Address) -> Self {
        self.return_path = Some(return_path);
        self
    }

    /// Structured fields the message was built from.
    #[must_use]
    pub const fn parts(&self) -> &MessageParts {
        &self.parts
    }

    /// Serialized message (headers and body).
    #[must_use]
    pub fn formatted(&self) -> &[u8] {
        &self.formatted
    }

    /// Bounce address, if one was applied.
    #[must_use]
    pub const fn return_path(&self) -> Option<&Address> {
        self.return_path.as_ref()
    }

    /// Envelope sender: the return-path if set, otherwise the From address.
    #[must_use]
    pub fn envelope_from(&self) -> &Address {
        self.return_path.as_ref().unwrap_or(&self.parts.from)
    }

    /// Envelope recipients: to, then cc, then bcc.
    pub fn envelope_recipients(&self) -> impl Iterator<Item = &Address> {
        self.parts
            .to
            .iter()
            .chain(&self.parts.cc)
            .chain(&self.parts.bcc)
    }
}

/// Result of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Number of recipients the server accepted.
    pub accepted: usize,
    /// Final reply line from the server, if any.
    pub response: Option<String>,
}

impl DeliveryOutcome {
    /// Creates an outcome for `accepted` recipients.
    #[must_use]
    pub const fn new(accepted: usize) -> Self {
        Self {
            accepted,
            response: None,
        }
    }

    /// Attaches the server's reply line.
    #[must_use]
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn addr(email: &str) -> Address {
        Address::new(email, None).unwrap()
    }

    fn parts() -> MessageParts {
        MessageParts {
            subject: "Hello".into(),
            from: addr("sender@example.com"),
            to: vec![addr("a@example.com")],
            cc: vec![addr("b@example.com")],
            bcc: vec![addr("c@example.com")],
            reply_to: None,
            html_body: html_document("Hi"),
            text_body: TEXT_FALLBACK.into(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_html_document_wraps_content() {
        let html = html_document("<p>Hi</p>");
        assert!(html.starts_with("<html><head><style type='text/css'>"));
        assert!(html.contains("font-family:arial,helvetica,sans-serif"));
        assert!(html.ends_with("<body><p>Hi</p></body></html>"));
    }

    #[test]
    fn test_envelope_from_prefers_return_path() {
        let message = AssembledMessage::new(parts(), Vec::new());
        assert_eq!(message.envelope_from().email(), "sender@example.com");

        let message = message.with_return_path(addr("bounce@example.com"));
        assert_eq!(message.envelope_from().email(), "bounce@example.com");
    }

    #[test]
    fn test_envelope_recipients_order() {
        let message = AssembledMessage::new(parts(), Vec::new());
        let emails: Vec<&str> = message.envelope_recipients().map(Address::email).collect();
        assert_eq!(emails, ["a@example.com", "b@example.com", "c@example.com"]);
    }
}
