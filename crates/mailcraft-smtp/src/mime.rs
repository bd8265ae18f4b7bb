//! MIME assembly with lettre's message builder.

use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use mailcraft::{Address, AssembledMessage, Error, MessageParts, MimeMessageBuilder, Result};

/// Builds `multipart/alternative` (plain + HTML) messages, wrapped in
/// `multipart/mixed` when attachments are present.
///
/// Bcc recipients stay out of the headers; they only appear in the envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct LettreMimeBuilder;

impl MimeMessageBuilder for LettreMimeBuilder {
    fn assemble(&self, parts: MessageParts) -> Result<AssembledMessage> {
        let mut builder = Message::builder()
            .from(mailbox(&parts.from)?)
            .subject(parts.subject.as_str());

        for address in &parts.to {
            builder = builder.to(mailbox(address)?);
        }
        for address in &parts.cc {
            builder = builder.cc(mailbox(address)?);
        }
        for address in &parts.bcc {
            builder = builder.bcc(mailbox(address)?);
        }
        if let Some(reply_to) = &parts.reply_to {
            builder = builder.reply_to(mailbox(reply_to)?);
        }

        let body =
            MultiPart::alternative_plain_html(parts.text_body.clone(), parts.html_body.clone());

        let body = if parts.attachments.is_empty() {
            body
        } else {
            parts
                .attachments
                .iter()
                .try_fold(MultiPart::mixed().multipart(body), |mixed, attachment| {
                    let content_type = ContentType::parse(&attachment.content_type)
                        .map_err(|e| Error::Assembly(format!("{}: {e}", attachment.content_type)))?;
                    Ok::<_, Error>(mixed.singlepart(
                        Attachment::new(attachment.filename.clone())
                            .body(attachment.data.clone(), content_type),
                    ))
                })?
        };

        let message = builder
            .multipart(body)
            .map_err(|e| Error::Assembly(e.to_string()))?;

        Ok(AssembledMessage::new(parts, message.formatted()))
    }
}

/// Converts an address into a lettre mailbox.
pub(crate) fn mailbox(address: &Address) -> Result<Mailbox> {
    let email = lettre_address(address)?;
    Ok(Mailbox::new(address.name().map(str::to_owned), email))
}

pub(crate) fn lettre_address(address: &Address) -> Result<lettre::Address> {
    address
        .email()
        .parse()
        .map_err(|e| Error::InvalidAddress(format!("{}: {e}", address.email())))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use mailcraft::AttachmentPart;
    use mailcraft::message::{TEXT_FALLBACK, html_document};

    use super::*;

    fn addr(email: &str, name: Option<&str>) -> Address {
        Address::new(email, name).unwrap()
    }

    fn parts() -> MessageParts {
        MessageParts {
            subject: "Quarterly report".into(),
            from: addr("reports@example.com", Some("Reports")),
            to: vec![addr("a@example.com", None), addr("b@example.com", None)],
            cc: vec![addr("cc@example.com", None)],
            bcc: vec![addr("hidden@example.com", None)],
            reply_to: Some(addr("reply@example.com", Some("Support"))),
            html_body: html_document("Hi"),
            text_body: TEXT_FALLBACK.into(),
            attachments: Vec::new(),
        }
    }

    fn formatted(message: &AssembledMessage) -> String {
        String::from_utf8_lossy(message.formatted()).into_owned()
    }

    #[test]
    fn test_assemble_headers() {
        let message = LettreMimeBuilder.assemble(parts()).unwrap();
        let text = formatted(&message);

        assert!(text.contains("Subject: Quarterly report"));
        assert!(text.contains("To: a@example.com, b@example.com"));
        assert!(text.contains("Cc: cc@example.com"));
        assert!(text.contains("Reply-To:"));
        assert!(text.contains("reply@example.com"));
        assert!(text.contains("reports@example.com"));
        assert!(text.contains("multipart/alternative"));
        assert!(!text.contains("multipart/mixed"));
    }

    #[test]
    fn test_assemble_hides_bcc() {
        let message = LettreMimeBuilder.assemble(parts()).unwrap();
        let text = formatted(&message);

        assert!(!text.contains("hidden@example.com"));
        let recipients: Vec<&str> = message.envelope_recipients().map(Address::email).collect();
        assert!(recipients.contains(&"hidden@example.com"));
    }

    #[test]
    fn test_assemble_with_attachment() {
        let mut parts = parts();
        parts.attachments.push(AttachmentPart {
            filename: "invoice.pdf".into(),
            content_type: "application/pdf".into(),
            data: b"%PDF-1.4 fake".to_vec(),
        });

        let message = LettreMimeBuilder.assemble(parts).unwrap();
        let text = formatted(&message);

        assert!(text.contains("multipart/mixed"));
        assert!(text.contains("multipart/alternative"));
        assert!(text.contains("invoice.pdf"));
        assert!(text.contains("application/pdf"));
        assert_eq!(message.parts().attachments.len(), 1);
    }

    #[test]
    fn test_validated_addresses_are_accepted_by_lettre() {
        for email in [
            "first.last@example.com",
            "o'brien+tag@mail.example.co.uk",
            "x_y-z@sub-domain.example.com",
            "a!#$%&*/=?^`{|}~@example.com",
        ] {
            let address = Address::new(email, Some("Someone")).unwrap();
            assert!(mailbox(&address).is_ok(), "{email}");
        }
    }

    #[test]
    fn test_assemble_rejects_bad_content_type() {
        let mut parts = parts();
        parts.attachments.push(AttachmentPart {
            filename: "odd".into(),
            content_type: "not a mime type".into(),
            data: Vec::new(),
        });

        assert!(matches!(
            LettreMimeBuilder.assemble(parts),
            Err(Error::Assembly(_))
        ));
    }
}
