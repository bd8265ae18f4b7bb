//! Immutable message builder.

use std::fmt;
use std::path::PathBuf;

use crate::address::Address;
use crate::error::{Error, Result, TemplateRenderError};
use crate::message::{Attachment, DeliveryOutcome, MessageParts, TEXT_FALLBACK, html_document};
use crate::template::ViewParams;
use crate::transport::{MailTransport, Transport};

/// An in-progress email bound to a [`Transport`].
///
/// Builders are values: every `with_*`/`without_*` call leaves `self` as it
/// was and returns the updated copy, so a partially built message can be used
/// as a template for several sends.
///
/// ```ignore
/// let outcome = transport
///     .create_message()
///     .with_subject("Invoice")
///     .with_recipient("customer@example.com", Some("Customer"))?
///     .with_content("<p>Please find your invoice attached.</p>")
///     .with_attachment("/var/invoices/1234.pdf", Some("invoice.pdf"))
///     .send()
///     .await?;
/// ```
pub struct MessageBuilder<M: MailTransport> {
    transport: Transport<M>,
    subject: String,
    from: Address,
    to: Vec<Address>,
    cc: Vec<Address>,
    bcc: Vec<Address>,
    reply_to: Option<Address>,
    content: String,
    attachments: Vec<Attachment>,
}

impl<M: MailTransport> MessageBuilder<M> {
    pub(crate) fn new(transport: Transport<M>) -> Self {
        Self {
            from: transport.default_from().clone(),
            transport,
            subject: String::new(),
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: None,
            content: String::new(),
            attachments: Vec::new(),
        }
    }

    /// Transport this message will be sent through.
    #[must_use]
    pub const fn transport(&self) -> &Transport<M> {
        &self.transport
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Sender.
    #[must_use]
    pub const fn from_address(&self) -> &Address {
        &self.from
    }

    /// Primary recipients, in the order they were added.
    #[must_use]
    pub fn recipients(&self) -> &[Address] {
        &self.to
    }

    /// Carbon-copy recipients.
    #[must_use]
    pub fn cc(&self) -> &[Address] {
        &self.cc
    }

    /// Blind carbon-copy recipients.
    #[must_use]
    pub fn bcc(&self) -> &[Address] {
        &self.bcc
    }

    /// Reply-To address.
    #[must_use]
    pub const fn reply_to(&self) -> Option<&Address> {
        self.reply_to.as_ref()
    }

    /// HTML body content accumulated so far.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Registered attachments.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Replaces the subject.
    #[must_use]
    pub fn with_subject(&self, subject: impl Into<String>) -> Self {
        let mut message = self.clone();
        message.subject = subject.into();
        message
    }

    /// Replaces the sender.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` is malformed.
    pub fn with_from_address(&self, email: &str, name: Option<&str>) -> Result<Self> {
        let from = Address::new(email, name)?;
        let mut message = self.clone();
        message.from = from;
        Ok(message)
    }

    /// Appends a "to" recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` is malformed.
    pub fn with_recipient(&self, email: &str, name: Option<&str>) -> Result<Self> {
        let address = Address::new(email, name)?;
        let mut message = self.clone();
        message.to.push(address);
        Ok(message)
    }

    /// Removes all "to" recipients.
    #[must_use]
    pub fn without_recipients(&self) -> Self {
        let mut message = self.clone();
        message.to.clear();
        message
    }

    /// Appends a cc recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` is malformed.
    pub fn with_cc(&self, email: &str, name: Option<&str>) -> Result<Self> {
        let address = Address::new(email, name)?;
        let mut message = self.clone();
        message.cc.push(address);
        Ok(message)
    }

    /// Removes all cc recipients.
    #[must_use]
    pub fn without_cc(&self) -> Self {
        let mut message = self.clone();
        message.cc.clear();
        message
    }

    /// Appends a bcc recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` is malformed.
    pub fn with_bcc(&self, email: &str, name: Option<&str>) -> Result<Self> {
        let address = Address::new(email, name)?;
        let mut message = self.clone();
        message.bcc.push(address);
        Ok(message)
    }

    /// Removes all bcc recipients.
    #[must_use]
    pub fn without_bcc(&self) -> Self {
        let mut message = self.clone();
        message.bcc.clear();
        message
    }

    /// Sets the Reply-To address, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` is malformed.
    pub fn with_reply_to(&self, email: &str, name: Option<&str>) -> Result<Self> {
        let address = Address::new(email, name)?;
        let mut message = self.clone();
        message.reply_to = Some(address);
        Ok(message)
    }

    /// Clears the Reply-To address.
    #[must_use]
    pub fn without_reply_to(&self) -> Self {
        let mut message = self.clone();
        message.reply_to = None;
        message
    }

    /// Appends HTML to the body.
    #[must_use]
    pub fn with_content(&self, content: &str) -> Self {
        let mut message = self.clone();
        message.content.push_str(content);
        message
    }

    /// Renders `view` with the transport's renderer and appends the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateRender`] if no renderer is configured or the
    /// view fails to render.
    pub fn with_view(&self, view: &str, params: Option<&ViewParams>) -> Result<Self> {
        let renderer = self.transport.renderer().ok_or_else(|| {
            TemplateRenderError::new(view, "no template renderer configured")
        })?;

        let empty = ViewParams::new();
        let rendered = renderer.render(view, params.unwrap_or(&empty))?;
        Ok(self.with_content(&rendered))
    }

    /// Clears the body.
    #[must_use]
    pub fn without_content(&self) -> Self {
        let mut message = self.clone();
        message.content.clear();
        message
    }

    /// Attaches the file at `path`, optionally renamed to `filename`.
    ///
    /// Attaching the same path again replaces the earlier filename override.
    /// An empty `filename` counts as no override.
    /// The file is not read until [`send`](Self::send).
    #[must_use]
    pub fn with_attachment(&self, path: impl Into<PathBuf>, filename: Option<&str>) -> Self {
        let filename = filename.filter(|f| !f.is_empty()).map(str::to_owned);
        let attachment = Attachment::new(path.into(), filename);
        let mut message = self.clone();
        match message
            .attachments
            .iter_mut()
            .find(|a| a.path() == attachment.path())
        {
            Some(existing) => *existing = attachment,
            None => message.attachments.push(attachment),
        }
        message
    }

    /// Removes all attachments.
    #[must_use]
    pub fn without_attachments(&self) -> Self {
        let mut message = self.clone();
        message.attachments.clear();
        message
    }

    /// Assembles the message and delivers it through the bound transport.
    ///
    /// # Errors
    ///
    /// - [`Error::NoRecipients`] if no "to" address was added; nothing is
    ///   handed to the transport.
    /// - [`Error::AttachmentRead`] if an attachment cannot be read.
    /// - [`Error::Assembly`] if the MIME builder rejects the parts.
    /// - [`Error::Delivery`] if the transport fails.
    pub async fn send(&self) -> Result<DeliveryOutcome> {
        if self.to.is_empty() {
            return Err(Error::NoRecipients);
        }

        let mut attachments = Vec::with_capacity(self.attachments.len());
        for attachment in &self.attachments {
            attachments.push(attachment.load().await?);
        }

        let parts = MessageParts {
            subject: self.subject.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            reply_to: self.reply_to.clone(),
            html_body: html_document(&self.content),
            text_body: TEXT_FALLBACK.to_string(),
            attachments,
        };

        let message = self.transport.mime().assemble(parts)?;
        self.transport.send(message).await
    }
}

impl<M: MailTransport> Clone for MessageBuilder<M> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            subject: self.subject.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            reply_to: self.reply_to.clone(),
            content: self.content.clone(),
            attachments: self.attachments.clone(),
        }
    }
}

impl<M: MailTransport> fmt::Debug for MessageBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("subject", &self.subject)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("bcc", &self.bcc)
            .field("reply_to", &self.reply_to)
            .field("content", &self.content)
            .field("attachments", &self.attachments)
            .finish_non_exhaustive()
    }
}
