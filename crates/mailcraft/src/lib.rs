//! # mailcraft
//!
//! Immutable, fluent email composition with pluggable delivery.
//!
//! A [`Transport`] holds server settings and lazily opens one connection
//! through a [`MailTransport`]. [`Transport::create_message`] hands out an
//! empty [`MessageBuilder`]; every builder call returns a new value, and
//! [`MessageBuilder::send`] validates, assembles the MIME message through a
//! [`MimeMessageBuilder`] and delivers it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailcraft::Encryption;
//!
//! #[tokio::main]
//! async fn main() -> mailcraft::Result<()> {
//!     let transport = mailcraft_smtp::server(Some("smtp.example.com"), None)
//!         .with_credentials("user@example.com", "app-password")
//!         .with_encryption_method(Encryption::Ssl);
//!
//!     let outcome = transport
//!         .create_message()
//!         .with_subject("Weekly report")
//!         .with_recipient("team@example.com", Some("Team"))?
//!         .with_content("<p>Numbers are up.</p>")
//!         .send()
//!         .await?;
//!
//!     println!("{} recipient(s) accepted", outcome.accepted);
//!     Ok(())
//! }
//! ```
//!
//! ## Collaborators
//!
//! - [`MailTransport`] / [`Connection`]: opens connections and delivers bytes
//! - [`MimeMessageBuilder`]: turns [`MessageParts`] into an [`AssembledMessage`]
//! - [`TemplateRenderer`]: renders named views for [`MessageBuilder::with_view`]
//!
//! `mailcraft-smtp` provides the first two on top of `lettre`;
//! `mailcraft-view` provides a directory-backed renderer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod error;
pub mod message;
pub mod template;
pub mod transport;

pub use address::Address;
pub use error::{DeliveryError, Error, Result, TemplateRenderError};
pub use message::{
    AssembledMessage, Attachment, AttachmentPart, DeliveryOutcome, MessageBuilder, MessageParts,
};
pub use template::{TemplateRenderer, ViewParams};
pub use transport::{
    Connection, Credentials, Encryption, MailTransport, MimeMessageBuilder, ServerSettings,
    Transport,
};
