//! # mailcraft-smtp
//!
//! SMTP delivery for `mailcraft`, built on `lettre`.
//!
//! - [`SmtpMailTransport`]: opens plaintext, implicit-TLS or STARTTLS
//!   connections and delivers assembled messages
//! - [`LettreMimeBuilder`]: assembles HTML + plain-text alternatives and
//!   attachments into an RFC 5322 message
//!
//! ## Quick Start
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() -> mailcraft::Result<()> {
//!     // localhost:25, no encryption
//!     let relay = mailcraft_smtp::localhost();
//!
//!     // smtp.example.com:465, implicit TLS
//!     let server = mailcraft_smtp::server(Some("smtp.example.com"), None)
//!         .with_credentials("user@example.com", "password")
//!         .with_return_path("bounces@example.com")?;
//!
//!     server
//!         .create_message()
//!         .with_subject("Hello")
//!         .with_recipient("friend@example.com", None)?
//!         .with_content("<p>Hello, World!</p>")
//!         .send()
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod connection;
mod mime;

pub use connection::{SmtpConnection, SmtpMailTransport};
pub use mime::LettreMimeBuilder;

use mailcraft::{ServerSettings, Transport};

/// Transport wired to lettre for both delivery and MIME assembly.
pub type SmtpTransport = Transport<SmtpMailTransport>;

/// Creates a transport from explicit settings.
#[must_use]
pub fn transport(settings: ServerSettings) -> SmtpTransport {
    Transport::new(settings, SmtpMailTransport, LettreMimeBuilder)
}

/// Creates a transport for `host`, defaulting port and encryption from it.
///
/// See [`ServerSettings::new`] for the defaulting rules.
#[must_use]
pub fn server(host: Option<&str>, port: Option<u16>) -> SmtpTransport {
    transport(ServerSettings::new(host, port))
}

/// Creates a transport for an unauthenticated relay on `localhost:25`.
#[must_use]
pub fn localhost() -> SmtpTransport {
    transport(ServerSettings::localhost())
}
