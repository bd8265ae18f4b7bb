//! Delivery configuration and the capabilities a transport is built from.

mod config;
mod server;

pub use config::{Credentials, DEFAULT_HOST, Encryption, ServerSettings};
pub use server::{DEFAULT_FROM, Transport};

use std::future::Future;

use crate::error::{DeliveryError, Result};
use crate::message::{AssembledMessage, DeliveryOutcome, MessageParts};

/// Opens connections to a mail server.
pub trait MailTransport: Send + Sync + 'static {
    /// Live connection type produced by [`connect`](Self::connect).
    type Connection: Connection;

    /// Establishes a connection using host, port, encryption and credentials
    /// from `settings`.
    fn connect(
        &self,
        settings: &ServerSettings,
    ) -> impl Future<Output = std::result::Result<Self::Connection, DeliveryError>> + Send;
}

/// An established connection able to deliver messages.
pub trait Connection: Send + Sync + 'static {
    /// Delivers one message.
    fn deliver(
        &self,
        message: &AssembledMessage,
    ) -> impl Future<Output = std::result::Result<DeliveryOutcome, DeliveryError>> + Send;
}

/// Turns structured fields into a sendable message.
pub trait MimeMessageBuilder: Send + Sync {
    /// Assembles `parts` into an RFC 5322 message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Assembly`](crate::Error::Assembly) or
    /// [`Error::InvalidAddress`](crate::Error::InvalidAddress) when the parts
    /// cannot be encoded.
    fn assemble(&self, parts: MessageParts) -> Result<AssembledMessage>;
}
