//! Transport: server configuration plus a lazily opened connection.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::config::{Credentials, Encryption, ServerSettings};
use super::{Connection, MailTransport, MimeMessageBuilder};
use crate::address::Address;
use crate::error::Result;
use crate::message::{AssembledMessage, DeliveryOutcome, MessageBuilder};
use crate::template::TemplateRenderer;

/// Sender used by messages that never call `with_from_address`.
pub const DEFAULT_FROM: &str = "no-reply@example.com";

/// Delivers assembled messages through a [`MailTransport`].
///
/// Every `with_*` method returns a new transport; the receiver is left
/// untouched. Reconfiguring connection settings gives the new transport its
/// own, not yet opened, connection. Builders created with
/// [`create_message`](Self::create_message) share their transport's
/// connection.
pub struct Transport<M: MailTransport> {
    settings: ServerSettings,
    default_from: Address,
    mail: Arc<M>,
    mime: Arc<dyn MimeMessageBuilder>,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    connection: Arc<OnceCell<M::Connection>>,
}

impl<M: MailTransport> Transport<M> {
    /// Creates a transport from settings and its two collaborators.
    pub fn new(
        settings: ServerSettings,
        mail: M,
        mime: impl MimeMessageBuilder + 'static,
    ) -> Self {
        Self {
            settings,
            default_from: Address::unchecked(DEFAULT_FROM),
            mail: Arc::new(mail),
            mime: Arc::new(mime),
            renderer: None,
            connection: Arc::new(OnceCell::new()),
        }
    }

    /// Returns the connection settings.
    #[must_use]
    pub const fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Returns the sender applied to new messages.
    #[must_use]
    pub const fn default_from(&self) -> &Address {
        &self.default_from
    }

    /// Returns true once the first send has opened a connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Returns a transport that authenticates with `username`/`password`.
    #[must_use]
    pub fn with_credentials(&self, username: &str, password: &str) -> Self {
        self.reconfigured(|s| s.credentials = Some(Credentials::new(username, password)))
    }

    /// Returns a transport using `method` for encryption.
    ///
    /// The port is left as it is; STARTTLS servers usually also need
    /// `with_port(Encryption::Tls.default_port())`.
    #[must_use]
    pub fn with_encryption_method(&self, method: Encryption) -> Self {
        self.reconfigured(|s| s.encryption = method)
    }

    /// Returns a transport connecting on `port`.
    #[must_use]
    pub fn with_port(&self, port: u16) -> Self {
        self.reconfigured(|s| s.port = port)
    }

    /// Returns a transport with a per-command timeout.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.reconfigured(|s| s.timeout = Some(timeout))
    }

    /// Returns a transport that sets `email` as the bounce address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`](crate::Error::InvalidAddress) if
    /// `email` is malformed.
    pub fn with_return_path(&self, email: &str) -> Result<Self> {
        let return_path = Address::new(email, None)?;
        Ok(self.reconfigured(|s| s.return_path = Some(return_path)))
    }

    /// Returns a transport whose new messages are sent from `email`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`](crate::Error::InvalidAddress) if
    /// `email` is malformed.
    pub fn with_default_from(&self, email: &str, name: Option<&str>) -> Result<Self> {
        let mut transport = self.clone();
        transport.default_from = Address::new(email, name)?;
        Ok(transport)
    }

    /// Returns a transport that renders views with `renderer`.
    #[must_use]
    pub fn with_renderer(&self, renderer: impl TemplateRenderer + 'static) -> Self {
        let mut transport = self.clone();
        transport.renderer = Some(Arc::new(renderer));
        transport
    }

    /// Starts an empty message bound to this transport.
    #[must_use]
    pub fn create_message(&self) -> MessageBuilder<M> {
        MessageBuilder::new(self.clone())
    }

    pub(crate) fn renderer(&self) -> Option<&dyn TemplateRenderer> {
        self.renderer.as_deref()
    }

    pub(crate) fn mime(&self) -> &dyn MimeMessageBuilder {
        self.mime.as_ref()
    }

    /// Delivers `message`, opening the connection on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Delivery`](crate::Error::Delivery) if the connection
    /// cannot be opened or the server refuses the message.
    pub async fn send(&self, message: AssembledMessage) -> Result<DeliveryOutcome> {
        let message = match &self.settings.return_path {
            Some(return_path) => message.with_return_path(return_path.clone()),
            None => message,
        };

        let connection = self
            .connection
            .get_or_try_init(|| async {
                debug!(
                    host = %self.settings.host,
                    port = self.settings.port,
                    encryption = %self.settings.encryption,
                    "Opening mail transport connection"
                );
                self.mail.connect(&self.settings).await
            })
            .await
            .inspect_err(|e| warn!(?e, host = %self.settings.host, "Connection failed"))?;

        let recipients = message.envelope_recipients().count();
        debug!(
            recipients,
            from = %message.envelope_from().email(),
            "Delivering message"
        );

        match connection.deliver(&message).await {
            Ok(outcome) => {
                info!(accepted = outcome.accepted, recipients, "Message delivered");
                Ok(outcome)
            }
            Err(e) => {
                warn!(?e, recipients, "Delivery failed");
                Err(e.into())
            }
        }
    }

    fn reconfigured(&self, update: impl FnOnce(&mut ServerSettings)) -> Self {
        let mut settings = self.settings.clone();
        update(&mut settings);
        Self {
            settings,
            connection: Arc::new(OnceCell::new()),
            ..self.clone()
        }
    }
}

impl<M: MailTransport> Clone for Transport<M> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            default_from: self.default_from.clone(),
            mail: Arc::clone(&self.mail),
            mime: Arc::clone(&self.mime),
            renderer: self.renderer.clone(),
            connection: Arc::clone(&self.connection),
        }
    }
}

impl<M: MailTransport> fmt::Debug for Transport<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("settings", &self.settings)
            .field("default_from", &self.default_from)
            .field("has_renderer", &self.renderer.is_some())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
