//! Error types for message building and delivery.

use std::io;
use std::path::PathBuf;

/// Result type alias for mailcraft operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by builders and transports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed email address passed to an address-accepting operation.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// `send()` was called without any "to" addresses.
    #[error("No recipients specified to send the email to")]
    NoRecipients,

    /// A registered attachment could not be read at send time.
    #[error("Unable to read attachment {}: {source}", path.display())]
    AttachmentRead {
        /// Path that was registered with the builder.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// View rendering failed.
    #[error(transparent)]
    TemplateRender(#[from] TemplateRenderError),

    /// The transport rejected or failed to deliver the message.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The MIME builder could not produce a message from the parts.
    #[error("Message assembly failed: {0}")]
    Assembly(String),

    /// Unrecognised encryption method name.
    #[error("Unknown encryption method: {0}")]
    UnknownEncryption(String),
}

/// A view could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to render view '{view}': {message}")]
pub struct TemplateRenderError {
    /// Name of the view that was requested.
    pub view: String,
    /// Renderer-provided description of the failure.
    pub message: String,
}

impl TemplateRenderError {
    /// Creates a render error for `view`.
    #[must_use]
    pub fn new(view: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            message: message.into(),
        }
    }
}

/// Transport-level delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// Could not reach or talk to the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server refused the configured credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The server answered with an error reply (e.g. recipient rejected).
    #[error("Server rejected message ({code}): {message}")]
    Rejected {
        /// SMTP reply code.
        code: u16,
        /// Reply text from the server.
        message: String,
    },

    /// Unexpected exchange with the server.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl DeliveryError {
    /// Creates a rejection from a reply code and message.
    #[must_use]
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code >= 500 && *code < 600)
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code >= 400 && *code < 500)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_classification() {
        assert!(DeliveryError::rejected(550, "no such user").is_permanent());
        assert!(DeliveryError::rejected(451, "try later").is_transient());
        assert!(!DeliveryError::Connection("refused".into()).is_permanent());
        assert!(!DeliveryError::Connection("refused".into()).is_transient());
    }

    #[test]
    fn test_attachment_error_mentions_path() {
        let err = Error::AttachmentRead {
            path: PathBuf::from("/tmp/missing.pdf"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.pdf"));
    }

    #[test]
    fn test_no_recipients_message() {
        assert_eq!(
            Error::NoRecipients.to_string(),
            "No recipients specified to send the email to"
        );
    }
}
