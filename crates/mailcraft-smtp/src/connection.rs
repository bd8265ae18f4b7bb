//! SMTP delivery through lettre's async transport.

use std::future::Future;

use lettre::address::Envelope;
use lettre::transport::smtp::Error as SmtpError;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use mailcraft::{
    AssembledMessage, Connection, DeliveryError, DeliveryOutcome, Encryption, MailTransport,
    ServerSettings,
};
use tracing::debug;

use crate::mime::lettre_address;

/// Opens SMTP connections described by [`ServerSettings`].
///
/// `Encryption::None` talks plaintext, `Ssl` wraps the socket in TLS from the
/// first byte and `Tls` requires a STARTTLS upgrade.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailTransport;

impl MailTransport for SmtpMailTransport {
    type Connection = SmtpConnection;

    fn connect(
        &self,
        settings: &ServerSettings,
    ) -> impl Future<Output = Result<Self::Connection, DeliveryError>> + Send {
        let transport = build_transport(settings);
        let host = settings.host.clone();
        let port = settings.port;

        async move {
            let transport = transport?;
            let reachable = transport.test_connection().await.map_err(classify)?;
            if !reachable {
                return Err(DeliveryError::Connection(format!(
                    "{host}:{port} did not answer NOOP"
                )));
            }
            debug!(%host, port, "SMTP server reachable");
            Ok(SmtpConnection { transport })
        }
    }
}

/// A configured lettre transport, reused for every send.
#[derive(Debug)]
pub struct SmtpConnection {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Connection for SmtpConnection {
    fn deliver(
        &self,
        message: &AssembledMessage,
    ) -> impl Future<Output = Result<DeliveryOutcome, DeliveryError>> + Send {
        let envelope = envelope(message);

        async move {
            let envelope = envelope?;
            let response = self
                .transport
                .send_raw(&envelope, message.formatted())
                .await
                .map_err(classify)?;

            let reply = match response.first_line() {
                Some(line) => format!("{} {line}", response.code()),
                None => response.code().to_string(),
            };
            Ok(DeliveryOutcome::new(envelope.to().len()).with_response(reply))
        }
    }
}

fn build_transport(
    settings: &ServerSettings,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
    let mut builder =
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            .port(settings.port);

    builder = match settings.encryption {
        Encryption::None => builder.tls(Tls::None),
        Encryption::Ssl => builder.tls(Tls::Wrapper(tls_parameters(&settings.host)?)),
        Encryption::Tls => builder.tls(Tls::Required(tls_parameters(&settings.host)?)),
    };

    if let Some(credentials) = &settings.credentials {
        builder = builder.credentials(Credentials::new(
            credentials.username.clone(),
            credentials.password.clone(),
        ));
    }

    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(Some(timeout));
    }

    Ok(builder.build())
}

fn tls_parameters(host: &str) -> Result<TlsParameters, DeliveryError> {
    TlsParameters::new(host.to_string())
        .map_err(|e| DeliveryError::Connection(format!("TLS setup for {host} failed: {e}")))
}

fn envelope(message: &AssembledMessage) -> Result<Envelope, DeliveryError> {
    let invalid = |e: mailcraft::Error| DeliveryError::Protocol(e.to_string());

    let from = lettre_address(message.envelope_from()).map_err(invalid)?;
    let to = message
        .envelope_recipients()
        .map(lettre_address)
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;

    Envelope::new(Some(from), to).map_err(|e| DeliveryError::Protocol(e.to_string()))
}

/// Maps a lettre error onto the delivery taxonomy.
fn classify(error: SmtpError) -> DeliveryError {
    let code = error
        .status()
        .and_then(|status| status.to_string().parse::<u16>().ok());

    match code {
        Some(530 | 534 | 535 | 538) => DeliveryError::Authentication(error.to_string()),
        Some(code) if error.is_permanent() || error.is_transient() => {
            DeliveryError::rejected(code, error.to_string())
        }
        _ if error.is_response() || error.is_client() => DeliveryError::Protocol(error.to_string()),
        _ => DeliveryError::Connection(error.to_string()),
    }
}
