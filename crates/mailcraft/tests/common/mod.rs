//! Recording fakes for the transport and MIME collaborators.

#![allow(dead_code, clippy::unwrap_used)]

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mailcraft::{
    AssembledMessage, Connection, DeliveryError, DeliveryOutcome, MailTransport, MessageParts,
    MimeMessageBuilder, ServerSettings, Transport,
};

#[derive(Default)]
struct State {
    connects: Vec<ServerSettings>,
    delivered: Vec<AssembledMessage>,
    connect_error: Option<DeliveryError>,
    connect_delay: Option<Duration>,
    deliver_error: Option<DeliveryError>,
}

/// Transport that records every connect and delivery instead of talking SMTP.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_connect(error: DeliveryError) -> Self {
        let transport = Self::new();
        transport.state.lock().unwrap().connect_error = Some(error);
        transport
    }

    /// Connects only after `delay`, so concurrent first sends overlap.
    pub fn slow_connect(delay: Duration) -> Self {
        let transport = Self::new();
        transport.state.lock().unwrap().connect_delay = Some(delay);
        transport
    }

    pub fn failing_delivery(error: DeliveryError) -> Self {
        let transport = Self::new();
        transport.state.lock().unwrap().deliver_error = Some(error);
        transport
    }

    pub fn connects(&self) -> Vec<ServerSettings> {
        self.state.lock().unwrap().connects.clone()
    }

    pub fn delivered(&self) -> Vec<AssembledMessage> {
        self.state.lock().unwrap().delivered.clone()
    }
}

impl MailTransport for RecordingTransport {
    type Connection = RecordingConnection;

    fn connect(
        &self,
        settings: &ServerSettings,
    ) -> impl Future<Output = Result<Self::Connection, DeliveryError>> + Send {
        let (result, delay) = {
            let mut state = self.state.lock().unwrap();
            state.connects.push(settings.clone());
            let result = match state.connect_error.clone() {
                Some(error) => Err(error),
                None => Ok(RecordingConnection {
                    state: Arc::clone(&self.state),
                }),
            };
            (result, state.connect_delay)
        };

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}

pub struct RecordingConnection {
    state: Arc<Mutex<State>>,
}

impl Connection for RecordingConnection {
    fn deliver(
        &self,
        message: &AssembledMessage,
    ) -> impl Future<Output = Result<DeliveryOutcome, DeliveryError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match state.deliver_error.clone() {
            Some(error) => Err(error),
            None => {
                state.delivered.push(message.clone());
                let accepted = message.envelope_recipients().count();
                Ok(DeliveryOutcome::new(accepted).with_response("250 2.0.0 queued"))
            }
        };
        std::future::ready(result)
    }
}

/// MIME builder that writes a minimal header block and the HTML body.
pub struct PlainMime;

impl MimeMessageBuilder for PlainMime {
    fn assemble(&self, parts: MessageParts) -> mailcraft::Result<AssembledMessage> {
        let formatted = format!(
            "From: {}\r\nSubject: {}\r\n\r\n{}",
            parts.from, parts.subject, parts.html_body
        );
        Ok(AssembledMessage::new(parts, formatted.into_bytes()))
    }
}

pub fn transport(host: Option<&str>) -> (Transport<RecordingTransport>, RecordingTransport) {
    let recorder = RecordingTransport::new();
    let transport = Transport::new(ServerSettings::new(host, None), recorder.clone(), PlainMime);
    (transport, recorder)
}

pub fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}
