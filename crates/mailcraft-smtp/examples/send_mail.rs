#![allow(clippy::doc_markdown)]
//! Example: Send one HTML message through an SMTP server
//!
//! ## Configuration
//!
//! | Variable        | Meaning                                   | Default     |
//! |-----------------|-------------------------------------------|-------------|
//! | `SMTP_HOST`     | Server hostname                           | `localhost` |
//! | `SMTP_PORT`     | Server port                               | by host     |
//! | `SMTP_USER`     | Username, enables authentication          | none        |
//! | `SMTP_PASSWORD` | Password for `SMTP_USER`                  | empty       |
//! | `SMTP_SECURITY` | `none`, `ssl` or `tls`                    | by host     |
//! | `MAIL_TO`       | Recipient address                         | required    |
//!
//! ## Running
//!
//! ```bash
//! MAIL_TO=me@example.com RUST_LOG=debug \
//!     cargo run --package mailcraft-smtp --example send_mail
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use mailcraft::Encryption;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = env::var("SMTP_HOST").ok();
    let port = env::var("SMTP_PORT")
        .ok()
        .map(|p| p.parse::<u16>())
        .transpose()
        .context("SMTP_PORT must be a port number")?;
    let to = env::var("MAIL_TO").context("MAIL_TO is required")?;

    let mut transport =
        mailcraft_smtp::server(host.as_deref(), port).with_timeout(Duration::from_secs(30));

    if let Ok(security) = env::var("SMTP_SECURITY") {
        let encryption: Encryption = security.parse()?;
        transport = transport.with_encryption_method(encryption);
    }
    if let Ok(user) = env::var("SMTP_USER") {
        let password = env::var("SMTP_PASSWORD").unwrap_or_default();
        transport = transport.with_credentials(&user, &password);
    }

    let settings = transport.settings();
    println!(
        "Sending via {}:{} ({})",
        settings.host, settings.port, settings.encryption
    );

    let outcome = transport
        .create_message()
        .with_subject("Hello from mailcraft")
        .with_recipient(&to, None)?
        .with_content("<h1>Hello</h1><p>This message was sent by the send_mail example.</p>")
        .send()
        .await?;

    println!(
        "Accepted for {} recipient(s): {}",
        outcome.accepted,
        outcome.response.as_deref().unwrap_or("no reply text")
    );
    Ok(())
}
