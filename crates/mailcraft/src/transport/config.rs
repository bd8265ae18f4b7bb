//! Server configuration types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::Error;

/// Hostname used when none is given.
pub const DEFAULT_HOST: &str = "localhost";

/// Connection encryption mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    /// Plaintext. Only sensible for a local relay.
    None,
    /// Implicit TLS from the first byte (SMTPS, port 465).
    Ssl,
    /// Plaintext connect upgraded with STARTTLS.
    Tls,
}

impl Encryption {
    /// Returns the conventional port for this mode.
    ///
    /// [`ServerSettings::new`] only ever picks `None` or `Ssl`. Switching an
    /// existing transport to `Tls` keeps its port, so pair it with
    /// `with_port(Encryption::Tls.default_port())`.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::Ssl => 465,
            Self::Tls => 587,
        }
    }

    /// Returns the lowercase name used by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ssl => "ssl",
            Self::Tls => "tls",
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encryption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "ssl" => Ok(Self::Ssl),
            "tls" | "starttls" => Ok(Self::Tls),
            _ => Err(Error::UnknownEncryption(s.to_string())),
        }
    }
}

/// SMTP authentication credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where and how to reach the SMTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Encryption mode.
    pub encryption: Encryption,
    /// Credentials, when the server requires authentication.
    #[serde(default)]
    pub credentials: Option<Credentials>,
    /// Bounce address used as the envelope sender.
    #[serde(default)]
    pub return_path: Option<Address>,
    /// Per-command timeout passed to the transport.
    #[serde(default, with = "duration_secs")]
    pub timeout: Option<Duration>,
}

impl ServerSettings {
    /// Creates settings for `host`, choosing port and encryption from it.
    ///
    /// `localhost` (or an empty/absent host) gets port 25 without encryption;
    /// anything else gets port 465 with implicit TLS. An explicit `port`
    /// overrides the default port but not the encryption choice.
    #[must_use]
    pub fn new(host: Option<&str>, port: Option<u16>) -> Self {
        let host = host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST);

        let encryption = if host == DEFAULT_HOST {
            Encryption::None
        } else {
            Encryption::Ssl
        };

        Self {
            host: host.to_string(),
            port: port.unwrap_or_else(|| encryption.default_port()),
            encryption,
            credentials: None,
            return_path: None,
            timeout: None,
        }
    }

    /// Settings for an unauthenticated relay on `localhost:25`.
    #[must_use]
    pub fn localhost() -> Self {
        Self::new(None, None)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self::localhost()
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(d)?;
        secs.map(|s| Duration::try_from_secs_f64(s).map_err(serde::de::Error::custom))
            .transpose()
    }
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
    use super::*;

    #[test]
    fn test_localhost_defaults() {
        let settings = ServerSettings::new(Some("localhost"), None);
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 25);
        assert_eq!(settings.encryption, Encryption::None);
    }

    #[test]
    fn test_unset_host_defaults_to_localhost() {
        let settings = ServerSettings::new(None, None);
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 25);
        assert_eq!(settings.encryption, Encryption::None);

        assert_eq!(ServerSettings::new(Some("  "), None).host, "localhost");
    }

    #[test]
    fn test_remote_host_defaults() {
        let settings = ServerSettings::new(Some("smtp.example.com"), None);
        assert_eq!(settings.port, 465);
        assert_eq!(settings.encryption, Encryption::Ssl);
    }

    #[test]
    fn test_explicit_port_keeps_encryption_rule() {
        let local = ServerSettings::new(Some("localhost"), Some(1025));
        assert_eq!(local.port, 1025);
        assert_eq!(local.encryption, Encryption::None);

        let remote = ServerSettings::new(Some("smtp.example.com"), Some(2525));
        assert_eq!(remote.port, 2525);
        assert_eq!(remote.encryption, Encryption::Ssl);
    }

    #[test]
    fn test_encryption_parse() {
        assert_eq!("ssl".parse::<Encryption>().unwrap(), Encryption::Ssl);
        assert_eq!("TLS".parse::<Encryption>().unwrap(), Encryption::Tls);
        assert_eq!("none".parse::<Encryption>().unwrap(), Encryption::None);
        assert!(matches!(
            "rot13".parse::<Encryption>(),
            Err(Error::UnknownEncryption(name)) if name == "rot13"
        ));
    }

    #[test]
    fn test_encryption_parse_error_keeps_input() {
        assert!(matches!(
            " ROT13 ".parse::<Encryption>(),
            Err(Error::UnknownEncryption(name)) if name == " ROT13 "
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("user", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_settings_deserialize() {
        let json = r#"{
            "host": "smtp.example.com",
            "port": 587,
            "encryption": "tls",
            "credentials": { "username": "u", "password": "p" },
            "timeout": 10
        }"#;
        let settings: ServerSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.encryption, Encryption::Tls);
        assert_eq!(settings.timeout, Some(Duration::from_secs(10)));
        assert!(settings.return_path.is_none());
    }
}
