//! Email address type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAddress", into = "RawAddress")]
pub struct Address {
    email: String,
    name: Option<String>,
}

impl Address {
    /// Creates an address, validating `email`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] unless `email` is an unquoted
    /// `local@domain` mailbox: `atext` characters and single dots in the local
    /// part, letters, digits and inner hyphens in each domain label.
    pub fn new(email: impl Into<String>, name: Option<&str>) -> Result<Self> {
        let email = email.into();
        Self::validate(&email)?;
        Ok(Self {
            email,
            name: name.map(str::to_owned),
        })
    }

    /// Builds an address from a literal known to be valid.
    pub(crate) fn unchecked(email: &str) -> Self {
        debug_assert!(Self::validate(email).is_ok());
        Self {
            email: email.to_string(),
            name: None,
        }
    }

    /// Returns the bare email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn validate(email: &str) -> Result<()> {
        if email.is_empty() {
            return Err(Error::InvalidAddress("Address cannot be empty".into()));
        }

        let invalid = |reason: &str| Err(Error::InvalidAddress(format!("{email}: {reason}")));

        let Some((local, domain)) = email.rsplit_once('@') else {
            return invalid("missing @");
        };

        if local.contains('@') {
            return invalid("must have exactly one @");
        }

        if local.is_empty() || domain.is_empty() {
            return invalid("local and domain parts cannot be empty");
        }

        if local.len() > MAX_LOCAL_LEN {
            return invalid("local part is too long");
        }

        if !local.chars().all(|c| c == '.' || is_atext(c)) {
            return invalid("invalid character in local part");
        }

        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return invalid("malformed local part");
        }

        if !is_valid_domain(domain) {
            return invalid("malformed domain");
        }

        Ok(())
    }
}

const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// RFC 5322 `atext`: characters allowed unquoted in a local part.
fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

/// Dot-separated LDH labels. Address literals are not accepted.
fn is_valid_domain(domain: &str) -> bool {
    domain.len() <= MAX_DOMAIN_LEN
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= MAX_LABEL_LEN
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => f.write_str(&self.email),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawAddress {
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl TryFrom<RawAddress> for Address {
    type Error = Error;

    fn try_from(raw: RawAddress) -> Result<Self> {
        Self::new(raw.email, raw.name.as_deref())
    }
}

impl From<Address> for RawAddress {
    fn from(address: Address) -> Self {
        Self {
            email: address.email,
            name: address.name,
        }
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
    fn test_valid_address() {
        let addr = Address::new("user@example.com", None).unwrap();
        assert_eq!(addr.email(), "user@example.com");
        assert!(addr.name().is_none());
    }

    #[test]
    fn test_valid_address_with_name() {
        let addr = Address::new("john@example.com", Some("John Doe")).unwrap();
        assert_eq!(addr.name(), Some("John Doe"));
        assert_eq!(addr.to_string(), "John Doe <john@example.com>");
    }

    #[test]
    fn test_invalid_address_empty() {
        assert!(matches!(
            Address::new("", None),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_invalid_address_no_at() {
        assert!(Address::new("userexample.com", None).is_err());
    }

    #[test]
    fn test_invalid_address_two_ats() {
        assert!(Address::new("a@b@example.com", None).is_err());
    }

    #[test]
    fn test_invalid_address_empty_local() {
        assert!(Address::new("@example.com", None).is_err());
    }

    #[test]
    fn test_invalid_address_empty_domain() {
        assert!(Address::new("user@", None).is_err());
    }

    #[test]
    fn test_invalid_address_whitespace() {
        assert!(Address::new("us er@example.com", None).is_err());
        assert!(Address::new("user@example.com\r\nBcc: x@y.z", None).is_err());
    }

    #[test]
    fn test_invalid_address_domain_dots() {
        assert!(Address::new("user@.example.com", None).is_err());
        assert!(Address::new("user@example..com", None).is_err());
    }

    #[test]
    fn test_invalid_address_local_specials() {
        for email in [
            "a;b@example.com",
            "a(b)@example.com",
            "a[b@example.com",
            "a\\b@example.com",
            "a:b@example.com",
            ".user@example.com",
            "user.@example.com",
            "us..er@example.com",
        ] {
            assert!(
                matches!(Address::new(email, None), Err(Error::InvalidAddress(_))),
                "{email} accepted"
            );
        }
    }

    #[test]
    fn test_invalid_address_domain_labels() {
        for email in [
            "user@-example.com",
            "user@example-.com",
            "user@exa_mple.com",
            "user@example.com.",
            "user@[127.0.0.1]",
        ] {
            assert!(
                matches!(Address::new(email, None), Err(Error::InvalidAddress(_))),
                "{email} accepted"
            );
        }
        let long_label = format!("user@{}.com", "a".repeat(64));
        assert!(Address::new(long_label, None).is_err());
    }

    #[test]
    fn test_valid_address_forms() {
        for email in [
            "first.last@example.com",
            "o'brien+tag@mail.example.co.uk",
            "x_y-z@sub-domain.example.com",
            "UPPER@EXAMPLE.COM",
        ] {
            assert!(Address::new(email, None).is_ok(), "{email} rejected");
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Address =
            serde_json::from_str(r#"{"email":"bounce@example.com","name":"Bounces"}"#).unwrap();
        assert_eq!(ok.name(), Some("Bounces"));

        let bad = serde_json::from_str::<Address>(r#"{"email":"nope"}"#);
        assert!(bad.is_err());
    }
}
