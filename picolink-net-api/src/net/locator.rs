//! Textual `<transport>/<host>:<port>` locators.
//!
//! A locator names where a peer can be reached without resolving it, e.g. `tcp/127.0.0.1:7447`,
//! `udp/[::1]:7447` or `tcp/router.local:7447`.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt::{self, Display, Formatter};
use core::net::{Ipv4Addr, Ipv6Addr};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::net::endpoint::Transport;

/// A parsed-but-not-resolved locator.
///
/// See tests for what is supported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    transport: Transport,

    /// Either a hostname or an IP address (v4 or v6), without IPv6 brackets.
    host: String,

    // IPv6 needs `[]` around the IP to tell it apart from the port when displayed.
    is_v6: bool,

    port: u16,
}

impl Locator {
    /// The transport prefix of this locator.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// The host part, a name or a literal IP without brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port part.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Locator {
            transport,
            host,
            is_v6,
            port,
        } = self;
        if *is_v6 {
            write!(f, "{transport}/[{host}]:{port}")
        } else {
            write!(f, "{transport}/{host}:{port}")
        }
    }
}

/// Errors that can occur when parsing a [`Locator`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorParseError {
    /// Missing `/` between the transport and the address.
    #[error("missing '/' after the transport")]
    MissingTransport,

    /// The transport prefix is neither `tcp` nor `udp`.
    #[error("unknown transport `{0}`")]
    UnknownTransport(String),

    /// Missing `:` separator between host and port.
    #[error("missing ':' separator")]
    MissingSeparator,

    /// Invalid port number format.
    #[error("invalid port number")]
    InvalidPort(#[source] core::num::ParseIntError),

    /// Invalid hostname format.
    #[error("invalid host: {0}")]
    InvalidHost(&'static str),
}

/// Validates a hostname according to [RFC 1123 §2.1] and [RFC 952] syntax rules.
///
/// A trailing dot is allowed for fully qualified names.
///
/// [RFC 1123 §2.1]: https://datatracker.ietf.org/doc/html/rfc1123#section-2
/// [RFC 952]: https://datatracker.ietf.org/doc/html/rfc952
fn validate_hostname(host: &str) -> Result<(), LocatorParseError> {
    if host.is_empty() {
        return Err(LocatorParseError::InvalidHost("is empty"));
    }
    if host.len() > 253 {
        return Err(LocatorParseError::InvalidHost("is too long"));
    }
    if host.starts_with('.') {
        return Err(LocatorParseError::InvalidHost("starts with period"));
    }

    for label in host.strip_suffix('.').unwrap_or(host).split('.') {
        let problem = if label.is_empty() {
            "contains empty label"
        } else if label.len() > 63 {
            "label too long"
        } else if label.starts_with('-') || label.ends_with('-') {
            "label starts or ends with dash"
        } else if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            "label contains disallowed character"
        } else {
            continue;
        };
        return Err(LocatorParseError::InvalidHost(problem));
    }

    Ok(())
}

impl FromStr for Locator {
    type Err = LocatorParseError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let (transport, address) = string
            .split_once('/')
            .ok_or(LocatorParseError::MissingTransport)?;

        let transport = match transport {
            "tcp" => Transport::Tcp,
            "udp" => Transport::Udp,
            other => return Err(LocatorParseError::UnknownTransport(other.to_owned())),
        };

        let (host, port) = address
            .rsplit_once(':')
            .ok_or(LocatorParseError::MissingSeparator)?;
        let port = port.parse().map_err(LocatorParseError::InvalidPort)?;

        let bracketed = host
            .strip_prefix('[')
            .and_then(|host| host.strip_suffix(']'));
        if let Some(host) = bracketed {
            Ipv6Addr::from_str(host)
                .map_err(|_| LocatorParseError::InvalidHost("invalid IPv6 address"))?;
            return Ok(Self {
                transport,
                host: host.to_owned(),
                is_v6: true,
                port,
            });
        }

        if Ipv4Addr::from_str(host).is_err() {
            validate_hostname(host)?;
        }

        Ok(Self {
            transport,
            host: host.to_owned(),
            is_v6: false,
            port,
        })
    }
}

impl TryFrom<String> for Locator {
    type Error = LocatorParseError;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        string.parse()
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        alloc::format!("{locator}")
    }
}
