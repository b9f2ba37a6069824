//! Transport configuration.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Default transport lease, in milliseconds.
pub const DEFAULT_LEASE_MS: u64 = 10_000;

/// Longest linger time the socket option can carry, in seconds.
pub const MAX_LINGER_SECS: u64 = i32::MAX as u64;

/// Default nominal UDP timeout, see [`UdpTimeout::legacy`].
pub const DEFAULT_UDP_TIMEOUT: UdpTimeout = UdpTimeout::legacy(3_000);

/// Settings consumed by the transports when opening channels.
///
/// Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportConfig {
    /// Session lease in milliseconds; the TCP linger time is derived from it.
    pub lease_ms: u64,

    /// Receive and send timeout of UDP channels.
    pub udp_timeout: UdpTimeout,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            lease_ms: DEFAULT_LEASE_MS,
            udp_timeout: DEFAULT_UDP_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Linger time for TCP sockets: the lease truncated to whole seconds.
    ///
    /// Saturates at [`MAX_LINGER_SECS`]; a wrapped value could turn into an abortive close.
    pub fn linger(&self) -> Duration {
        Duration::from_secs((self.lease_ms / 1000).min(MAX_LINGER_SECS))
    }
}

/// Unit the numeric value of a [`UdpTimeout`] is applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutUnit {
    /// The value is nominally milliseconds but is applied as microseconds.
    ///
    /// Existing callers size their timeouts against this behavior, so it stays the default.
    #[default]
    Legacy,
    /// The value is applied as milliseconds.
    Milliseconds,
}

/// Receive and send timeout of a UDP channel.
///
/// ```
/// use core::time::Duration;
/// use picolink_net_api::config::UdpTimeout;
///
/// assert_eq!(UdpTimeout::legacy(1000).effective(), Some(Duration::from_millis(1)));
/// assert_eq!(UdpTimeout::from_millis(1000).effective(), Some(Duration::from_secs(1)));
/// assert_eq!(UdpTimeout::legacy(0).effective(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct UdpTimeout {
    value: u64,
    #[serde(default)]
    unit: TimeoutUnit,
}

impl UdpTimeout {
    /// A nominal "milliseconds" value that is applied as microseconds.
    ///
    /// `legacy(1000)` times out after 1 ms, not 1 s.
    pub const fn legacy(value: u64) -> Self {
        Self {
            value,
            unit: TimeoutUnit::Legacy,
        }
    }

    /// A timeout of `millis` milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            value: millis,
            unit: TimeoutUnit::Milliseconds,
        }
    }

    /// The numeric value as given.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// The unit the value is applied in.
    pub const fn unit(&self) -> TimeoutUnit {
        self.unit
    }

    /// The timeout applied to the socket, `None` meaning the socket blocks indefinitely.
    pub const fn effective(&self) -> Option<Duration> {
        if self.value == 0 {
            return None;
        }
        Some(match self.unit {
            TimeoutUnit::Legacy => Duration::from_micros(self.value),
            TimeoutUnit::Milliseconds => Duration::from_millis(self.value),
        })
    }
}

impl From<u64> for UdpTimeout {
    fn from(value: u64) -> Self {
        Self::legacy(value)
    }
}
