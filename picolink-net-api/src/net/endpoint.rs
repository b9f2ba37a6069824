//! Resolved endpoints and their address candidates.

use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use core::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::net::resolve::ResolveError;

/// The transport a socket is opened for.
///
/// Pins the socket type and protocol of every candidate resolved for it.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Stream sockets speaking TCP.
    Tcp,
    /// Datagram sockets speaking UDP.
    Udp,
}

impl Transport {
    /// Returns the socket type used for this transport.
    pub const fn socket_type(self) -> SocketType {
        match self {
            Transport::Tcp => SocketType::Stream,
            Transport::Udp => SocketType::Datagram,
        }
    }

    /// Returns the protocol used for this transport.
    pub const fn protocol(self) -> Protocol {
        match self {
            Transport::Tcp => Protocol::Tcp,
            Transport::Udp => Protocol::Udp,
        }
    }

    /// The locator prefix of this transport.
    pub const fn as_str(self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
        }
    }
}

impl Display for Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Socket type of a candidate.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum SocketType {
    /// `SOCK_STREAM`.
    Stream,
    /// `SOCK_DGRAM`.
    Datagram,
}

/// Protocol of a candidate.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum Protocol {
    /// `IPPROTO_TCP`.
    Tcp,
    /// `IPPROTO_UDP`.
    Udp,
}

/// Address family of a candidate.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum AddressFamily {
    /// `AF_INET`.
    Ipv4,
    /// `AF_INET6`.
    Ipv6,
}

impl AddressFamily {
    /// Returns the family of `address`.
    pub const fn of(address: &SocketAddr) -> Self {
        match address {
            SocketAddr::V4(_) => AddressFamily::Ipv4,
            SocketAddr::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// Returns the unspecified ("any") address of this family.
    pub const fn unspecified(self) -> IpAddr {
        match self {
            AddressFamily::Ipv4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            AddressFamily::Ipv6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }
}

/// One address an endpoint can be reached at.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub struct Candidate {
    transport: Transport,
    address: SocketAddr,
}

impl Candidate {
    /// Creates a candidate for `address` reachable over `transport`.
    pub const fn new(transport: Transport, address: SocketAddr) -> Self {
        Self { transport, address }
    }

    /// Creates a bindable candidate with the unspecified address of `family` and port `0`.
    pub const fn passive(family: AddressFamily, transport: Transport) -> Self {
        Self::new(transport, SocketAddr::new(family.unspecified(), 0))
    }

    /// The transport this candidate was resolved for.
    pub const fn transport(&self) -> Transport {
        self.transport
    }

    /// The address family of this candidate.
    pub const fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.address)
    }

    /// The socket type of this candidate.
    pub const fn socket_type(&self) -> SocketType {
        self.transport.socket_type()
    }

    /// The protocol of this candidate.
    pub const fn protocol(&self) -> Protocol {
        self.transport.protocol()
    }

    /// The socket address of this candidate.
    pub const fn address(&self) -> SocketAddr {
        self.address
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.transport, self.address)
    }
}

/// An ordered, non-empty list of candidates sharing one transport.
///
/// Produced by a [`Resolver`](crate::net::resolve::Resolver) and consumed by the transports'
/// `open` operations. An endpoint can be reused to reopen a channel.
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct Endpoint {
    transport: Transport,
    // Never empty.
    candidates: Vec<Candidate>,
}

impl Endpoint {
    /// Builds an endpoint from resolved addresses, keeping their order.
    ///
    /// Fails with [`ResolveError::NoCandidates`] if `addresses` is empty.
    pub fn from_addresses(
        transport: Transport,
        addresses: impl IntoIterator<Item = SocketAddr>,
    ) -> Result<Self, ResolveError> {
        let candidates: Vec<Candidate> = addresses
            .into_iter()
            .map(|address| Candidate::new(transport, address))
            .collect();

        if candidates.is_empty() {
            return Err(ResolveError::NoCandidates);
        }

        Ok(Self {
            transport,
            candidates,
        })
    }

    /// Builds an endpoint holding the single passive candidate matching `remote`.
    pub fn passive_for(remote: &Candidate) -> Self {
        Self {
            transport: remote.transport(),
            candidates: alloc::vec![Candidate::passive(remote.family(), remote.transport())],
        }
    }

    /// The transport of every candidate.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// The first candidate.
    pub fn first(&self) -> &Candidate {
        // `candidates` is never empty.
        &self.candidates[0]
    }

    /// All candidates in resolution order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of candidates, always at least one.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<'a> IntoIterator for &'a Endpoint {
    type Item = &'a Candidate;
    type IntoIter = core::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::{AddressFamily, Candidate, Endpoint, Protocol, SocketType, Transport};
    use crate::net::resolve::ResolveError;
    use alloc::string::ToString;
    use core::net::SocketAddr;

    #[test]
    fn empty_endpoint_is_rejected() {
        assert_eq!(
            Endpoint::from_addresses(Transport::Tcp, core::iter::empty()),
            Err(ResolveError::NoCandidates)
        );
    }

    #[test]
    fn candidates_keep_order_and_transport() {
        let first: SocketAddr = "[::1]:7447".parse().unwrap();
        let second: SocketAddr = "127.0.0.1:7447".parse().unwrap();
        let endpoint = Endpoint::from_addresses(Transport::Udp, [first, second]).unwrap();

        assert_eq!(endpoint.len(), 2);
        assert_eq!(endpoint.first().address(), first);
        assert_eq!(endpoint.first().family(), AddressFamily::Ipv6);
        assert_eq!(endpoint.candidates()[1].family(), AddressFamily::Ipv4);
        for candidate in &endpoint {
            assert_eq!(candidate.socket_type(), SocketType::Datagram);
            assert_eq!(candidate.protocol(), Protocol::Udp);
        }
    }

    #[test]
    fn passive_borrows_family_and_transport() {
        let remote = Candidate::new(Transport::Udp, "[2001:db8::1]:7447".parse().unwrap());
        let local = Endpoint::passive_for(&remote);

        assert_eq!(local.len(), 1);
        assert_eq!(local.transport(), Transport::Udp);
        assert_eq!(local.first().address(), "[::]:0".parse().unwrap());

        let remote = Candidate::new(Transport::Udp, "10.0.0.1:7447".parse().unwrap());
        assert_eq!(
            Endpoint::passive_for(&remote).first().address(),
            "0.0.0.0:0".parse().unwrap()
        );
    }

    #[test]
    fn candidate_display() {
        let candidate = Candidate::new(Transport::Tcp, "127.0.0.1:7447".parse().unwrap());
        assert_eq!(candidate.to_string(), "tcp/127.0.0.1:7447");
    }
}
