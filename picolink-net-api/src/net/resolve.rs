//! Endpoint resolution.
//!
//! To get started, see [`Resolver`].

use alloc::string::String;

use crate::net::endpoint::{Candidate, Endpoint, Transport};
use crate::net::locator::Locator;

/// Turns textual host and port strings into [`Endpoint`]s.
///
/// Candidates may be IPv4 and/or IPv6; their socket type and protocol are pinned to the requested
/// transport. Candidate order follows the platform resolver.
///
/// # Example
///
/// ```no_run
/// use picolink_net_api::net::endpoint::Transport;
/// use picolink_net_api::net::resolve::Resolver;
///
/// fn resolve_router(resolver: &impl Resolver) {
///     let endpoint = resolver.resolve("127.0.0.1", "7447", Transport::Tcp).unwrap();
///     assert!(!endpoint.candidates().is_empty());
/// }
/// ```
pub trait Resolver {
    /// Resolves `host` and `port` into an endpoint for `transport`.
    ///
    /// `host` is a name or a numeric address; `port` is a decimal port number.
    fn resolve(&self, host: &str, port: &str, transport: Transport)
    -> Result<Endpoint, ResolveError>;

    /// Resolves a bindable local endpoint with an OS-assigned port.
    ///
    /// Family, socket type and protocol are borrowed from `remote`.
    fn resolve_passive(&self, remote: &Candidate) -> Result<Endpoint, ResolveError> {
        Ok(Endpoint::passive_for(remote))
    }

    /// Resolves a parsed [`Locator`].
    fn resolve_locator(&self, locator: &Locator) -> Result<Endpoint, ResolveError> {
        let port = alloc::format!("{}", locator.port());
        self.resolve(locator.host(), &port, locator.transport())
    }
}

/// Errors that can occur while resolving an endpoint.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The port is not a decimal number in `0..=65535`.
    #[error("invalid port `{0}`")]
    InvalidPort(String),

    /// The platform resolver reported an error for this host.
    #[error("could not resolve host `{0}`")]
    Lookup(String),

    /// Resolution succeeded but produced no candidates.
    #[error("resolution produced no candidates")]
    NoCandidates,
}

#[doc(hidden)]
#[cfg(feature = "test-suites")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod test_suite {
    #![expect(missing_docs, reason = "tests")]
    //! Test suite for resolvers.

    use crate::net::endpoint::{AddressFamily, Transport};
    use crate::net::locator::Locator;
    use crate::net::resolve::{ResolveError, Resolver};
    use std::net::SocketAddr;

    pub fn test_resolve_numeric_v4(resolver: impl Resolver) {
        let endpoint = resolver
            .resolve("127.0.0.1", "7447", Transport::Tcp)
            .unwrap();

        assert_eq!(endpoint.transport(), Transport::Tcp);
        assert_eq!(
            endpoint.first().address(),
            "127.0.0.1:7447".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(endpoint.first().family(), AddressFamily::Ipv4);
    }

    pub fn test_resolve_numeric_v6(resolver: impl Resolver) {
        let endpoint = resolver.resolve("::1", "7447", Transport::Udp).unwrap();

        assert_eq!(endpoint.transport(), Transport::Udp);
        assert_eq!(
            endpoint.first().address(),
            "[::1]:7447".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(endpoint.first().family(), AddressFamily::Ipv6);
    }

    pub fn test_resolve_localhost(resolver: impl Resolver) {
        let endpoint = resolver.resolve("localhost", "7447", Transport::Tcp).unwrap();

        for candidate in &endpoint {
            assert!(candidate.address().ip().is_loopback());
            assert_eq!(candidate.address().port(), 7447);
            assert_eq!(candidate.transport(), Transport::Tcp);
        }
    }

    pub fn test_resolve_unknown_host(resolver: impl Resolver) {
        assert!(matches!(
            resolver.resolve("nonexistent.invalid", "7447", Transport::Tcp),
            Err(ResolveError::Lookup(_))
        ));
    }

    pub fn test_resolve_invalid_port(resolver: impl Resolver) {
        for port in ["", "http", "-1", "65536"] {
            assert_eq!(
                resolver.resolve("127.0.0.1", port, Transport::Tcp),
                Err(ResolveError::InvalidPort(port.into()))
            );
        }
    }

    pub fn test_resolve_passive(resolver: impl Resolver) {
        let remote = resolver.resolve("::1", "7447", Transport::Udp).unwrap();
        let local = resolver.resolve_passive(remote.first()).unwrap();

        assert_eq!(local.len(), 1);
        assert_eq!(local.transport(), Transport::Udp);
        assert_eq!(local.first().family(), AddressFamily::Ipv6);
        assert!(local.first().address().ip().is_unspecified());
        assert_eq!(local.first().address().port(), 0);
    }

    pub fn test_resolve_locator(resolver: impl Resolver) {
        let locator: Locator = "udp/127.0.0.1:7447".parse().unwrap();
        let endpoint = resolver.resolve_locator(&locator).unwrap();

        assert_eq!(endpoint.transport(), Transport::Udp);
        assert_eq!(
            endpoint.first().address(),
            "127.0.0.1:7447".parse::<SocketAddr>().unwrap()
        );
    }
}
