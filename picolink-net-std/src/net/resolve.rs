//! Name resolution through the platform resolver.

use std::net::ToSocketAddrs;

use picolink_net_api::net::endpoint::{Endpoint, Transport};
use picolink_net_api::net::resolve::ResolveError;

/// Resolves hosts with the platform's `getaddrinfo`.
///
/// Numeric addresses are parsed directly, names go through the system resolver and may block.
#[derive(Debug, Default, Clone, Copy)]
pub struct Resolver;

impl Resolver {
    /// Creates a new `Resolver`.
    pub fn new() -> Self {
        Self
    }
}

impl picolink_net_api::net::resolve::Resolver for Resolver {
    fn resolve(
        &self,
        host: &str,
        port: &str,
        transport: Transport,
    ) -> Result<Endpoint, ResolveError> {
        // Service names are not looked up.
        let port_number: u16 = port
            .parse()
            .map_err(|_| ResolveError::InvalidPort(port.to_owned()))?;

        let addresses = (host, port_number).to_socket_addrs().map_err(|error| {
            tracing::debug!(host, %error, "lookup failed");
            ResolveError::Lookup(host.to_owned())
        })?;

        let endpoint = Endpoint::from_addresses(transport, addresses)?;
        tracing::debug!(
            host,
            port = port_number,
            %transport,
            candidates = endpoint.len(),
            "resolved endpoint"
        );
        Ok(endpoint)
    }
}
