//! Socket-backed implementations of the transport traits.

pub mod resolve;
pub mod tcp;
pub mod udp;

use picolink_net_api::OpenError;
use picolink_net_api::net::endpoint::{AddressFamily, Candidate, Protocol, SocketType};
use socket2::{Domain, Socket, Type};

use crate::IntoNetError;

/// Creates an unconfigured socket matching the candidate's family, type and protocol.
pub(crate) fn socket_for(candidate: &Candidate) -> Result<Socket, OpenError> {
    let domain = match candidate.family() {
        AddressFamily::Ipv4 => Domain::IPV4,
        AddressFamily::Ipv6 => Domain::IPV6,
    };
    let socket_type = match candidate.socket_type() {
        SocketType::Stream => Type::STREAM,
        SocketType::Datagram => Type::DGRAM,
    };
    let protocol = match candidate.protocol() {
        Protocol::Tcp => socket2::Protocol::TCP,
        Protocol::Udp => socket2::Protocol::UDP,
    };

    Socket::new(domain, socket_type, Some(protocol)).map_err(|error| {
        tracing::warn!(%candidate, %error, "socket allocation failed");
        OpenError::Allocation(error.into_net_error())
    })
}
