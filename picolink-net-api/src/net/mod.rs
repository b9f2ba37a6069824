//! Network abstraction layer for TCP and UDP channels.
//!
//! Provides the platform-agnostic data model and traits. Platform crates implement
//! [`resolve::Resolver`], [`tcp::TcpTransport`] and [`udp::UdpTransport`].

pub mod endpoint;
pub mod locator;
pub mod read_exact;
pub mod resolve;
pub mod tcp;
pub mod udp;
