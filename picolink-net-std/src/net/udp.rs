//! UDP channel implementation for the std platform.

use std::io::Read;
use std::net::SocketAddr;

use picolink_net_api::config::UdpTimeout;
use picolink_net_api::net::endpoint::Endpoint;
use picolink_net_api::net::resolve::Resolver as _;
use picolink_net_api::{Error, OpenError, OsError, SocketOption};
use socket2::Socket;

use crate::IntoNetError;
use crate::net::resolve::Resolver;
use crate::net::socket_for;

/// Opens UDP channels bound to an OS-assigned local port.
#[derive(Debug, Default, Clone)]
pub struct UdpTransport {
    resolver: Resolver,
}

impl UdpTransport {
    /// Creates a new `UdpTransport`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl picolink_net_api::net::udp::UdpTransport for UdpTransport {
    type Channel = UdpChannel;

    fn open(&self, endpoint: &Endpoint, timeout: UdpTimeout) -> Result<UdpChannel, OpenError> {
        let local = self.resolver.resolve_passive(endpoint.first())?;
        let candidate = local.first();
        let socket = socket_for(candidate)?;

        let effective = timeout.effective();
        let configuration = |option: SocketOption| {
            move |error: std::io::Error| {
                tracing::warn!(%candidate, %option, %error, "socket configuration failed");
                OpenError::Configuration {
                    option,
                    error: error.into_net_error(),
                }
            }
        };
        socket
            .set_read_timeout(effective)
            .map_err(configuration(SocketOption::ReceiveTimeout))?;
        socket
            .set_write_timeout(effective)
            .map_err(configuration(SocketOption::SendTimeout))?;

        socket.bind(&candidate.address().into()).map_err(|error| {
            tracing::warn!(%candidate, %error, "bind failed");
            OpenError::Allocation(error.into_net_error())
        })?;

        tracing::debug!(remote = %endpoint.first(), ?effective, "udp channel opened");
        Ok(UdpChannel {
            socket: Some(socket),
        })
    }
}

/// An unconnected UDP channel.
pub struct UdpChannel {
    /// `None` once the channel was closed.
    socket: Option<Socket>,
}

impl core::fmt::Debug for UdpChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UdpChannel")
            .field("closed", &self.socket.is_none())
            .finish()
    }
}

impl UdpChannel {
    /// Hands out the underlying socket, `None` if the channel was closed.
    pub fn into_socket(self) -> Option<Socket> {
        self.socket
    }

    fn open_socket(&self) -> Result<&Socket, Error> {
        self.socket.as_ref().ok_or(Error::Closed)
    }
}

impl picolink_net_api::net::udp::UdpChannel for UdpChannel {
    fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.open_socket()?
            .local_addr()
            .map_err(IntoNetError::into_net_error)?
            .as_socket()
            .ok_or(Error::Other(OsError::unknown()))
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        let mut socket = self.open_socket()?;
        socket.read(buffer).map_err(IntoNetError::into_net_error)
    }

    fn send_to(&mut self, buffer: &[u8], endpoint: &Endpoint) -> Result<usize, Error> {
        self.open_socket()?
            .send_to(buffer, &endpoint.first().address().into())
            .map_err(IntoNetError::into_net_error)
    }

    fn close(&mut self) -> Result<(), Error> {
        let socket = self.socket.take().ok_or(Error::Closed)?;
        drop(socket);
        tracing::debug!("udp channel closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.socket.is_none()
    }
}
