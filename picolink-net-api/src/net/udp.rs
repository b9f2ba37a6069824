//! UDP channel abstractions.

use core::net::SocketAddr;

use crate::config::UdpTimeout;
use crate::error::{Error, OpenError, ReadExactError};
use crate::net::endpoint::Endpoint;
use crate::net::read_exact::{ZeroRead, fill_exact};

/// Opens UDP channels.
///
/// The channel is bound to an OS-assigned port on the unspecified address of the remote
/// endpoint's family. It is not connected: it sends to any destination and receives from any
/// source.
///
/// # Example
///
/// ```no_run
/// use picolink_net_api::config::UdpTimeout;
/// use picolink_net_api::net::endpoint::Endpoint;
/// use picolink_net_api::net::udp::{UdpChannel, UdpTransport};
///
/// fn scout(transport: &impl UdpTransport, endpoint: &Endpoint) {
///     let mut channel = transport.open(endpoint, UdpTimeout::from_millis(500)).unwrap();
///     channel.send_to(b"hello", endpoint).unwrap();
///
///     let mut buffer = [0u8; 1500];
///     let _read = channel.read(&mut buffer);
/// }
/// ```
pub trait UdpTransport {
    /// The channel type produced by this transport.
    type Channel: UdpChannel;

    /// Opens a local datagram socket matching `endpoint`'s first candidate.
    ///
    /// Both the receive and the send timeout are set from `timeout`.
    fn open(&self, endpoint: &Endpoint, timeout: UdpTimeout) -> Result<Self::Channel, OpenError>;
}

/// An open UDP channel.
///
/// The channel owns its socket; closing or dropping it releases the socket.
pub trait UdpChannel: core::fmt::Debug {
    /// The local address the channel is bound to.
    fn local_addr(&self) -> Result<SocketAddr, Error>;

    /// Receives one datagram into `buffer`.
    ///
    /// Bytes of the datagram beyond `buffer.len()` are discarded by the platform.
    /// Fails with [`Error::TimedOut`] once the receive timeout expires.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error>;

    /// Fills `buffer` completely from consecutive datagrams.
    ///
    /// Zero-length datagrams are skipped. Returns at the first failing read; the error reports
    /// how many bytes at the front of `buffer` were filled before the failure.
    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), ReadExactError> {
        fill_exact(buffer, ZeroRead::Skip, |buffer| self.read(buffer))
    }

    /// Sends `buffer` as one datagram to the first candidate of `endpoint`.
    fn send_to(&mut self, buffer: &[u8], endpoint: &Endpoint) -> Result<usize, Error>;

    /// Releases the socket.
    ///
    /// Every later operation fails with [`Error::Closed`].
    fn close(&mut self) -> Result<(), Error>;

    /// Whether [`Self::close`] was called.
    fn is_closed(&self) -> bool;
}

#[doc(hidden)]
#[cfg(feature = "test-suites")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod test_suite {
    #![expect(missing_docs, reason = "tests")]
    //! Test suite for UDP transports.

    use crate::config::UdpTimeout;
    use crate::error::{Error, ReadExactError};
    use crate::net::endpoint::{Endpoint, Transport};
    use crate::net::udp::{UdpChannel, UdpTransport};
    use std::net::{IpAddr, SocketAddr, UdpSocket};
    use std::time::{Duration, Instant};
    use std::vec::Vec;

    fn peer(ip_address: IpAddr) -> (UdpSocket, Endpoint) {
        let socket = UdpSocket::bind((ip_address, 0)).unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let endpoint =
            Endpoint::from_addresses(Transport::Udp, [socket.local_addr().unwrap()]).unwrap();
        (socket, endpoint)
    }

    /// The loopback address the channel can be reached at.
    fn reachable(channel: &impl UdpChannel, ip_address: IpAddr) -> SocketAddr {
        SocketAddr::new(ip_address, channel.local_addr().unwrap().port())
    }

    pub fn test_send_recv(transport: impl UdpTransport, ip_address: &str) {
        let ip_address: IpAddr = ip_address.parse().unwrap();
        let (peer, endpoint) = peer(ip_address);
        let mut channel = transport
            .open(&endpoint, UdpTimeout::from_millis(5_000))
            .unwrap();

        let send_data = b"Hello, UDP!";
        let sent = channel.send_to(send_data, &endpoint).unwrap();
        assert_eq!(sent, send_data.len());

        let mut recv_buffer = [0u8; 64];
        let (received, sender_addr) = peer.recv_from(&mut recv_buffer).unwrap();
        assert_eq!(&recv_buffer[..received], send_data);
        assert_eq!(sender_addr.port(), channel.local_addr().unwrap().port());

        let response = b"Hello back!";
        peer.send_to(response, sender_addr).unwrap();

        let received = channel.read(&mut recv_buffer).unwrap();
        assert_eq!(&recv_buffer[..received], response);

        channel.close().unwrap();
    }

    pub fn test_send_to_self(transport: impl UdpTransport, ip_address: &str) {
        let ip_address: IpAddr = ip_address.parse().unwrap();
        let (_peer, remote) = peer(ip_address);
        let mut channel = transport
            .open(&remote, UdpTimeout::from_millis(5_000))
            .unwrap();

        let local = channel.local_addr().unwrap();
        assert_eq!(local.is_ipv6(), ip_address.is_ipv6());
        assert!(local.ip().is_unspecified());
        assert_ne!(local.port(), 0, "port should be automatically assigned");

        let own = Endpoint::from_addresses(Transport::Udp, [reachable(&channel, ip_address)])
            .unwrap();
        let payload: Vec<u8> = (0..=255).collect();
        assert_eq!(channel.send_to(&payload, &own).unwrap(), payload.len());

        let mut buffer = [0u8; 512];
        let received = channel.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..received], &payload[..]);
    }

    pub fn test_read_exact_across_datagrams(transport: impl UdpTransport, ip_address: &str) {
        let ip_address: IpAddr = ip_address.parse().unwrap();
        let (peer, remote) = peer(ip_address);
        let mut channel = transport
            .open(&remote, UdpTimeout::from_millis(5_000))
            .unwrap();
        let target = reachable(&channel, ip_address);

        for datagram in [&b"PO"[..], &b""[..], &b"NG"[..]] {
            peer.send_to(datagram, target).unwrap();
        }

        let mut buffer = [0u8; 4];
        channel.read_exact(&mut buffer).unwrap();
        assert_eq!(&buffer, b"PONG");
    }

    pub fn test_legacy_timeout_is_microseconds(transport: impl UdpTransport, ip_address: &str) {
        let ip_address: IpAddr = ip_address.parse().unwrap();
        let (_peer, remote) = peer(ip_address);
        let mut channel = transport.open(&remote, UdpTimeout::legacy(1000)).unwrap();

        let start = Instant::now();
        let mut buffer = [0u8; 16];
        assert_eq!(channel.read(&mut buffer), Err(Error::TimedOut));
        assert!(
            start.elapsed() < Duration::from_millis(500),
            "a nominal 1000 must time out after about 1 ms, took {:?}",
            start.elapsed()
        );
    }

    pub fn test_millisecond_timeout(transport: impl UdpTransport, ip_address: &str) {
        let ip_address: IpAddr = ip_address.parse().unwrap();
        let (_peer, remote) = peer(ip_address);
        let mut channel = transport
            .open(&remote, UdpTimeout::from_millis(100))
            .unwrap();

        let start = Instant::now();
        let mut buffer = [0u8; 16];
        assert_eq!(
            channel.read_exact(&mut buffer),
            Err(ReadExactError::Read {
                filled: 0,
                source: Error::TimedOut
            })
        );
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    pub fn test_use_after_close(transport: impl UdpTransport, ip_address: &str) {
        let ip_address: IpAddr = ip_address.parse().unwrap();
        let (_peer, remote) = peer(ip_address);
        let mut channel = transport
            .open(&remote, UdpTimeout::from_millis(100))
            .unwrap();

        assert!(!channel.is_closed());
        channel.close().unwrap();
        assert!(channel.is_closed());

        let mut buffer = [0u8; 16];
        assert_eq!(channel.read(&mut buffer), Err(Error::Closed));
        assert_eq!(channel.send_to(b"late", &remote), Err(Error::Closed));
        assert_eq!(channel.local_addr(), Err(Error::Closed));
        assert_eq!(channel.close(), Err(Error::Closed));
    }
}
