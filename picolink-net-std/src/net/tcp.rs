//! TCP channel implementation for the std platform.

use std::io::Read;
use std::net::{Shutdown, SocketAddr};
use std::time::Duration;

use picolink_net_api::config::TransportConfig;
use picolink_net_api::net::endpoint::{Candidate, Endpoint};
use picolink_net_api::{Error, OpenError, SocketOption};
use socket2::Socket;

use crate::IntoNetError;
use crate::net::socket_for;
use crate::platform::Platform;

/// Opens TCP channels with keep-alive, linger and `SIGPIPE` suppression applied.
///
/// Every candidate gets a freshly created socket; a socket that failed to configure or connect is
/// dropped before the next candidate is tried.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    linger: Duration,
    platform: Platform,
}

impl TcpTransport {
    /// Creates a transport using the linger interval derived from `config`.
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            linger: config.linger(),
            platform: Platform::current(),
        }
    }

    fn configure(&self, socket: &Socket, candidate: &Candidate) -> Result<(), OpenError> {
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
            .set_keepalive(true)
            .map_err(configuration(SocketOption::KeepAlive))?;
        socket
            .set_linger(Some(self.linger))
            .map_err(configuration(SocketOption::Linger))?;
        self.platform
            .suppress_sigpipe(socket)
            .map_err(configuration(SocketOption::NoSigPipe))?;

        Ok(())
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl picolink_net_api::net::tcp::TcpTransport for TcpTransport {
    type Channel = TcpChannel;

    fn open(&self, endpoint: &Endpoint) -> Result<TcpChannel, OpenError> {
        let (socket, peer) = connect_first(endpoint, |candidate| {
            let socket = socket_for(candidate).map_err(CandidateFailure::Setup)?;
            self.configure(&socket, candidate).map_err(CandidateFailure::Setup)?;
            socket
                .connect(&candidate.address().into())
                .map_err(CandidateFailure::Connect)?;
            Ok((socket, candidate.address()))
        })?;

        tracing::debug!(%peer, "connected");
        Ok(TcpChannel {
            socket,
            peer,
            platform: self.platform,
            closed: false,
        })
    }
}

/// Why a single candidate did not yield a connected socket.
#[derive(Debug)]
enum CandidateFailure {
    /// The socket could not be created or configured.
    Setup(OpenError),
    /// The connect itself failed.
    Connect(std::io::Error),
}

/// Runs `attempt` on each candidate once, in order, and returns the first success.
///
/// A failing candidate never stops the walk. If no candidate got as far as a connect, the first
/// setup error is reported; otherwise the open fails with [`OpenError::Connection`].
fn connect_first<T>(
    endpoint: &Endpoint,
    mut attempt: impl FnMut(&Candidate) -> Result<T, CandidateFailure>,
) -> Result<T, OpenError> {
    let mut setup_error = None;
    let mut connect_attempted = false;

    for candidate in endpoint {
        match attempt(candidate) {
            Ok(connected) => return Ok(connected),
            Err(CandidateFailure::Setup(error)) => {
                tracing::debug!(%candidate, %error, "socket setup failed, trying next candidate");
                setup_error.get_or_insert(error);
            }
            Err(CandidateFailure::Connect(error)) => {
                tracing::debug!(%candidate, %error, "connect failed, trying next candidate");
                connect_attempted = true;
            }
        }
    }

    tracing::debug!(candidates = endpoint.len(), "no candidate accepted the connection");
    match setup_error {
        Some(error) if !connect_attempted => Err(error),
        _ => Err(OpenError::Connection),
    }
}

/// A connected TCP channel.
///
/// Implements [`embedded_io::Read`] and [`embedded_io::Write`] on top of the channel operations.
/// The socket is released when the channel is dropped.
pub struct TcpChannel {
    socket: Socket,
    peer: SocketAddr,
    platform: Platform,
    closed: bool,
}

impl core::fmt::Debug for TcpChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TcpChannel")
            .field("peer", &self.peer)
            .field("closed", &self.closed)
            .finish()
    }
}

impl TcpChannel {
    /// Hands out the underlying socket, for example to poll it with an event loop.
    pub fn into_socket(self) -> Socket {
        self.socket
    }

    fn open_socket(&self) -> Result<&Socket, Error> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(&self.socket)
    }
}

impl picolink_net_api::net::tcp::TcpChannel for TcpChannel {
    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        let mut socket = self.open_socket()?;
        socket.read(buffer).map_err(IntoNetError::into_net_error)
    }

    fn send(&mut self, buffer: &[u8]) -> Result<usize, Error> {
        self.open_socket()?
            .send_with_flags(buffer, self.platform.send_flags())
            .map_err(IntoNetError::into_net_error)
    }

    fn close(&mut self) -> Result<(), Error> {
        let socket = self.open_socket()?;
        let result = socket.shutdown(Shutdown::Both);
        self.closed = true;
        tracing::debug!(peer = %self.peer, "channel closed");

        match result {
            Ok(()) => Ok(()),
            // The peer may already have torn the connection down.
            Err(error) if error.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(error) => Err(error.into_net_error()),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl embedded_io::ErrorType for TcpChannel {
    type Error = Error;
}

impl embedded_io::Read for TcpChannel {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        picolink_net_api::net::tcp::TcpChannel::read(self, buffer)
    }
}

impl embedded_io::Write for TcpChannel {
    fn write(&mut self, buffer: &[u8]) -> Result<usize, Self::Error> {
        picolink_net_api::net::tcp::TcpChannel::send(self, buffer)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.open_socket().map(|_| ())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::{CandidateFailure, TcpTransport, connect_first};
    use picolink_net_api::config::TransportConfig;
    use picolink_net_api::net::endpoint::{Endpoint, Transport};
    use picolink_net_api::net::tcp::{TcpChannel as _, TcpTransport as _};
    use picolink_net_api::{OpenError, OsError, SocketOption};
    use std::io::{self, ErrorKind};
    use std::net::{SocketAddr, TcpListener};
    use std::time::Duration;

    fn connect(config: &TransportConfig) -> (super::TcpChannel, std::net::TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint =
            Endpoint::from_addresses(Transport::Tcp, [listener.local_addr().unwrap()]).unwrap();
        let channel = TcpTransport::new(config).open(&endpoint).unwrap();
        let (stream, _) = listener.accept().unwrap();
        (channel, stream)
    }

    fn three_candidates() -> Endpoint {
        let addresses: [SocketAddr; 3] = [
            "127.0.0.1:1".parse().unwrap(),
            "[::1]:2".parse().unwrap(),
            "127.0.0.1:3".parse().unwrap(),
        ];
        Endpoint::from_addresses(Transport::Tcp, addresses).unwrap()
    }

    fn allocation_failure() -> CandidateFailure {
        // EAFNOSUPPORT on Linux.
        CandidateFailure::Setup(OpenError::Allocation(OsError::new(97)))
    }

    fn refused() -> CandidateFailure {
        CandidateFailure::Connect(io::Error::from(ErrorKind::ConnectionRefused))
    }

    #[test]
    fn setup_failure_moves_on_to_later_candidates() {
        let endpoint = three_candidates();
        let mut attempted = Vec::new();

        let connected = connect_first(&endpoint, |candidate| {
            attempted.push(candidate.address().port());
            match candidate.address().port() {
                1 => Err(refused()),
                2 => Err(allocation_failure()),
                _ => Ok(candidate.address()),
            }
        });

        assert_eq!(connected.unwrap(), "127.0.0.1:3".parse().unwrap());
        assert_eq!(attempted, [1, 2, 3]);
    }

    #[test]
    fn every_candidate_is_attempted_once() {
        let endpoint = three_candidates();
        let mut attempted = Vec::new();

        let result = connect_first(&endpoint, |candidate| -> Result<(), _> {
            attempted.push(candidate.address().port());
            match candidate.address().port() {
                2 => Err(allocation_failure()),
                _ => Err(refused()),
            }
        });

        assert_eq!(result, Err(OpenError::Connection));
        assert_eq!(attempted, [1, 2, 3]);
    }

    #[test]
    fn setup_only_failures_report_the_first_setup_error() {
        let endpoint = three_candidates();
        let configuration = OpenError::Configuration {
            option: SocketOption::Linger,
            error: OsError::new(22),
        };

        let result = connect_first(&endpoint, |candidate| -> Result<(), _> {
            match candidate.address().port() {
                1 => Err(CandidateFailure::Setup(configuration.clone())),
                _ => Err(allocation_failure()),
            }
        });

        assert_eq!(result, Err(configuration));
    }

    #[test]
    fn huge_lease_keeps_a_graceful_linger() {
        let config = TransportConfig {
            lease_ms: 4_294_967_296_000,
            ..TransportConfig::default()
        };
        let (channel, _stream) = connect(&config);

        let linger = channel.into_socket().linger().unwrap();
        assert!(matches!(linger, Some(linger) if !linger.is_zero()), "{linger:?}");
    }

    #[test]
    fn applies_socket_options() {
        let config = TransportConfig {
            lease_ms: 2_500,
            ..TransportConfig::default()
        };
        let (channel, _stream) = connect(&config);
        let socket = channel.into_socket();

        assert!(socket.keepalive().unwrap());
        assert_eq!(socket.linger().unwrap(), Some(Duration::from_secs(2)));
        #[cfg(target_vendor = "apple")]
        assert!(socket.nosigpipe().unwrap());
    }

    #[test]
    fn embedded_io_round_trip() {
        use std::io::{Read, Write};

        let (mut channel, mut stream) = connect(&TransportConfig::default());

        embedded_io::Write::write_all(&mut channel, b"hello").unwrap();
        embedded_io::Write::flush(&mut channel).unwrap();
        let mut buffer = [0u8; 5];
        stream.read_exact(&mut buffer).unwrap();
        assert_eq!(&buffer, b"hello");

        stream.write_all(b"world").unwrap();
        embedded_io::Read::read_exact(&mut channel, &mut buffer).unwrap();
        assert_eq!(&buffer, b"world");

        channel.close().unwrap();
        assert_eq!(
            embedded_io::Write::flush(&mut channel),
            Err(picolink_net_api::Error::Closed)
        );
    }
}
