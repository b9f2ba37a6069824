//! Error taxonomy shared by every platform implementation.

use core::fmt::{Display, Formatter};

use embedded_io::ErrorKind;

use crate::net::resolve::ResolveError;

/// A raw error code reported by the operating system, if one was available.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, Default)]
pub struct OsError {
    code: Option<i32>,
}

impl OsError {
    /// Wraps a raw OS error code.
    pub const fn new(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// An error for which the platform reported no code.
    pub const fn unknown() -> Self {
        Self { code: None }
    }

    /// Returns the raw OS error code, if any.
    pub const fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<Option<i32>> for OsError {
    fn from(code: Option<i32>) -> Self {
        Self { code }
    }
}

impl Display for OsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self.code {
            Some(code) => write!(f, "os error {code}"),
            None => write!(f, "unknown os error"),
        }
    }
}

/// Socket options applied while opening a channel.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
pub enum SocketOption {
    /// `SO_KEEPALIVE`.
    KeepAlive,
    /// `SO_LINGER`.
    Linger,
    /// `SO_NOSIGPIPE`.
    NoSigPipe,
    /// `SO_RCVTIMEO`.
    ReceiveTimeout,
    /// `SO_SNDTIMEO`.
    SendTimeout,
}

impl Display for SocketOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            SocketOption::KeepAlive => "SO_KEEPALIVE",
            SocketOption::Linger => "SO_LINGER",
            SocketOption::NoSigPipe => "SO_NOSIGPIPE",
            SocketOption::ReceiveTimeout => "SO_RCVTIMEO",
            SocketOption::SendTimeout => "SO_SNDTIMEO",
        };
        f.write_str(name)
    }
}

/// Reasons a channel could not be opened.
///
/// A failed open never leaves a live socket behind.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    /// The local address for the socket could not be resolved.
    #[error("could not resolve the local address: {0}")]
    Resolution(#[from] ResolveError),

    /// The operating system refused to create a socket.
    #[error("could not allocate a socket: {0}")]
    Allocation(OsError),

    /// A required socket option could not be applied.
    #[error("could not set {option}: {error}")]
    Configuration {
        /// The option that failed.
        option: SocketOption,
        /// The error reported by the operating system.
        error: OsError,
    },

    /// Every candidate address refused the connection.
    #[error("no candidate address accepted the connection")]
    Connection,
}

/// Errors reported by channel reads, writes and closes.
#[derive(thiserror::Error, Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
pub enum Error {
    /// The channel has been closed and must not be used anymore.
    #[error("the channel is closed")]
    Closed,
    /// The connection was refused, aborted or reset by the peer.
    #[error("the connection was reset")]
    ConnectionReset,
    /// The peer is gone and no more data can be written.
    #[error("broken pipe")]
    BrokenPipe,
    /// The configured receive or send timeout expired.
    #[error("the operation timed out")]
    TimedOut,
    /// No route to host.
    #[error("no route to host")]
    NoRoute,
    /// No permission to access the resource.
    #[error("permission denied")]
    PermissionDenied,
    /// The network stack is down.
    #[error("the network is down")]
    NetworkDown,
    /// Any other failure; the OS error code is kept for inspection.
    #[error("i/o error: {0}")]
    Other(OsError),
}

impl embedded_io::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Closed => ErrorKind::NotConnected,
            Error::ConnectionReset => ErrorKind::ConnectionReset,
            Error::BrokenPipe => ErrorKind::BrokenPipe,
            Error::TimedOut => ErrorKind::TimedOut,
            Error::NoRoute => ErrorKind::Other,
            Error::PermissionDenied => ErrorKind::PermissionDenied,
            Error::NetworkDown => ErrorKind::NotConnected,
            Error::Other(_) => ErrorKind::Other,
        }
    }
}

/// Failure of an exact read.
///
/// `filled` is the number of bytes already written to the front of the destination buffer when
/// the failure happened. Those bytes are valid, the rest of the buffer is untouched.
#[derive(thiserror::Error, Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum ReadExactError {
    /// The peer closed the stream before the buffer was filled.
    #[error("stream closed after {filled} bytes")]
    UnexpectedEof {
        /// Bytes received before the stream closed.
        filled: usize,
    },

    /// A single read failed.
    #[error("read failed after {filled} bytes: {source}")]
    Read {
        /// Bytes received before the failing read.
        filled: usize,
        /// The error of the failing read.
        source: Error,
    },
}

impl ReadExactError {
    /// Returns the number of valid bytes at the front of the destination buffer.
    pub fn filled(&self) -> usize {
        match self {
            ReadExactError::UnexpectedEof { filled } | ReadExactError::Read { filled, .. } => {
                *filled
            }
        }
    }

    /// Returns the underlying read error, if the failure was not an early end of stream.
    pub fn read_error(&self) -> Option<Error> {
        match self {
            ReadExactError::UnexpectedEof { .. } => None,
            ReadExactError::Read { source, .. } => Some(*source),
        }
    }
}
