//! Std transport layer for picolink.
//!
//! Implements the [`picolink_net_api`] traits on blocking BSD sockets through `socket2`.

#![forbid(unsafe_code)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod net;
pub mod platform;

pub use picolink_net_api::config::{TransportConfig, UdpTimeout};
pub use picolink_net_api::{Error, OpenError, ReadExactError};

/// Helper trait to convert errors into transport errors.
///
/// We cannot implement `From` as that would be part of the public API.
pub(crate) trait IntoNetError<E> {
    /// Converts the error into a transport error.
    fn into_net_error(self) -> E;
}

impl IntoNetError<picolink_net_api::OsError> for std::io::Error {
    fn into_net_error(self) -> picolink_net_api::OsError {
        picolink_net_api::OsError::from(self.raw_os_error())
    }
}

impl IntoNetError<Error> for std::io::Error {
    fn into_net_error(self) -> Error {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::PermissionDenied => Error::PermissionDenied,
            ErrorKind::ConnectionRefused => Error::ConnectionReset,
            ErrorKind::ConnectionReset => Error::ConnectionReset,
            ErrorKind::ConnectionAborted => Error::ConnectionReset,
            ErrorKind::BrokenPipe => Error::BrokenPipe,
            ErrorKind::HostUnreachable => Error::NoRoute,
            ErrorKind::NetworkUnreachable => Error::NoRoute,
            ErrorKind::NetworkDown => Error::NetworkDown,
            // Receive timeouts surface as `EAGAIN` on most unix platforms.
            ErrorKind::TimedOut | ErrorKind::WouldBlock => Error::TimedOut,
            _ => Error::Other(self.into_net_error()),
        }
    }
}
