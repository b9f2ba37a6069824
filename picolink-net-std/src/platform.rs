//! Build-time platform capabilities.
//!
//! A write on a stream whose peer has gone away raises `SIGPIPE` on unix platforms, which
//! terminates the process by default. Platforms differ in how the signal is suppressed: Apple
//! platforms offer the `SO_NOSIGPIPE` socket option, Linux and the BSDs accept `MSG_NOSIGNAL` on
//! every send.

use socket2::Socket;

/// How `SIGPIPE` is kept away from the process on writes to a broken stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigPipeSuppression {
    /// `SO_NOSIGPIPE` is set once on every stream socket.
    SocketOption,
    /// `MSG_NOSIGNAL` is passed on every send.
    SendFlag,
    /// The platform does not raise `SIGPIPE` for sockets.
    Unavailable,
}

/// Capabilities of the platform this crate was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    sigpipe: SigPipeSuppression,
}

impl Platform {
    /// Returns the capabilities of the build target.
    pub const fn current() -> Self {
        #[cfg(target_vendor = "apple")]
        let sigpipe = SigPipeSuppression::SocketOption;
        #[cfg(any(
            target_os = "linux",
            target_os = "android",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd",
            target_os = "dragonfly",
        ))]
        let sigpipe = SigPipeSuppression::SendFlag;
        #[cfg(not(any(
            target_vendor = "apple",
            target_os = "linux",
            target_os = "android",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd",
            target_os = "dragonfly",
        )))]
        let sigpipe = SigPipeSuppression::Unavailable;

        Self { sigpipe }
    }

    /// How `SIGPIPE` is suppressed on this platform.
    pub const fn sigpipe(&self) -> SigPipeSuppression {
        self.sigpipe
    }

    /// Flags passed to every stream send.
    pub(crate) const fn send_flags(&self) -> i32 {
        match self.sigpipe {
            SigPipeSuppression::SendFlag => NO_SIGNAL,
            SigPipeSuppression::SocketOption | SigPipeSuppression::Unavailable => 0,
        }
    }

    /// Applies the socket-level `SIGPIPE` suppression, if this platform has one.
    pub(crate) fn suppress_sigpipe(&self, socket: &Socket) -> std::io::Result<()> {
        match self.sigpipe {
            SigPipeSuppression::SocketOption => set_nosigpipe(socket),
            SigPipeSuppression::SendFlag | SigPipeSuppression::Unavailable => Ok(()),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
))]
const NO_SIGNAL: i32 = libc::MSG_NOSIGNAL;
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
)))]
const NO_SIGNAL: i32 = 0;

#[cfg(target_vendor = "apple")]
fn set_nosigpipe(socket: &Socket) -> std::io::Result<()> {
    socket.set_nosigpipe(true)
}

#[cfg(not(target_vendor = "apple"))]
fn set_nosigpipe(_socket: &Socket) -> std::io::Result<()> {
    Ok(())
}
