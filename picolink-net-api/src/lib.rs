//! The picolink transport abstraction layer API.
//!
//! Resolves textual addresses into endpoints, opens blocking TCP and UDP channels on them and
//! moves raw bytes. Framing, serialization and session handling live in the layers above.

#![no_std]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(any(test, feature = "test-suites"))]
extern crate std;

pub mod config;
mod error;
pub mod net;

pub use error::{Error, OpenError, OsError, ReadExactError, SocketOption};
