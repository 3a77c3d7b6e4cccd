//! Local socket transport for msgrelay.
//!
//! Binds the relay's listening socket and hands out connected streams.
//! On Linux the default address lives in the abstract namespace, so no
//! filesystem entry is created and nothing needs cleanup. Filesystem socket
//! paths are supported as a portable fallback.
//!
//! This is the lowest layer of msgrelay. Everything else builds on top of
//! the [`LocalStream`] type provided here.

pub mod address;
pub mod error;
#[cfg(unix)]
pub mod stream;

#[cfg(unix)]
pub mod socket;

pub use address::ListenAddress;
pub use error::{Result, TransportError};
#[cfg(unix)]
pub use stream::LocalStream;

#[cfg(unix)]
pub use socket::LocalSocket;
