//! Local socket relay that stages JSON messages on disk as protobuf.
//!
//! A producer connects to the relay's local socket, writes one JSON message
//! and closes its side. The relay decodes it, re-encodes it as a compact
//! protobuf record and overwrites a single output file with the result, so
//! the file always holds the most recently received message.
//!
//! # Crate Structure
//!
//! - [`transport`] — Local sockets (abstract namespace, filesystem UDS)
//! - [`codec`] — JSON decode and protobuf encode of messages
//! - [`relay`] — Persistence sink, connection handler and accept loop

/// Re-export transport types.
pub mod transport {
    pub use msgrelay_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use msgrelay_codec::*;
}

/// Re-export relay types.
pub mod relay {
    pub use msgrelay_relay::*;
}
