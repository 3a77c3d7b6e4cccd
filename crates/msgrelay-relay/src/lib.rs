//! Accept-decode-transcode-persist relay.
//!
//! One connection at a time: read the JSON payload to end-of-stream, decode
//! it, re-encode it as protobuf and overwrite the single output file with
//! the result. Processing is strictly sequential, which is what keeps the
//! output file free of interleaved writes; there is no locking around the
//! [`PersistenceSink`]. Any per-connection failure is logged and the loop
//! moves on to the next connection.

pub mod config;
pub mod error;
pub mod sink;

#[cfg(unix)]
pub mod client;
pub mod handler;
#[cfg(unix)]
pub mod server;

#[cfg(unix)]
pub use client::send_payload;
pub use config::{RelayConfig, DEFAULT_OUTPUT_PREFIX};
pub use error::{PersistError, RelayError, Result, Stage};
pub use handler::{handle_connection, Delivery, InboundConnection, PeerCredentials};
#[cfg(unix)]
pub use server::{Acceptor, RelayServer};
pub use sink::PersistenceSink;
