use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use msgrelay_codec::{decode_text, encode_binary, read_payload, CodecError, Message};
use tracing::debug;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::sink::PersistenceSink;

/// Credentials of the producer on the other end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerCredentials {
    pub uid: u32,
    pub gid: u32,
    pub pid: u32,
}

/// An accepted inbound connection the handler can drain.
pub trait InboundConnection: Read {
    /// Apply a read timeout before draining. `None` blocks indefinitely.
    fn set_read_timeout(&self, _timeout: Option<Duration>) -> std::io::Result<()> {
        Ok(())
    }

    fn peer_credentials(&self) -> Option<PeerCredentials> {
        None
    }
}

#[cfg(unix)]
impl InboundConnection for msgrelay_transport::LocalStream {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        msgrelay_transport::LocalStream::set_read_timeout(self, timeout).map_err(|err| match err {
            msgrelay_transport::TransportError::Io(io) => io,
            other => std::io::Error::other(other.to_string()),
        })
    }

    fn peer_credentials(&self) -> Option<PeerCredentials> {
        msgrelay_transport::LocalStream::peer_credentials(self)
            .map(|(uid, gid, pid)| PeerCredentials { uid, gid, pid })
    }
}

impl InboundConnection for &[u8] {}

/// Outcome of one fully relayed connection.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The payload exactly as received.
    pub text: Bytes,
    pub message: Message,
    /// Size of the protobuf record written to the output file.
    pub encoded_len: usize,
    pub output: PathBuf,
    pub peer: Option<PeerCredentials>,
}

/// Relay one connection: read to end-of-stream, decode, re-encode, persist.
///
/// Nothing is retried. A failure at any stage abandons the connection and
/// leaves the output file untouched, except for persist failures after the
/// file was truncated.
pub fn handle_connection<C: InboundConnection>(
    mut conn: C,
    sink: &mut PersistenceSink,
    config: &RelayConfig,
) -> Result<Delivery> {
    let peer = conn.peer_credentials();

    conn.set_read_timeout(config.read_timeout)
        .map_err(|err| RelayError::Read(CodecError::Io(err)))?;
    let text = read_payload(&mut conn, config.max_payload_size).map_err(RelayError::Read)?;
    debug!(len = text.len(), ?peer, "payload received");

    let message = decode_text(&text).map_err(RelayError::Decode)?;
    let encoded = encode_binary(&message).map_err(RelayError::Encode)?;
    let output = sink.persist(&encoded)?.to_path_buf();

    Ok(Delivery {
        text,
        message,
        encoded_len: encoded.len(),
        output,
        peer,
    })
}
