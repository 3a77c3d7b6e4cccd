use std::io::Write;

use msgrelay_transport::{ListenAddress, LocalSocket, Result};
use tracing::debug;

/// Deliver one payload to a relay: connect, write everything, half-close.
///
/// The relay treats end-of-stream as the end of the message, so the write
/// half is shut down before returning.
pub fn send_payload(addr: &ListenAddress, payload: &[u8]) -> Result<()> {
    let mut stream = LocalSocket::connect(addr)?;
    stream.write_all(payload)?;
    stream.flush()?;
    stream.shutdown_write()?;
    debug!(%addr, len = payload.len(), "payload sent");
    Ok(())
}
