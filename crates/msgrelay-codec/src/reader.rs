use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::error::{CodecError, Result};

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Read `reader` to end-of-stream and return everything it produced.
///
/// There is no framing: the peer closing (or half-closing) its side is the
/// only message boundary. Fails with [`CodecError::PayloadTooLarge`] once
/// more than `max_payload` bytes have arrived.
pub fn read_payload<R: Read>(mut reader: R, max_payload: usize) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY.min(max_payload));
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(CodecError::Io(err)),
        };

        if read == 0 {
            trace!(len = buf.len(), "payload complete");
            return Ok(buf.freeze());
        }

        if buf.len() + read > max_payload {
            return Err(CodecError::PayloadTooLarge { max: max_payload });
        }
        buf.extend_from_slice(&chunk[..read]);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    struct InterruptOnce {
        inner: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::ConnectionReset))
        }
    }

    #[test]
    fn reads_until_eof_across_chunks() {
        let data = vec![b'x'; READ_CHUNK_SIZE * 3 + 17];
        let payload = read_payload(Cursor::new(data.clone()), DEFAULT_MAX_PAYLOAD).unwrap();
        assert_eq!(payload.as_ref(), data.as_slice());
    }

    #[test]
    fn empty_stream_yields_empty_payload() {
        let payload = read_payload(Cursor::new(Vec::new()), DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn retries_interrupted_reads() {
        let reader = InterruptOnce {
            inner: Cursor::new(b"hello".to_vec()),
            interrupted: false,
        };
        assert_eq!(read_payload(reader, 64).unwrap().as_ref(), b"hello");
    }

    #[test]
    fn payload_at_limit_is_accepted() {
        let payload = read_payload(Cursor::new(vec![0u8; 32]), 32).unwrap();
        assert_eq!(payload.len(), 32);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let err = read_payload(Cursor::new(vec![0u8; 33]), 32).unwrap_err();
        assert!(matches!(err, CodecError::PayloadTooLarge { max: 32 }));
    }

    #[test]
    fn io_errors_are_reported() {
        assert!(matches!(read_payload(Broken, 64), Err(CodecError::Io(_))));
    }
}
