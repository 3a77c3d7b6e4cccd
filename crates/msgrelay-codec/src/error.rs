/// Errors that can occur while reading or transcoding a message.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload contained no JSON value at all.
    #[error("empty payload")]
    Empty,

    /// The payload is not a well-formed message (malformed, truncated,
    /// missing or mistyped fields).
    #[error("invalid message JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Protobuf encoding ran out of buffer capacity.
    #[error("protobuf encode failed: {0}")]
    Encode(#[from] prost::EncodeError),

    /// The bytes are not a valid protobuf message record.
    #[error("protobuf decode failed: {0}")]
    BinaryDecode(#[from] prost::DecodeError),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large (more than {max} bytes)")]
    PayloadTooLarge { max: usize },

    /// An I/O error occurred while reading the payload.
    #[error("payload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
