use bytes::{Bytes, BytesMut};
use prost::Message as _;

use crate::error::Result;
use crate::message::Message;
use crate::wire::MessageRecord;

/// Encode a [`Message`] as its protobuf record.
///
/// Encoding is deterministic: equal messages always produce equal bytes.
pub fn encode_binary(message: &Message) -> Result<Bytes> {
    let record = MessageRecord::from(message);
    let mut dst = BytesMut::with_capacity(record.encoded_len());
    record.encode(&mut dst)?;
    Ok(dst.freeze())
}

/// Decode a protobuf record produced by [`encode_binary`].
pub fn decode_binary(bytes: &[u8]) -> Result<Message> {
    Ok(MessageRecord::decode(bytes)?.into())
}
