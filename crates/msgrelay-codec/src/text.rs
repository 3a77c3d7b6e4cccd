use serde_json::{Deserializer, Value};

use crate::error::{CodecError, Result};
use crate::message::Message;

/// Decode the first JSON value in `bytes` as a [`Message`].
///
/// Anything after the first complete value is ignored, as are unknown
/// object fields. A key repeated within one object keeps its last value.
/// Whitespace-only input is [`CodecError::Empty`].
pub fn decode_text(bytes: &[u8]) -> Result<Message> {
    // Parsed through `Value` first: its object map overwrites repeated keys,
    // where the derived struct visitor would reject them.
    let mut values = Deserializer::from_slice(bytes).into_iter::<Value>();
    match values.next() {
        Some(value) => Ok(serde_json::from_value(value?)?),
        None => Err(CodecError::Empty),
    }
}

/// Encode a [`Message`] as compact JSON, the form producers send.
pub fn encode_text(message: &Message) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(message)
}
