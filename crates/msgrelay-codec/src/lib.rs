//! JSON-to-protobuf transcoding of relay messages.
//!
//! Inbound payloads arrive as one JSON object per connection:
//!
//! ```text
//! { "id": <integer>, "content": "<text>", "sender": { "id": <integer>, "name": "<text>" } }
//! ```
//!
//! They are decoded into a [`Message`] and re-encoded as a compact protobuf
//! record (see [`wire`]). All codec functions are pure and stateless apart
//! from [`read_payload`], which drains a stream to end-of-file.

pub mod binary;
pub mod error;
pub mod message;
pub mod reader;
pub mod text;
pub mod wire;

pub use binary::{decode_binary, encode_binary};
pub use error::{CodecError, Result};
pub use message::{Message, User};
pub use reader::{read_payload, DEFAULT_MAX_PAYLOAD};
pub use text::{decode_text, encode_text};
