//! Protobuf records for the persisted artifact.
//!
//! The schema is owned outside this crate; these types mirror it exactly:
//!
//! ```text
//! message User    { int64 id = 1; string name = 2; }
//! message Message { int64 id = 1; string content = 2; User sender = 3; }
//! ```
//! Do not renumber fields.

use crate::message;

#[derive(Clone, PartialEq, prost::Message)]
pub struct UserRecord {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MessageRecord {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub content: String,
    #[prost(message, optional, tag = "3")]
    pub sender: Option<UserRecord>,
}

impl From<&message::User> for UserRecord {
    fn from(user: &message::User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

impl From<&message::Message> for MessageRecord {
    fn from(msg: &message::Message) -> Self {
        Self {
            id: msg.id,
            content: msg.content.clone(),
            sender: Some(UserRecord::from(&msg.sender)),
        }
    }
}

impl From<MessageRecord> for message::Message {
    /// An absent `sender` decodes as the default user (proto3 semantics).
    fn from(record: MessageRecord) -> Self {
        let sender = record.sender.unwrap_or_default();
        Self {
            id: record.id,
            content: record.content,
            sender: message::User {
                id: sender.id,
                name: sender.name,
            },
        }
    }
}
