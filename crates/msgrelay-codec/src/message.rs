use serde::{Deserialize, Serialize};

/// Originator of a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// The unit of transfer.
///
/// Every field is required when decoding; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub sender: User,
}

impl Message {
    pub fn new(id: i64, content: impl Into<String>, sender: User) -> Self {
        Self {
            id,
            content: content.into(),
            sender,
        }
    }
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
