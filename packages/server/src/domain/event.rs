//! Events pushed from the relay to connected clients.

use serde_json::Value;

use super::{entity::ChatMessage, entity::Session, value_object::MessageId};

#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    /// Acknowledges a `join` to the joiner only.
    JoinAck(Session),
    Message(ChatMessage),
    Leave(Session),
    Delete(MessageId),
    /// Opaque typing payload, relayed as received.
    Typing(Value),
    StopTyping,
    Inactive,
    Emergency,
    /// Sent to the submitting connection when its message was not persisted.
    Error(String),
}

/// Frame handed to a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushFrame {
    Text(String),
    /// Close the socket after flushing everything queued before it.
    Close,
}
