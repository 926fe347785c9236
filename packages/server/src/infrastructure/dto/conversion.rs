//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ChatMessage, MessageContent, MessageDraft, MessageId, RelayEvent, Session, SessionProfile,
    UserId, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::MessagePayload> for MessageDraft {
    type Error = ValueObjectError;

    fn try_from(payload: dto::MessagePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            content: MessageContent::new(payload.content)?,
            kind: payload.kind,
            // Absent or blank reply references normalize to None
            reply_id: payload
                .reply_id
                .filter(|id| !id.trim().is_empty())
                .map(MessageId::new)
                .transpose()?,
        })
    }
}

impl From<dto::JoinPayload> for SessionProfile {
    fn from(payload: dto::JoinPayload) -> Self {
        Self {
            user_id: payload.id.and_then(|id| UserId::new(id).ok()),
            display_name: payload.name,
            verified: payload.is_verified,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Session> for dto::SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            id: session.user_id.as_str().to_string(),
            name: session.display_name.clone(),
            is_verified: session.verified,
            connection_id: session.connection_id.as_str().to_string(),
        }
    }
}

impl From<&ChatMessage> for dto::ChatMessageInfo {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            sender: message.sender.as_str().to_string(),
            content: message.content.as_str().to_string(),
            kind: message.kind,
            reply_id: message.reply_id.as_ref().map(|id| id.as_str().to_string()),
            timestamp: message.timestamp.value(),
            deleted: message.deleted,
        }
    }
}

impl From<&RelayEvent> for dto::ServerEvent {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::JoinAck(session) => Self::JoinAck(session.into()),
            RelayEvent::Message(message) => Self::Message(message.into()),
            RelayEvent::Leave(session) => Self::Leave(session.into()),
            RelayEvent::Delete(id) => Self::Delete(dto::DeletePayload {
                id: id.as_str().to_string(),
            }),
            RelayEvent::Typing(payload) => Self::Typing(payload.clone()),
            RelayEvent::StopTyping => Self::StopTyping,
            RelayEvent::Inactive => Self::Inactive,
            RelayEvent::Emergency => Self::Emergency,
            RelayEvent::Error(message) => Self::Error(dto::ErrorInfo {
                message: message.clone(),
            }),
        }
    }
}
