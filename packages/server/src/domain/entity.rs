//! Domain entities.

use serde::{Deserialize, Serialize};

use super::value_object::{
    ClaimType, ConnectionId, MessageContent, MessageId, MessageKind, Timestamp, UserId,
};

/// Verified identity extracted from a bearer credential. Immutable for the
/// lifetime of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_type: ClaimType,
    pub subject: String,
    pub issued_at: Timestamp,
}

impl Claim {
    pub fn new(claim_type: ClaimType, subject: String, issued_at: Timestamp) -> Self {
        Self {
            claim_type,
            subject,
            issued_at,
        }
    }
}

/// One live connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub display_name: String,
    pub verified: bool,
    pub claim_type: ClaimType,
}

impl Session {
    /// Session as created at admission, before the client announces itself.
    pub fn admitted(connection_id: ConnectionId, claim_type: ClaimType) -> Self {
        Self {
            user_id: UserId::from(&connection_id),
            connection_id,
            display_name: String::new(),
            verified: false,
            claim_type,
        }
    }
}

/// Profile announced by the client in its `join` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProfile {
    pub user_id: Option<UserId>,
    pub display_name: String,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: UserId,
    pub content: MessageContent,
    pub kind: MessageKind,
    pub reply_id: Option<MessageId>,
    pub timestamp: Timestamp,
    pub deleted: bool,
}

/// Message as submitted by a client, before id and timestamp assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub content: MessageContent,
    pub kind: MessageKind,
    pub reply_id: Option<MessageId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Login,
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub message: String,
    pub kind: AuditKind,
    pub user: String,
    pub timestamp: Timestamp,
}

impl AuditLogEntry {
    pub fn login(user: &str, timestamp: Timestamp) -> Self {
        Self {
            message: "Anonymous user logged in".to_string(),
            kind: AuditKind::Login,
            user: user.to_string(),
            timestamp,
        }
    }

    pub fn logout(user: &str, timestamp: Timestamp) -> Self {
        Self {
            message: format!("{} user logged out", user),
            kind: AuditKind::Logout,
            user: user.to_string(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Web Push subscription, keyed by `endpoint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    #[serde(default)]
    pub expiration_time: Option<serde_json::Value>,
    pub keys: PushKeys,
}

/// Result of storing one uploaded file. The empty value stands for a failed upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
}
