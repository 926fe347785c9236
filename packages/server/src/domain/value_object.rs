//! Value objects for the relay domain.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Transport-level identity of a live connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Factory for connection ids (UUID v4).
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// User id shown to peers. Client-supplied, or the connection id by default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&ConnectionId> for UserId {
    fn from(connection_id: &ConnectionId) -> Self {
        Self(connection_id.as_str().to_string())
    }
}

/// Opaque message id, unique for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::MessageIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId(Uuid::new_v4().to_string())
    }
}

/// Message body. Text, or a URL / reference for media messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Role carried by a verified credential. Closed set: anything else is rejected
/// at the verification boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Admin,
    Anonymous,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Admin => "admin",
            ClaimType::Anonymous => "anonymous",
        }
    }
}

impl TryFrom<&str> for ClaimType {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(ClaimType::Admin),
            "anonymous" => Ok(ClaimType::Anonymous),
            other => Err(ValueObjectError::UnknownClaimType(other.to_string())),
        }
    }
}

/// Kind of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Audio,
    File,
    Gif,
    Reply,
    Reaction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_rejects_blank() {
        // テスト項目: 空白のみの ConnectionId はエラーになる
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = ConnectionId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::ConnectionIdEmpty));
    }

    #[test]
    fn test_connection_id_factory_generates_unique_ids() {
        // テスト項目: ConnectionIdFactory は毎回異なる ID を生成する
        // given (前提条件):

        // when (操作):
        let a = ConnectionIdFactory::generate();
        let b = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_id_defaults_from_connection_id() {
        // テスト項目: ConnectionId から UserId を作ると同じ文字列になる
        // given (前提条件):
        let connection_id = ConnectionId::new("conn-1".to_string()).unwrap();

        // when (操作):
        let user_id = UserId::from(&connection_id);

        // then (期待する結果):
        assert_eq!(user_id.as_str(), "conn-1");
    }

    #[test]
    fn test_claim_type_parses_known_values_only() {
        // テスト項目: admin / anonymous 以外のクレーム種別は拒否される
        // given (前提条件):

        // when (操作):
        let admin = ClaimType::try_from("admin");
        let anonymous = ClaimType::try_from("anonymous");
        let other = ClaimType::try_from("superuser");

        // then (期待する結果):
        assert_eq!(admin, Ok(ClaimType::Admin));
        assert_eq!(anonymous, Ok(ClaimType::Anonymous));
        assert_eq!(
            other,
            Err(ValueObjectError::UnknownClaimType("superuser".to_string()))
        );
    }

    #[test]
    fn test_message_kind_serializes_lowercase() {
        // テスト項目: MessageKind は小文字でシリアライズされる
        // given (前提条件):
        let kind = MessageKind::Gif;

        // when (操作):
        let json = serde_json::to_string(&kind).unwrap();

        // then (期待する結果):
        assert_eq!(json, "\"gif\"");
    }
}
