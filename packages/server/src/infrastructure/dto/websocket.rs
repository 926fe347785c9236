//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame `{"type": "<event>", "data": ...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::MessageKind;

/// Connection → server events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "join")]
    Join(JoinPayload),
    #[serde(rename = "message")]
    Message(MessagePayload),
    #[serde(rename = "delete")]
    Delete(DeletePayload),
    #[serde(rename = "typing")]
    Typing(Value),
    #[serde(rename = "stopTyping")]
    StopTyping,
    #[serde(rename = "emergencyExit")]
    EmergencyExit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub reply_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    pub id: String,
}

/// Server → connection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "join-ack")]
    JoinAck(SessionInfo),
    #[serde(rename = "message")]
    Message(ChatMessageInfo),
    #[serde(rename = "leave")]
    Leave(SessionInfo),
    #[serde(rename = "delete")]
    Delete(DeletePayload),
    #[serde(rename = "typing")]
    Typing(Value),
    #[serde(rename = "stopTyping")]
    StopTyping,
    #[serde(rename = "inactive")]
    Inactive,
    #[serde(rename = "emergency")]
    Emergency,
    #[serde(rename = "error")]
    Error(ErrorInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub name: String,
    pub is_verified: bool,
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageInfo {
    pub id: String,
    pub sender: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub reply_id: Option<String>,
    pub timestamp: i64,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_with_defaults() {
        // テスト項目: id を省略した join イベントがパースできる
        // given (前提条件):
        let json = r#"{"type":"join","data":{"name":"Teddy","isVerified":true}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Join(JoinPayload {
                id: None,
                name: "Teddy".to_string(),
                is_verified: true,
            })
        );
    }

    #[test]
    fn test_parse_unit_events_without_data() {
        // テスト項目: data を持たない stopTyping / emergencyExit がパースできる
        // given (前提条件):
        let stop = r#"{"type":"stopTyping"}"#;
        let exit = r#"{"type":"emergencyExit"}"#;

        // when (操作):
        let stop: ClientEvent = serde_json::from_str(stop).unwrap();
        let exit: ClientEvent = serde_json::from_str(exit).unwrap();

        // then (期待する結果):
        assert_eq!(stop, ClientEvent::StopTyping);
        assert_eq!(exit, ClientEvent::EmergencyExit);
    }

    #[test]
    fn test_parse_message_rejects_unknown_kind() {
        // テスト項目: 未知のメッセージ種別は拒否される
        // given (前提条件):
        let json = r#"{"type":"message","data":{"content":"hi","type":"sticker"}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_unit_event_serialization() {
        // テスト項目: inactive イベントは type のみでシリアライズされる
        // given (前提条件):
        let event = ServerEvent::Inactive;

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"inactive"}"#);
    }
}
