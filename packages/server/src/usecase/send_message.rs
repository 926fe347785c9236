//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ID・タイムスタンプの付与、永続化、送信者を含む全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 永続化に失敗したメッセージがブロードキャストされないことを保証
//! - 失敗が送信者にだけ error イベントとして通知されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：永続化の失敗、未登録の接続からの送信
//! - エッジケース：時計が巻き戻ってもタイムスタンプが減らない

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, LobbyRepository, MessageDraft, MessageIdFactory, MessagePusher,
    MessageRepository, RelayEvent, Timestamp,
};
use hatoba_shared::time::Clock;

use super::error::SubmitMessageError;

const PERSISTENCE_FAILED_MESSAGE: &str = "Failed to save message";

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    lobby: Arc<dyn LobbyRepository>,
    messages: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    /// 単調増加する時計（`MonotonicClock` を想定）
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        lobby: Arc<dyn LobbyRepository>,
        messages: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lobby,
            messages,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元の接続 ID
    /// * `draft` - クライアントから受け取ったメッセージ
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 永続化・ブロードキャスト済みのメッセージ
    /// * `Err(SubmitMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        from: &ConnectionId,
        draft: MessageDraft,
    ) -> Result<ChatMessage, SubmitMessageError> {
        let session = self
            .lobby
            .find(from)
            .await
            .ok_or_else(|| SubmitMessageError::SessionNotFound(from.as_str().to_string()))?;

        let message = ChatMessage {
            id: MessageIdFactory::generate(),
            sender: session.user_id,
            content: draft.content,
            kind: draft.kind,
            reply_id: draft.reply_id,
            timestamp: Timestamp::new(self.clock.now_millis()),
            deleted: false,
        };

        // 1. 永続化（失敗したらブロードキャストしない）
        if let Err(e) = self.messages.insert(message.clone()).await {
            tracing::error!("Failed to persist message from '{}': {}", from.as_str(), e);
            let error_event = RelayEvent::Error(PERSISTENCE_FAILED_MESSAGE.to_string());
            if let Err(push_err) = self.message_pusher.push_to(from, &error_event).await {
                tracing::warn!("Failed to report persistence error: {}", push_err);
            }
            return Err(SubmitMessageError::Persistence(e));
        }

        // 2. 送信者を含む全員にブロードキャスト
        let targets = self.lobby.connection_ids().await;
        self.message_pusher
            .broadcast(targets, &RelayEvent::Message(message.clone()))
            .await
            .map_err(|e| SubmitMessageError::BroadcastFailed(e.to_string()))?;

        tracing::debug!(
            "Relayed message '{}' from '{}'",
            message.id.as_str(),
            message.sender.as_str()
        );
        Ok(message)
    }
}
