//! UseCase: メッセージ削除（論理削除）
//!
//! 存在しない ID でも削除通知はブロードキャストします。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, LobbyRepository, MessageId, MessagePusher, MessageRepository, RelayEvent,
    RepositoryError,
};

const DELETE_FAILED_MESSAGE: &str = "Failed to delete message";

pub struct DeleteMessageUseCase {
    lobby: Arc<dyn LobbyRepository>,
    messages: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DeleteMessageUseCase {
    pub fn new(
        lobby: Arc<dyn LobbyRepository>,
        messages: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            lobby,
            messages,
            message_pusher,
        }
    }

    /// `requester` は永続化に失敗したときの通知先
    pub async fn execute(
        &self,
        requester: &ConnectionId,
        id: MessageId,
    ) -> Result<(), RepositoryError> {
        if let Err(e) = self.messages.mark_deleted(&id).await {
            tracing::error!("Failed to delete message '{}': {}", id.as_str(), e);
            let error_event = RelayEvent::Error(DELETE_FAILED_MESSAGE.to_string());
            if let Err(push_err) = self.message_pusher.push_to(requester, &error_event).await {
                tracing::warn!("Failed to report delete error: {}", push_err);
            }
            return Err(e);
        }

        let targets = self.lobby.connection_ids().await;
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, &RelayEvent::Delete(id.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast delete: {}", e);
        }

        tracing::info!("Message '{}' deleted", id.as_str());
        Ok(())
    }
}
