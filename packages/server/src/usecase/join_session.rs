//! UseCase: join イベント処理
//!
//! クライアントが名乗ったプロフィールでセッションを更新し、本人にだけ
//! join-ack を返します。参加の通知は他の参加者へはブロードキャストしません。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, LobbyRepository, MessagePusher, RelayEvent, Session, SessionProfile,
};

use super::error::JoinError;

pub struct JoinSessionUseCase {
    lobby: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinSessionUseCase {
    pub fn new(lobby: Arc<dyn LobbyRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        profile: SessionProfile,
    ) -> Result<Session, JoinError> {
        let session = self
            .lobby
            .update_profile(connection_id, profile)
            .await
            .ok_or_else(|| JoinError::SessionNotFound(connection_id.as_str().to_string()))?;

        self.message_pusher
            .push_to(connection_id, &RelayEvent::JoinAck(session.clone()))
            .await
            .map_err(|e| JoinError::AckFailed(e.to_string()))?;

        tracing::info!(
            "Client '{}' joined as '{}'",
            session.user_id.as_str(),
            session.display_name
        );
        Ok(session)
    }
}
