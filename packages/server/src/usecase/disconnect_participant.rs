//! UseCase: 参加者切断処理
//!
//! 接続ごとに必ず 1 度実行される後始末です（正常クローズ・異常切断の両方）。
//! 未登録の接続に対しては何もしません（カウンタを二重に減らさない）。

use std::sync::Arc;

use crate::domain::{
    AuditLogEntry, AuditLogRepository, ConnectionId, LobbyRepository, MessagePusher, RelayEvent,
    Session, Timestamp,
};
use hatoba_shared::time::get_timestamp;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    lobby: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    audit_log: Arc<dyn AuditLogRepository>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        lobby: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        audit_log: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            lobby,
            message_pusher,
            audit_log,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(Session)` - 削除されたセッション
    /// * `None` - 既に切断済み、または未登録
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Session> {
        // 1. MessagePusher からクライアントを登録解除
        self.message_pusher.unregister_client(connection_id).await;

        // 2. プレゼンスから削除（カウンタも同じ排他区間で減る）
        let session = self.lobby.leave(connection_id).await?;

        // 3. 監査ログ
        let entry = AuditLogEntry::logout(session.user_id.as_str(), Timestamp::new(get_timestamp()));
        if let Err(e) = self.audit_log.append(entry).await {
            tracing::warn!("Failed to write logout audit entry: {}", e);
        }

        // 4. 残りの全接続に leave をブロードキャスト
        let targets = self.lobby.connection_ids().await;
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, &RelayEvent::Leave(session.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast leave: {}", e);
        }

        tracing::info!(
            "Client '{}' disconnected and removed from lobby",
            session.user_id.as_str()
        );
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AuditKind, Claim, ClaimType, ConnectionIdFactory, PushFrame},
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryAuditLogRepository, InMemoryLobbyRepository},
        },
    };
    use tokio::sync::mpsc;

    async fn admit(
        lobby: &InMemoryLobbyRepository,
        pusher: &WebSocketMessagePusher,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<PushFrame>) {
        let session = Session::admitted(ConnectionIdFactory::generate(), ClaimType::Anonymous);
        let claim = Claim::new(ClaimType::Admin, "admin".to_string(), Timestamp::new(0));
        lobby.admit_and_join(Some(claim), session.clone()).await;
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(session.connection_id.clone(), tx).await;
        (session.connection_id, rx)
    }

    #[tokio::test]
    async fn test_disconnect_removes_session_and_broadcasts_leave() {
        // テスト項目: 切断でセッションが消え、残りの参加者に leave が届く
        // given (前提条件):
        let lobby = Arc::new(InMemoryLobbyRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let audit_log = Arc::new(InMemoryAuditLogRepository::new());
        let (alice, _alice_rx) = admit(&lobby, &pusher).await;
        let (_bob, mut bob_rx) = admit(&lobby, &pusher).await;
        let usecase =
            DisconnectParticipantUseCase::new(lobby.clone(), pusher.clone(), audit_log.clone());

        // when (操作):
        let removed = usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(removed.unwrap().connection_id, alice);
        assert_eq!(lobby.count().await, 1);
        assert_eq!(lobby.mode().await.live_user_count(), 1);

        let PushFrame::Text(json) = bob_rx.try_recv().unwrap() else {
            panic!("expected text frame");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "leave");
        assert_eq!(value["data"]["connectionId"], alice.as_str());
    }

    #[tokio::test]
    async fn test_disconnect_writes_logout_audit() {
        // テスト項目: 切断時に logout の監査ログが記録される
        // given (前提条件):
        let lobby = Arc::new(InMemoryLobbyRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let audit_log = Arc::new(InMemoryAuditLogRepository::new());
        let (alice, _rx) = admit(&lobby, &pusher).await;
        let usecase =
            DisconnectParticipantUseCase::new(lobby.clone(), pusher.clone(), audit_log.clone());

        // when (操作):
        usecase.execute(&alice).await;

        // then (期待する結果):
        let entries = audit_log.find_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, AuditKind::Logout);
        assert_eq!(entries[0].message, format!("{} user logged out", alice.as_str()));
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 同じ接続を 2 回切断してもカウンタは二重に減らない
        // given (前提条件):
        let lobby = Arc::new(InMemoryLobbyRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let audit_log = Arc::new(InMemoryAuditLogRepository::new());
        let (alice, _alice_rx) = admit(&lobby, &pusher).await;
        let (_bob, _bob_rx) = admit(&lobby, &pusher).await;
        let usecase =
            DisconnectParticipantUseCase::new(lobby.clone(), pusher.clone(), audit_log.clone());

        // when (操作):
        let first = usecase.execute(&alice).await;
        let second = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(lobby.count().await, 1);
        assert_eq!(lobby.mode().await.live_user_count(), 1);
        assert_eq!(audit_log.find_all().await.unwrap().len(), 1);
    }
}
