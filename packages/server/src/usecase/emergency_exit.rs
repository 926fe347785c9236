//! UseCase: 緊急停止
//!
//! 任意の接続から発火できます。モードを Inactive に固定し（トグルではない）、
//! 全員に inactive と emergency を送り、発火した接続を切断します。
//! Active に戻せるのは管理者のトグルだけです。

use std::sync::Arc;

use crate::domain::{ConnectionId, LobbyRepository, MessagePusher, ModeState, RelayEvent};

pub struct EmergencyExitUseCase {
    lobby: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl EmergencyExitUseCase {
    pub fn new(lobby: Arc<dyn LobbyRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    pub async fn execute(&self, trigger: &ConnectionId) -> ModeState {
        let state = self.lobby.emergency_exit().await;
        tracing::warn!("Emergency exit fired by '{}'", trigger.as_str());

        let targets = self.lobby.connection_ids().await;
        for event in [RelayEvent::Inactive, RelayEvent::Emergency] {
            if let Err(e) = self.message_pusher.broadcast(targets.clone(), &event).await {
                tracing::warn!("Failed to broadcast {:?}: {}", event, e);
            }
        }

        if let Err(e) = self.message_pusher.disconnect(trigger).await {
            tracing::warn!("Failed to disconnect '{}': {}", trigger.as_str(), e);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Claim, ClaimType, ConnectionIdFactory, PushFrame, Session, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryLobbyRepository,
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

    fn event_type(frame: PushFrame) -> String {
        match frame {
            PushFrame::Text(json) => {
                let value: serde_json::Value = serde_json::from_str(&json).unwrap();
                value["type"].as_str().unwrap().to_string()
            }
            PushFrame::Close => "close".to_string(),
        }
    }

    #[tokio::test]
    async fn test_emergency_exit_broadcasts_and_disconnects_trigger() {
        // テスト項目: 全員に inactive → emergency が届き、発火者だけ切断される
        // given (前提条件):
        let lobby = Arc::new(InMemoryLobbyRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (alice, mut alice_rx) = admit(&lobby, &pusher).await;
        let (_bob, mut bob_rx) = admit(&lobby, &pusher).await;
        let usecase = EmergencyExitUseCase::new(lobby.clone(), pusher.clone());

        // when (操作):
        let state = usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(state, ModeState::Inactive);
        assert!(!lobby.mode().await.is_active());

        let alice_events: Vec<String> = std::iter::from_fn(|| alice_rx.try_recv().ok())
            .map(event_type)
            .collect();
        assert_eq!(alice_events, vec!["inactive", "emergency", "close"]);

        let bob_events: Vec<String> = std::iter::from_fn(|| bob_rx.try_recv().ok())
            .map(event_type)
            .collect();
        assert_eq!(bob_events, vec!["inactive", "emergency"]);
    }

    #[tokio::test]
    async fn test_emergency_exit_is_one_directional() {
        // テスト項目: 2 回続けて発火しても Inactive のまま
        // given (前提条件):
        let lobby = Arc::new(InMemoryLobbyRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (alice, _rx) = admit(&lobby, &pusher).await;
        let usecase = EmergencyExitUseCase::new(lobby.clone(), pusher.clone());

        // when (操作):
        usecase.execute(&alice).await;
        let second = usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(second, ModeState::Inactive);
        assert!(!lobby.mode().await.is_active());
    }
}
