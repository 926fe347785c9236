//! InMemory Lobby Repository 実装
//!
//! ドメイン層が定義する LobbyRepository trait の具体的な実装。
//! `Lobby` ドメインモデルを 1 つの `Mutex` で保持し、プレゼンスとグローバルモードの
//! 変更を全て同じ排他区間で行います。
//!
//! 複数プロセス構成には対応しません（プレゼンスはプロセス内のみ）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Admission, Claim, ConnectionId, GlobalMode, Lobby, LobbyRepository, ModeState, Session,
    SessionProfile,
};

pub struct InMemoryLobbyRepository {
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    pub fn new(lobby: Arc<Mutex<Lobby>>) -> Self {
        Self { lobby }
    }
}

impl Default for InMemoryLobbyRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(Lobby::new())))
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn admit_and_join(&self, claim: Option<Claim>, session: Session) -> Admission {
        let mut lobby = self.lobby.lock().await;
        lobby.admit_and_join(claim.as_ref(), session)
    }

    async fn leave(&self, connection_id: &ConnectionId) -> Option<Session> {
        let mut lobby = self.lobby.lock().await;
        lobby.leave(connection_id)
    }

    async fn find(&self, connection_id: &ConnectionId) -> Option<Session> {
        let lobby = self.lobby.lock().await;
        lobby.find(connection_id).cloned()
    }

    async fn count(&self) -> usize {
        let lobby = self.lobby.lock().await;
        lobby.count()
    }

    async fn connection_ids(&self) -> Vec<ConnectionId> {
        let lobby = self.lobby.lock().await;
        lobby.connection_ids()
    }

    async fn update_profile(
        &self,
        connection_id: &ConnectionId,
        profile: SessionProfile,
    ) -> Option<Session> {
        let mut lobby = self.lobby.lock().await;
        lobby.update_profile(connection_id, profile)
    }

    async fn mode(&self) -> GlobalMode {
        let lobby = self.lobby.lock().await;
        lobby.mode().clone()
    }

    async fn toggle(&self) -> ModeState {
        let mut lobby = self.lobby.lock().await;
        lobby.toggle()
    }

    async fn emergency_exit(&self) -> ModeState {
        let mut lobby = self.lobby.lock().await;
        lobby.emergency_exit()
    }
}
