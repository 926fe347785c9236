//! UseCase: グローバルモードの切り替え（管理 API）

use std::sync::Arc;

use crate::domain::{LobbyRepository, ModeState};

pub struct ToggleModeUseCase {
    lobby: Arc<dyn LobbyRepository>,
}

impl ToggleModeUseCase {
    pub fn new(lobby: Arc<dyn LobbyRepository>) -> Self {
        Self { lobby }
    }

    /// Active ⇄ Inactive を反転し、反転後の状態を返す
    pub async fn execute(&self) -> ModeState {
        let state = self.lobby.toggle().await;
        tracing::info!("Global mode toggled to {:?}", state);
        state
    }
}
