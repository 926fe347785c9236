//! UseCase: 公開ステータスの取得

use std::sync::Arc;

use crate::domain::{LobbyRepository, PublicStatus};

pub struct GetStatusUseCase {
    lobby: Arc<dyn LobbyRepository>,
}

impl GetStatusUseCase {
    pub fn new(lobby: Arc<dyn LobbyRepository>) -> Self {
        Self { lobby }
    }

    pub async fn execute(&self) -> PublicStatus {
        self.lobby.mode().await.public_status()
    }
}
