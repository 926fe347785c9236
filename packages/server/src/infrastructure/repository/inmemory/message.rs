//! InMemory Message Repository 実装
//!
//! 追記順の `Vec` をストレージとして使用します。物理削除は行わず、
//! 削除は `deleted` フラグの更新のみです。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ChatMessage, MessageId, MessageRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryMessageRepository {
    /// 挿入順（古い順）
    messages: RwLock<Vec<ChatMessage>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 削除済みを含む全件（挿入順）
    pub async fn all(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut messages = self.messages.write().await;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(RepositoryError::WriteFailed(format!(
                "duplicate message id '{}'",
                message.id.as_str()
            )));
        }
        messages.push(message);
        Ok(())
    }

    async fn mark_deleted(&self, id: &MessageId) -> Result<(), RepositoryError> {
        let mut messages = self.messages.write().await;
        if let Some(message) = messages.iter_mut().find(|m| &m.id == id) {
            message.deleted = true;
        }
        Ok(())
    }

    async fn mark_all_deleted(&self) -> Result<(), RepositoryError> {
        let mut messages = self.messages.write().await;
        for message in messages.iter_mut() {
            message.deleted = true;
        }
        Ok(())
    }

    async fn find_recent_newest_first(
        &self,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .rev()
            .filter(|m| !m.deleted)
            .take(limit)
            .cloned()
            .collect())
    }
}
