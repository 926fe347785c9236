//! UseCase: 全メッセージの論理削除（管理者用・取り消し不可）

use std::sync::Arc;

use crate::domain::{MessageRepository, RepositoryError};

pub struct ResetMessagesUseCase {
    messages: Arc<dyn MessageRepository>,
}

impl ResetMessagesUseCase {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    pub async fn execute(&self) -> Result<(), RepositoryError> {
        self.messages.mark_all_deleted().await?;
        tracing::info!("All messages marked as deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatMessage, MessageContent, MessageIdFactory, MessageKind, Timestamp, UserId},
        infrastructure::repository::InMemoryMessageRepository,
    };

    #[tokio::test]
    async fn test_reset_marks_every_message_deleted() {
        // テスト項目: 全メッセージが削除済みになり、物理削除はされない
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new());
        for i in 0..3 {
            repository
                .insert(ChatMessage {
                    id: MessageIdFactory::generate(),
                    sender: UserId::new("alice".to_string()).unwrap(),
                    content: MessageContent::new(format!("m{}", i)).unwrap(),
                    kind: MessageKind::Text,
                    reply_id: None,
                    timestamp: Timestamp::new(i),
                    deleted: false,
                })
                .await
                .unwrap();
        }
        let usecase = ResetMessagesUseCase::new(repository.clone());

        // when (操作):
        usecase.execute().await.unwrap();

        // then (期待する結果):
        let all = repository.all().await;
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|m| m.deleted));
        assert!(
            repository
                .find_recent_newest_first(300)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
