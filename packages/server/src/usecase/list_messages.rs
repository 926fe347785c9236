//! UseCase: 直近メッセージの取得

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageRepository, RepositoryError};

/// 管理 API が返す件数
pub const RECENT_MESSAGE_LIMIT: usize = 300;

pub struct ListMessagesUseCase {
    messages: Arc<dyn MessageRepository>,
}

impl ListMessagesUseCase {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// 削除されていない直近 `limit` 件を古い順で返す
    ///
    /// 新しい順に `limit` 件だけ取り出してから反転する。
    pub async fn execute(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut recent = self.messages.find_recent_newest_first(limit).await?;
        recent.reverse();
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MessageContent, MessageIdFactory, MessageKind, MockMessageRepository, Timestamp,
            UserId,
        },
        infrastructure::repository::InMemoryMessageRepository,
    };

    fn message(content: &str, timestamp: i64) -> ChatMessage {
        ChatMessage {
            id: MessageIdFactory::generate(),
            sender: UserId::new("alice".to_string()).unwrap(),
            content: MessageContent::new(content.to_string()).unwrap(),
            kind: MessageKind::Text,
            reply_id: None,
            timestamp: Timestamp::new(timestamp),
            deleted: false,
        }
    }

    #[tokio::test]
    async fn test_list_returns_oldest_first_within_limit() {
        // テスト項目: 直近 limit 件が古い順で返る
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new());
        for i in 0..5 {
            repository
                .insert(message(&format!("m{}", i), i))
                .await
                .unwrap();
        }
        let usecase = ListMessagesUseCase::new(repository);

        // when (操作):
        let result = usecase.execute(3).await.unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = result.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_list_skips_deleted_messages() {
        // テスト項目: 削除済みメッセージは含まれない
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new());
        let kept = message("kept", 1);
        let removed = message("removed", 2);
        repository.insert(kept.clone()).await.unwrap();
        repository.insert(removed.clone()).await.unwrap();
        repository.mark_deleted(&removed.id).await.unwrap();
        let usecase = ListMessagesUseCase::new(repository);

        // when (操作):
        let result = usecase.execute(RECENT_MESSAGE_LIMIT).await.unwrap();

        // then (期待する結果):
        assert_eq!(result, vec![kept]);
    }

    #[tokio::test]
    async fn test_list_propagates_repository_error() {
        // テスト項目: 取得失敗はそのまま呼び出し元に返る
        // given (前提条件):
        let mut repository = MockMessageRepository::new();
        repository
            .expect_find_recent_newest_first()
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));
        let usecase = ListMessagesUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase.execute(RECENT_MESSAGE_LIMIT).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::Unavailable("down".to_string()))
        );
    }
}
