//! UseCase: Web Push 購読の登録・更新

use std::sync::Arc;

use crate::domain::{PushNotifier, PushPayload, PushSubscription, SubscriptionRepository};

use super::error::PushSubscriptionError;

const TEST_PUSH_TITLE: &str = "Push Test";
const TEST_PUSH_BODY: &str = "Push Notification Added";

pub struct PushSubscriptionUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
    push_notifier: Arc<dyn PushNotifier>,
}

impl PushSubscriptionUseCase {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        push_notifier: Arc<dyn PushNotifier>,
    ) -> Self {
        Self {
            subscriptions,
            push_notifier,
        }
    }

    /// テスト通知を送ってから購読を保存する（送れなければ保存しない）
    pub async fn register(&self, subscription: PushSubscription) -> Result<(), PushSubscriptionError> {
        let payload = PushPayload::new(TEST_PUSH_TITLE, TEST_PUSH_BODY);
        self.push_notifier.send(&subscription, &payload).await?;
        self.subscriptions.upsert(subscription).await?;
        Ok(())
    }

    /// `old_endpoint` の購読を新しい内容で置き換える（無ければ何もしない）
    pub async fn change(
        &self,
        old_endpoint: Option<&str>,
        subscription: PushSubscription,
    ) -> Result<(), PushSubscriptionError> {
        let old_endpoint = old_endpoint
            .filter(|e| !e.is_empty())
            .ok_or(PushSubscriptionError::MissingOldEndpoint)?;
        self.subscriptions
            .update_by_endpoint(old_endpoint, subscription)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockPushNotifier, NotificationError, PushKeys},
        infrastructure::repository::InMemorySubscriptionRepository,
    };

    fn subscription(endpoint: &str) -> PushSubscription {
        PushSubscription {
            endpoint: endpoint.to_string(),
            expiration_time: None,
            keys: PushKeys {
                p256dh: "p256dh".to_string(),
                auth: "auth".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_register_sends_test_push_then_stores() {
        // テスト項目: テスト通知の送信後に購読が保存される
        // given (前提条件):
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let mut notifier = MockPushNotifier::new();
        notifier
            .expect_send()
            .withf(|_, payload| payload.title == "Push Test" && payload.body == "Push Notification Added")
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = PushSubscriptionUseCase::new(repository.clone(), Arc::new(notifier));

        // when (操作):
        let result = usecase.register(subscription("https://push/1")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repository.find_all().await.unwrap(), vec![subscription("https://push/1")]);
    }

    #[tokio::test]
    async fn test_register_does_not_store_when_test_push_fails() {
        // テスト項目: テスト通知に失敗した購読は保存されない
        // given (前提条件):
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let mut notifier = MockPushNotifier::new();
        notifier
            .expect_send()
            .returning(|_, _| Err(NotificationError::Push("unreachable".to_string())));
        let usecase = PushSubscriptionUseCase::new(repository.clone(), Arc::new(notifier));

        // when (操作):
        let result = usecase.register(subscription("https://push/1")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(PushSubscriptionError::TestPushFailed(_))));
        assert!(repository.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_change_replaces_by_old_endpoint() {
        // テスト項目: old_endpoint の購読が新しい endpoint に置き換わる
        // given (前提条件):
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        repository.upsert(subscription("https://push/old")).await.unwrap();
        let usecase =
            PushSubscriptionUseCase::new(repository.clone(), Arc::new(MockPushNotifier::new()));

        // when (操作):
        let result = usecase
            .change(Some("https://push/old"), subscription("https://push/new"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repository.find_all().await.unwrap(), vec![subscription("https://push/new")]);
    }

    #[tokio::test]
    async fn test_change_requires_old_endpoint() {
        // テスト項目: old_endpoint が無い場合はエラー
        // given (前提条件):
        let usecase = PushSubscriptionUseCase::new(
            Arc::new(InMemorySubscriptionRepository::new()),
            Arc::new(MockPushNotifier::new()),
        );

        // when (操作):
        let result = usecase.change(None, subscription("https://push/new")).await;

        // then (期待する結果):
        assert_eq!(result, Err(PushSubscriptionError::MissingOldEndpoint));
    }
}
