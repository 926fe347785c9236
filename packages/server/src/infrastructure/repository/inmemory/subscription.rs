//! InMemory Push Subscription Repository 実装（endpoint がキー）

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::domain::{PushSubscription, RepositoryError, SubscriptionRepository};

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<IndexMap<String, PushSubscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn upsert(&self, subscription: PushSubscription) -> Result<(), RepositoryError> {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.insert(subscription.endpoint.clone(), subscription);
        Ok(())
    }

    async fn update_by_endpoint(
        &self,
        old_endpoint: &str,
        subscription: PushSubscription,
    ) -> Result<(), RepositoryError> {
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.shift_remove(old_endpoint).is_some() {
            subscriptions.insert(subscription.endpoint.clone(), subscription);
        }
        Ok(())
    }

    async fn remove(&self, endpoint: &str) -> Result<(), RepositoryError> {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.shift_remove(endpoint);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<PushSubscription>, RepositoryError> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.values().cloned().collect())
    }
}
