//! UseCase: 新規ゲスト入室時の通知ファンアウト
//!
//! 全 Push 購読への通知と、設定されていれば通知先アドレスへのメールを送ります。
//! 呼び出し元は完了を待ちません。失敗はログに残すだけで、再送もしません。

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{
    EmailMessage, EmailTemplate, Mailer, NotificationError, PushNotifier, PushPayload,
    SubscriptionRepository,
};

const NEW_MESSAGE_TITLE: &str = "New Message";
const NEW_MESSAGE_BODY: &str = "A new message is available";

/// 入室通知メールの宛先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyEmailConfig {
    pub to: String,
    pub cc: Option<String>,
}

pub struct NotifyFanoutUseCase {
    subscriptions: Arc<dyn SubscriptionRepository>,
    push_notifier: Arc<dyn PushNotifier>,
    mailer: Arc<dyn Mailer>,
    email: Option<NotifyEmailConfig>,
}

impl NotifyFanoutUseCase {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        push_notifier: Arc<dyn PushNotifier>,
        mailer: Arc<dyn Mailer>,
        email: Option<NotifyEmailConfig>,
    ) -> Self {
        Self {
            subscriptions,
            push_notifier,
            mailer,
            email,
        }
    }

    /// バックグラウンドタスクとして起動する（fire-and-forget）
    pub fn trigger(self: &Arc<Self>) -> JoinHandle<()> {
        let usecase = Arc::clone(self);
        tokio::spawn(async move { usecase.execute().await })
    }

    /// ファンアウトを実行
    ///
    /// 配信先が消滅していた（410 Gone）購読は削除します。
    pub async fn execute(&self) {
        let subscriptions = match self.subscriptions.find_all().await {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                tracing::warn!("Failed to load push subscriptions: {}", e);
                Vec::new()
            }
        };

        let payload = PushPayload::new(NEW_MESSAGE_TITLE, NEW_MESSAGE_BODY);
        for subscription in &subscriptions {
            match self.push_notifier.send(subscription, &payload).await {
                Ok(()) => {}
                Err(NotificationError::SubscriptionGone(endpoint)) => {
                    tracing::info!("Removing expired push subscription '{}'", endpoint);
                    if let Err(e) = self.subscriptions.remove(&endpoint).await {
                        tracing::warn!("Failed to remove subscription '{}': {}", endpoint, e);
                    }
                }
                Err(e) => {
                    tracing::warn!(endpoint = %subscription.endpoint, "Push failed: {}", e);
                }
            }
        }

        if let Some(email) = &self.email {
            let message = EmailMessage {
                to: email.to.clone(),
                template: EmailTemplate::Notified,
                subject: Some(NEW_MESSAGE_TITLE.to_string()),
                cc: email.cc.clone(),
            };
            if let Err(e) = self.mailer.send(message).await {
                tracing::warn!("Failed to send notification email: {}", e);
            }
        }
    }
}
