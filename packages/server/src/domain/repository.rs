//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    admission::Admission,
    entity::{AuditLogEntry, ChatMessage, Claim, PushSubscription, Session, SessionProfile},
    error::RepositoryError,
    lobby::{GlobalMode, ModeState},
    value_object::{ConnectionId, MessageId},
};

/// Lobby Repository trait
///
/// プレゼンス（接続中セッション）とグローバルモードを保持する。
/// 全ての操作は 1 つの排他区間で実行され、`count() == live_user_count` が常に成り立つ。
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// アドミッション判定と参加を 1 つの排他区間で実行
    async fn admit_and_join(&self, claim: Option<Claim>, session: Session) -> Admission;

    /// セッションを削除（存在しなければ None、カウンタは変化しない）
    async fn leave(&self, connection_id: &ConnectionId) -> Option<Session>;

    async fn find(&self, connection_id: &ConnectionId) -> Option<Session>;

    async fn count(&self) -> usize;

    /// 接続中の全ての connectionId を参加順で取得
    async fn connection_ids(&self) -> Vec<ConnectionId>;

    /// join イベントのプロフィールを反映
    async fn update_profile(
        &self,
        connection_id: &ConnectionId,
        profile: SessionProfile,
    ) -> Option<Session>;

    /// グローバルモードのスナップショット
    async fn mode(&self) -> GlobalMode;

    async fn toggle(&self) -> ModeState;

    async fn emergency_exit(&self) -> ModeState;
}

/// Message Repository trait
///
/// 追記のみのメッセージ保存先。削除は `deleted` フラグ（論理削除）のみ。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追加
    async fn insert(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// 論理削除（存在しない ID は何もしない）
    async fn mark_deleted(&self, id: &MessageId) -> Result<(), RepositoryError>;

    /// 全メッセージを論理削除
    async fn mark_all_deleted(&self) -> Result<(), RepositoryError>;

    /// 未削除メッセージを新しい順に最大 `limit` 件取得
    async fn find_recent_newest_first(
        &self,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;
}

/// Push Subscription Repository trait（endpoint がキー）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// 追加（同じ endpoint があれば上書き）
    async fn upsert(&self, subscription: PushSubscription) -> Result<(), RepositoryError>;

    /// `old_endpoint` の購読を置き換える（存在しなければ何もしない）
    async fn update_by_endpoint(
        &self,
        old_endpoint: &str,
        subscription: PushSubscription,
    ) -> Result<(), RepositoryError>;

    async fn remove(&self, endpoint: &str) -> Result<(), RepositoryError>;

    async fn find_all(&self) -> Result<Vec<PushSubscription>, RepositoryError>;
}

/// Audit Log Repository trait（追記のみ）
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: AuditLogEntry) -> Result<(), RepositoryError>;

    async fn find_all(&self) -> Result<Vec<AuditLogEntry>, RepositoryError>;
}
