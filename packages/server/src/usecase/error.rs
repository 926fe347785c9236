//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{AuthError, DenyReason, NotificationError, RepositoryError};

/// 接続受付のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// 認証情報が無い・不正・期限切れ（401）
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),
    /// 受付ゲートによる拒否（理由はクライアントに返さない）
    #[error("admission denied: {0:?}")]
    Denied(DenyReason),
}

/// join イベント処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error("failed to acknowledge join: {0}")]
    AckFailed(String),
}

/// メッセージ投稿のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitMessageError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    /// 永続化に失敗（ブロードキャストは行われない）
    #[error("failed to persist message: {0}")]
    Persistence(#[from] RepositoryError),
    #[error("failed to broadcast message: {0}")]
    BroadcastFailed(String),
}

/// ワンタイムコードによるログインのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("code is required")]
    MissingCode,
    #[error("invalid code")]
    InvalidCode,
    #[error("failed to issue token: {0}")]
    IssueFailed(#[from] AuthError),
}

/// メールアドレスによる購読のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    #[error("email is required")]
    MissingEmail,
    #[error("failed to send email: {0}")]
    Email(#[from] NotificationError),
    #[error("failed to issue token: {0}")]
    IssueFailed(#[from] AuthError),
}

/// Push 購読の登録・更新のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushSubscriptionError {
    #[error("old_endpoint is required")]
    MissingOldEndpoint,
    #[error("test push failed: {0}")]
    TestPushFailed(#[from] NotificationError),
    #[error("failed to store subscription: {0}")]
    Persistence(#[from] RepositoryError),
}
