//! UseCase: 参加者接続処理（受付ゲート）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 認証情報の検証、受付判定、セッション登録、匿名ゲスト入室時の副作用
//!
//! ### なぜこのテストが必要か
//! - 匿名ゲストの入室上限（他に 1 人まで）の境界を固定する
//! - 非アクティブ時の拒否と、管理者の無条件許可を保証する
//! - 受付と参加が 1 つの排他区間で行われ、人数とカウンタが一致することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者・匿名ゲストの接続
//! - 異常系：認証情報なし・不正、非アクティブ、満員
//! - エッジケース：ライブ人数 0 / 1 / 2 の境界

use std::sync::Arc;

use crate::domain::{
    Admission, AuditLogEntry, AuditLogRepository, AuthError, ClaimType, ConnectionIdFactory,
    LobbyRepository, MessagePusher, PusherChannel, Session, Timestamp, TokenService,
};
use hatoba_shared::time::get_timestamp;

use super::{error::AdmissionError, notify_fanout::NotifyFanoutUseCase};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    lobby: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    token_service: Arc<dyn TokenService>,
    audit_log: Arc<dyn AuditLogRepository>,
    fanout: Arc<NotifyFanoutUseCase>,
    /// 匿名ゲスト入室時に監査ログと通知ファンアウトを行うか
    admission_side_effects: bool,
}

impl ConnectParticipantUseCase {
    pub fn new(
        lobby: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        token_service: Arc<dyn TokenService>,
        audit_log: Arc<dyn AuditLogRepository>,
        fanout: Arc<NotifyFanoutUseCase>,
        admission_side_effects: bool,
    ) -> Self {
        Self {
            lobby,
            message_pusher,
            token_service,
            audit_log,
            fanout,
            admission_side_effects,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `token` - ハンドシェイクで提示された bearer トークン
    /// * `sender` - クライアントへのイベント送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 受付成功（プレゼンスに登録済み）
    /// * `Err(AdmissionError)` - 認証失敗または受付拒否
    pub async fn execute(
        &self,
        token: Option<&str>,
        sender: PusherChannel,
    ) -> Result<Session, AdmissionError> {
        // 1. 認証情報の検証
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        let claim = self.token_service.verify(token)?;

        // 2. 受付判定と参加を同じ排他区間で行う
        let session = Session::admitted(ConnectionIdFactory::generate(), claim.claim_type);
        match self
            .lobby
            .admit_and_join(Some(claim.clone()), session.clone())
            .await
        {
            Admission::Allow => {}
            Admission::Deny(reason) => {
                tracing::warn!(
                    "Admission denied for {} claim: {:?}",
                    claim.claim_type.as_str(),
                    reason
                );
                return Err(AdmissionError::Denied(reason));
            }
        }

        // 3. MessagePusher にクライアントを登録
        self.message_pusher
            .register_client(session.connection_id.clone(), sender)
            .await;

        // 4. 匿名ゲストの入室時のみ副作用
        if claim.claim_type == ClaimType::Anonymous && self.admission_side_effects {
            let entry = AuditLogEntry::login(&claim.subject, Timestamp::new(get_timestamp()));
            if let Err(e) = self.audit_log.append(entry).await {
                tracing::warn!("Failed to write login audit entry: {}", e);
            }
            self.fanout.trigger();
        }

        tracing::info!(
            "Connection '{}' admitted ({})",
            session.connection_id.as_str(),
            claim.claim_type.as_str()
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DenyReason, Lobby},
        infrastructure::{
            auth::JwtTokenService,
            message_pusher::WebSocketMessagePusher,
            notification::{LoggingMailer, LoggingPushNotifier},
            repository::{
                InMemoryAuditLogRepository, InMemoryLobbyRepository,
                InMemorySubscriptionRepository,
            },
        },
    };
    use std::{collections::HashMap, time::Duration};
    use tokio::sync::Mutex;

    const SECRET: &[u8] = b"connect-test-secret";

    struct Fixture {
        lobby: Arc<InMemoryLobbyRepository>,
        audit_log: Arc<InMemoryAuditLogRepository>,
        tokens: Arc<JwtTokenService>,
        usecase: ConnectParticipantUseCase,
    }

    fn create_fixture(admission_side_effects: bool) -> Fixture {
        let lobby = Arc::new(InMemoryLobbyRepository::new(Arc::new(Mutex::new(
            Lobby::new(),
        ))));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let tokens = Arc::new(JwtTokenService::new(SECRET));
        let audit_log = Arc::new(InMemoryAuditLogRepository::new());
        let fanout = Arc::new(NotifyFanoutUseCase::new(
            Arc::new(InMemorySubscriptionRepository::new()),
            Arc::new(LoggingPushNotifier),
            Arc::new(LoggingMailer),
            None,
        ));
        let usecase = ConnectParticipantUseCase::new(
            lobby.clone(),
            message_pusher,
            tokens.clone(),
            audit_log.clone(),
            fanout,
            admission_side_effects,
        );
        Fixture {
            lobby,
            audit_log,
            tokens,
            usecase,
        }
    }

    fn issue_token(tokens: &JwtTokenService, claim_type: ClaimType) -> String {
        tokens
            .issue(claim_type, "Anonymous", None, Duration::from_secs(60))
            .unwrap()
    }

    async fn connect(fixture: &Fixture, claim_type: ClaimType) -> Result<Session, AdmissionError> {
        let token = issue_token(&fixture.tokens, claim_type);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        fixture.usecase.execute(Some(&token), tx).await
    }

    #[tokio::test]
    async fn test_connect_anonymous_success() {
        // テスト項目: 誰もいない状態で匿名ゲストが接続できる
        // given (前提条件):
        let fixture = create_fixture(true);

        // when (操作):
        let result = connect(&fixture, ClaimType::Anonymous).await;

        // then (期待する結果):
        let session = result.unwrap();
        assert_eq!(session.claim_type, ClaimType::Anonymous);
        assert_eq!(session.user_id.as_str(), session.connection_id.as_str());
        assert_eq!(fixture.lobby.count().await, 1);
        assert_eq!(fixture.lobby.mode().await.live_user_count(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_occupancy_boundary() {
        // テスト項目: ライブ人数 0 と 1 では許可、2 では拒否される
        // given (前提条件):
        let fixture = create_fixture(true);

        // when (操作):
        let first = connect(&fixture, ClaimType::Anonymous).await;
        let second = connect(&fixture, ClaimType::Anonymous).await;
        let third = connect(&fixture, ClaimType::Anonymous).await;

        // then (期待する結果):
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(third, Err(AdmissionError::Denied(DenyReason::Occupied)));
        assert_eq!(fixture.lobby.count().await, 2);
    }

    #[tokio::test]
    async fn test_admin_bypasses_capacity_and_activity() {
        // テスト項目: 管理者は満員・非アクティブでも接続できる
        // given (前提条件):
        let fixture = create_fixture(true);
        connect(&fixture, ClaimType::Anonymous).await.unwrap();
        connect(&fixture, ClaimType::Anonymous).await.unwrap();
        fixture.lobby.emergency_exit().await;

        // when (操作):
        let result = connect(&fixture, ClaimType::Admin).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(fixture.lobby.count().await, 3);
    }

    #[tokio::test]
    async fn test_anonymous_denied_when_inactive() {
        // テスト項目: 非アクティブ時は匿名ゲストが拒否される
        // given (前提条件):
        let fixture = create_fixture(true);
        fixture.lobby.toggle().await;

        // when (操作):
        let result = connect(&fixture, ClaimType::Anonymous).await;

        // then (期待する結果):
        assert_eq!(result, Err(AdmissionError::Denied(DenyReason::Inactive)));
        assert_eq!(fixture.lobby.count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_and_invalid_credentials() {
        // テスト項目: 認証情報なし・不正なトークンは Unauthorized になる
        // given (前提条件):
        let fixture = create_fixture(true);
        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, _rx2) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        let missing = fixture.usecase.execute(None, tx1).await;
        let invalid = fixture.usecase.execute(Some("garbage"), tx2).await;

        // then (期待する結果):
        assert_eq!(
            missing,
            Err(AdmissionError::Unauthorized(AuthError::MissingCredential))
        );
        assert!(matches!(
            invalid,
            Err(AdmissionError::Unauthorized(AuthError::InvalidCredential(_)))
        ));
        assert_eq!(fixture.lobby.count().await, 0);
    }

    #[tokio::test]
    async fn test_anonymous_admission_writes_login_audit() {
        // テスト項目: 匿名ゲストの入室で login の監査ログが記録される
        // given (前提条件):
        let fixture = create_fixture(true);

        // when (操作):
        connect(&fixture, ClaimType::Anonymous).await.unwrap();
        connect(&fixture, ClaimType::Admin).await.unwrap();

        // then (期待する結果): 管理者の入室は記録されない
        let entries = fixture.audit_log.find_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Anonymous user logged in");
        assert_eq!(entries[0].user, "Anonymous");
    }

    #[tokio::test]
    async fn test_side_effects_disabled() {
        // テスト項目: 副作用を無効にすると監査ログは記録されない
        // given (前提条件):
        let fixture = create_fixture(false);

        // when (操作):
        connect(&fixture, ClaimType::Anonymous).await.unwrap();

        // then (期待する結果):
        assert!(fixture.audit_log.find_all().await.unwrap().is_empty());
        assert_eq!(fixture.lobby.count().await, 1);
    }
}
