//! UseCase: メールアドレスによる購読
//!
//! 2 つの経路があります。
//! - 6 桁の数字を含まないアドレス: newUser テンプレートのメールを送る
//! - 6 桁の数字を含むアドレス: その数字をワンタイムコードとして検証し、
//!   有効かつ末尾が今日の日付と一致すれば匿名トークンを発行する
//!
//! 公開ステータスが「混雑」の間は何もせず、送信済みとして応答します。

use std::{sync::Arc, time::Duration};

use crate::domain::{
    ClaimType, EmailMessage, EmailTemplate, LobbyRepository, Mailer, PasscodeVerifier,
    TokenService,
};
use hatoba_shared::time::{Clock, day_of_month};

use super::error::SubscribeError;

/// 匿名トークンの有効期限（1 日）
pub const ANONYMOUS_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const ANONYMOUS_SUBJECT: &str = "Anonymous";
const CODE_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// 「送信しました」と応答する（実際に送ったかどうかは区別しない）
    EmailSent,
    Authenticated { access_token: String },
}

pub struct SubscribeUseCase {
    lobby: Arc<dyn LobbyRepository>,
    verifier: Arc<dyn PasscodeVerifier>,
    token_service: Arc<dyn TokenService>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
}

impl SubscribeUseCase {
    pub fn new(
        lobby: Arc<dyn LobbyRepository>,
        verifier: Arc<dyn PasscodeVerifier>,
        token_service: Arc<dyn TokenService>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lobby,
            verifier,
            token_service,
            mailer,
            clock,
        }
    }

    pub async fn execute(&self, email: Option<&str>) -> Result<SubscribeOutcome, SubscribeError> {
        if self.lobby.mode().await.is_publicly_busy() {
            return Ok(SubscribeOutcome::EmailSent);
        }

        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(SubscribeError::MissingEmail)?;

        let Some(code) = find_code(email) else {
            let name = email.split('@').next().unwrap_or(email).to_string();
            self.mailer
                .send(EmailMessage {
                    to: email.to_string(),
                    template: EmailTemplate::NewUser { name },
                    subject: None,
                    cc: None,
                })
                .await?;
            return Ok(SubscribeOutcome::EmailSent);
        };

        let today = day_of_month(self.clock.now_millis()).to_string();
        if !(self.verifier.verify(code) && code.ends_with(&today)) {
            return Ok(SubscribeOutcome::EmailSent);
        }

        let access_token = self.token_service.issue(
            ClaimType::Anonymous,
            ANONYMOUS_SUBJECT,
            Some(email),
            ANONYMOUS_TOKEN_TTL,
        )?;
        tracing::info!("Anonymous token issued");
        Ok(SubscribeOutcome::Authenticated { access_token })
    }
}

/// 最初に現れる 6 桁連続の数字
fn find_code(email: &str) -> Option<&str> {
    email
        .as_bytes()
        .windows(CODE_LENGTH)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .map(|start| &email[start..start + CODE_LENGTH])
}
