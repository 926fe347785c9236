//! UseCase: ワンタイムコードによる管理者ログイン

use std::{sync::Arc, time::Duration};

use crate::domain::{ClaimType, PasscodeVerifier, TokenService};

use super::error::LoginError;

/// 管理者トークンの有効期限（24 時間）
pub const ADMIN_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const ADMIN_SUBJECT: &str = "admin";

pub struct LoginUseCase {
    verifier: Arc<dyn PasscodeVerifier>,
    token_service: Arc<dyn TokenService>,
}

impl LoginUseCase {
    pub fn new(verifier: Arc<dyn PasscodeVerifier>, token_service: Arc<dyn TokenService>) -> Self {
        Self {
            verifier,
            token_service,
        }
    }

    /// コードを検証し、管理者トークンを発行する
    pub async fn execute(&self, code: Option<&str>) -> Result<String, LoginError> {
        let code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(LoginError::MissingCode)?;

        if !self.verifier.verify(code) {
            tracing::warn!("Admin login rejected: invalid code");
            return Err(LoginError::InvalidCode);
        }

        let token =
            self.token_service
                .issue(ClaimType::Admin, ADMIN_SUBJECT, None, ADMIN_TOKEN_TTL)?;
        tracing::info!("Admin token issued");
        Ok(token)
    }
}
