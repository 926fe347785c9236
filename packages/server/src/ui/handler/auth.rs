//! Bearer credential extraction for the administrative surface.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::{domain::Claim, ui::error::ApiError, ui::state::AppState};

/// Verified admin or anonymous claim from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthorizedClaim(pub Claim);

impl FromRequestParts<Arc<AppState>> for AuthorizedClaim {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let claim = state.token_service.verify(&token).map_err(|e| {
            tracing::warn!("Rejected administrative request: {}", e);
            ApiError::Unauthorized
        })?;
        Ok(Self(claim))
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}
