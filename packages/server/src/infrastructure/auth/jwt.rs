//! HS256 bearer tokens.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, Claim, ClaimType, Timestamp, TokenService};
use hatoba_shared::time::get_timestamp;

/// Token body. `type` stays a free string on the wire and is narrowed to
/// `ClaimType` right after signature verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "type")]
    pub kind: String,
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration time (Unix seconds)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn encode_claims(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::IssueFailed(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn verify(&self, token: &str) -> Result<Claim, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;
        let claims = data.claims;

        let claim_type = ClaimType::try_from(claims.kind.as_str())
            .map_err(|_| AuthError::UnknownClaimType(claims.kind.clone()))?;

        Ok(Claim::new(
            claim_type,
            claims.sub,
            Timestamp::new(claims.iat * 1000),
        ))
    }

    fn issue(
        &self,
        claim_type: ClaimType,
        subject: &str,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = get_timestamp() / 1000;
        let claims = TokenClaims {
            kind: claim_type.as_str().to_string(),
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            email: email.map(str::to_string),
        };
        self.encode_claims(&claims)
    }
}
