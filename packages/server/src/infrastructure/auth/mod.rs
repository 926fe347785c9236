//! Credential verification and issuance.

pub mod jwt;
pub mod totp;

pub use jwt::JwtTokenService;
pub use totp::TotpVerifier;
