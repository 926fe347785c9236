//! External collaborator interfaces.
//!
//! Credential issuance, one-time passcodes, email, web push and object storage
//! are plain I/O wrappers. The relay depends only on these traits.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{
    entity::{Claim, PushSubscription},
    error::{AuthError, NotificationError, StorageError},
    value_object::ClaimType,
};

/// Verifies and issues bearer credentials.
pub trait TokenService: Send + Sync {
    /// Verify → claims. Unknown claim types are rejected here.
    fn verify(&self, token: &str) -> Result<Claim, AuthError>;

    fn issue(
        &self,
        claim_type: ClaimType,
        subject: &str,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<String, AuthError>;
}

/// Verify code → bool.
#[cfg_attr(test, mockall::automock)]
pub trait PasscodeVerifier: Send + Sync {
    fn verify(&self, code: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTemplate {
    /// Welcome mail for a plain subscribe request.
    NewUser { name: String },
    /// Digest sent when a guest is admitted.
    Notified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub template: EmailTemplate,
    pub subject: Option<String>,
    pub cc: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}

impl PushPayload {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), NotificationError>;
}

/// Store bytes → URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;
}
