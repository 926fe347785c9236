//! Domain layer errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,
    #[error("user id must not be empty")]
    UserIdEmpty,
    #[error("message id must not be empty")]
    MessageIdEmpty,
    #[error("message content must not be empty")]
    MessageContentEmpty,
    #[error("unknown claim type '{0}'")]
    UnknownClaimType(String),
}

/// Durable-storage failure. Surfaced to the immediate caller, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),
    #[error("push failed: {0}")]
    PushFailed(String),
}

/// Missing, invalid or expired credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("credential missing")]
    MissingCredential,
    #[error("credential invalid: {0}")]
    InvalidCredential(String),
    #[error("credential carries unknown claim type '{0}'")]
    UnknownClaimType(String),
    #[error("failed to issue credential: {0}")]
    IssueFailed(String),
}

/// Email or push delivery failure. Logged only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("email delivery failed: {0}")]
    Email(String),
    #[error("push delivery failed: {0}")]
    Push(String),
    #[error("push subscription gone: {0}")]
    SubscriptionGone(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("object store write failed: {0}")]
    WriteFailed(String),
}
