//! Outbound email and Web Push delivery.
//!
//! Each collaborator has a real implementation and a logging-only one used
//! when credentials are not configured.

pub mod mail;
pub mod push;

pub use mail::{LoggingMailer, SendGridMailer};
pub use push::{LoggingPushNotifier, WebPushNotifier};
