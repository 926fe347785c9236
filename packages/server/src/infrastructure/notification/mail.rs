//! Templated email via the SendGrid v3 API.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::{EmailMessage, EmailTemplate, Mailer, NotificationError};

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";
const NEW_USER_TEMPLATE_ID: &str = "d-8e2f6e4fbb4d4a31a2ea7db1e8e3664e";
const NOTIFIED_TEMPLATE_ID: &str = "d-189c01af523f4775b0673617f86b74fb";
const SENDER_NAME: &str = "Hatoba";

pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl SendGridMailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
        }
    }

    fn request_body(&self, message: &EmailMessage) -> Value {
        let (template_id, template_data) = match &message.template {
            EmailTemplate::NewUser { name } => (NEW_USER_TEMPLATE_ID, json!({ "name": name })),
            EmailTemplate::Notified => (NOTIFIED_TEMPLATE_ID, json!({})),
        };

        let mut personalization = json!({
            "to": [{ "email": message.to }],
            "dynamic_template_data": template_data,
        });
        if let Some(cc) = &message.cc {
            personalization["cc"] = json!([{ "email": cc }]);
        }
        if let Some(subject) = &message.subject {
            personalization["subject"] = json!(subject);
        }

        json!({
            "personalizations": [personalization],
            "from": { "email": self.from, "name": SENDER_NAME },
            "template_id": template_id,
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&message))
            .send()
            .await
            .map_err(|e| NotificationError::Email(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Email sent to '{}'", message.to);
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(NotificationError::Email(format!(
                "sendgrid returned {}: {}",
                status, text
            )))
        }
    }
}

/// Mailer that only logs. Used when no SendGrid key is configured.
#[derive(Debug, Default)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %message.to,
            template = ?message.template,
            "Email delivery disabled; dropping message"
        );
        Ok(())
    }
}
