//! Web Push delivery with VAPID authentication (RFC 8292).
//!
//! The JSON payload is encrypted for the subscription's keys with the
//! `aes128gcm` content encoding (RFC 8291).

use std::time::Duration;

use async_trait::async_trait;
use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use url::Url;

use crate::domain::{NotificationError, PushNotifier, PushPayload, PushSubscription};
use hatoba_shared::time::get_timestamp;

/// VAPID token lifetime (12 hours, the maximum push services accept is 24).
const VAPID_TOKEN_TTL: Duration = Duration::from_secs(12 * 60 * 60);
/// How long the push service keeps an undelivered message (4 weeks).
const PUSH_TTL_SECONDS: &str = "2419200";

#[derive(Debug, Serialize)]
struct VapidClaims {
    aud: String,
    exp: i64,
    sub: String,
}

pub struct WebPushNotifier {
    client: reqwest::Client,
    signing_key: EncodingKey,
    public_key: String,
    subject: String,
}

impl WebPushNotifier {
    /// `private_key_pem` is the P-256 VAPID key in PEM form. `subject` is a
    /// `mailto:` or `https:` contact.
    pub fn new(
        private_key_pem: &[u8],
        public_key: String,
        subject: String,
    ) -> Result<Self, NotificationError> {
        let signing_key = EncodingKey::from_ec_pem(private_key_pem)
            .map_err(|e| NotificationError::Push(format!("invalid VAPID key: {}", e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            signing_key,
            public_key,
            subject,
        })
    }

    fn vapid_token(&self, endpoint: &str) -> Result<String, NotificationError> {
        let claims = VapidClaims {
            aud: endpoint_origin(endpoint)?,
            exp: get_timestamp() / 1000 + VAPID_TOKEN_TTL.as_secs() as i64,
            sub: self.subject.clone(),
        };
        encode(&Header::new(Algorithm::ES256), &claims, &self.signing_key)
            .map_err(|e| NotificationError::Push(format!("VAPID signing failed: {}", e)))
    }
}

#[async_trait]
impl PushNotifier for WebPushNotifier {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), NotificationError> {
        let token = self.vapid_token(&subscription.endpoint)?;
        let body = encrypt_payload(subscription, payload)?;

        let response = self
            .client
            .post(&subscription.endpoint)
            .header(
                "Authorization",
                format!("vapid t={},k={}", token, self.public_key),
            )
            .header("TTL", PUSH_TTL_SECONDS)
            .header("Content-Encoding", "aes128gcm")
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(|e| NotificationError::Push(e.to_string()))?;

        match response.status().as_u16() {
            200..=299 => {
                tracing::debug!(
                    endpoint = %subscription.endpoint,
                    title = %payload.title,
                    "Push delivered"
                );
                Ok(())
            }
            404 | 410 => Err(NotificationError::SubscriptionGone(
                subscription.endpoint.clone(),
            )),
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(NotificationError::Push(format!(
                    "push endpoint returned {}: {}",
                    status, text
                )))
            }
        }
    }
}

/// Notifier that only logs. Used when no VAPID key is configured.
#[derive(Debug, Default)]
pub struct LoggingPushNotifier;

#[async_trait]
impl PushNotifier for LoggingPushNotifier {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            endpoint = %subscription.endpoint,
            title = %payload.title,
            body = %payload.body,
            "Web Push disabled; dropping notification"
        );
        Ok(())
    }
}

/// Serializes the payload to JSON and encrypts it for the subscriber.
fn encrypt_payload(
    subscription: &PushSubscription,
    payload: &PushPayload,
) -> Result<Vec<u8>, NotificationError> {
    let p256dh = decode_key(&subscription.keys.p256dh)
        .map_err(|e| NotificationError::Push(format!("bad p256dh: {}", e)))?;
    let auth = decode_key(&subscription.keys.auth)
        .map_err(|e| NotificationError::Push(format!("bad auth: {}", e)))?;
    let json = serde_json::to_vec(payload).map_err(|e| NotificationError::Push(e.to_string()))?;
    ece::encrypt(&p256dh, &auth, &json)
        .map_err(|e| NotificationError::Push(format!("payload encryption failed: {}", e)))
}

/// Browsers hand out URL-safe base64 keys, usually unpadded.
fn decode_key(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD
        .decode(input)
        .or_else(|_| URL_SAFE.decode(input))
        .or_else(|_| STANDARD.decode(input))
}

/// Scheme + host (+ port) of the push endpoint, used as the VAPID audience.
fn endpoint_origin(endpoint: &str) -> Result<String, NotificationError> {
    let url = Url::parse(endpoint)
        .map_err(|e| NotificationError::Push(format!("bad endpoint URL: {}", e)))?;
    if url.host_str().is_none() {
        return Err(NotificationError::Push(
            "endpoint URL has no host".to_string(),
        ));
    }
    Ok(url.origin().ascii_serialization())
}
