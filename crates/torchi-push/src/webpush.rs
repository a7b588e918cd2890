//! Web Push delivery over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use web_push::{ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessageBuilder};

use torchi_core::config::PushConfig;
use torchi_core::error::{AppError, ErrorKind};
use torchi_core::traits::{DeliveryError, PushMessage, PushTransport};
use torchi_entity::device::PushTarget;

use crate::payload::PushPayload;
use crate::vapid;

/// Response bodies kept in `Rejected` errors are cut to this many characters.
const MAX_ERROR_BODY: usize = 512;

/// Sends encrypted pushes with VAPID authentication.
///
/// Holds one `reqwest::Client` so connections to each push service are
/// pooled across deliveries.
#[derive(Clone)]
pub struct WebPushTransport {
    client: reqwest::Client,
    private_key: String,
    subscriber: String,
    ttl_seconds: u32,
}

impl std::fmt::Debug for WebPushTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebPushTransport")
            .field("subscriber", &self.subscriber)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl WebPushTransport {
    /// Create a transport from push configuration.
    ///
    /// Fails with `Configuration` when the VAPID keys are missing or malformed.
    pub fn new(config: &PushConfig) -> Result<Self, AppError> {
        vapid::validate_private_key(&config.vapid_private_key)?;
        vapid::validate_public_key(&config.vapid_public_key)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        info!(
            subscriber = %config.subscriber,
            ttl_seconds = config.ttl_seconds,
            "Web Push transport ready"
        );

        Ok(Self {
            client,
            private_key: config.vapid_private_key.trim().to_string(),
            subscriber: config.subscriber.clone(),
            ttl_seconds: config.ttl_seconds,
        })
    }

    fn encrypt(
        &self,
        target: &PushTarget,
        payload: &[u8],
    ) -> Result<web_push::WebPushMessage, DeliveryError> {
        let sub_info = SubscriptionInfo::new(&target.endpoint, &target.p256dh, &target.auth);

        let mut sig_builder = VapidSignatureBuilder::from_base64(&self.private_key, &sub_info)
            .map_err(|e| DeliveryError::Encoding(format!("VAPID key: {e}")))?;
        sig_builder.add_claim("sub", self.subscriber.as_str());
        let signature = sig_builder
            .build()
            .map_err(|e| DeliveryError::Encoding(format!("VAPID signature: {e}")))?;

        let mut builder = WebPushMessageBuilder::new(&sub_info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.ttl_seconds);

        builder
            .build()
            .map_err(|e| DeliveryError::Encoding(format!("payload encryption: {e}")))
    }
}

/// Map a push service response status to a delivery outcome.
fn classify(status: u16, body: &str) -> Result<(), DeliveryError> {
    match status {
        200..=299 => Ok(()),
        404 | 410 => Err(DeliveryError::Gone),
        _ => Err(DeliveryError::Rejected {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        }),
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn deliver(
        &self,
        target: &PushTarget,
        message: &PushMessage,
    ) -> Result<(), DeliveryError> {
        let payload = PushPayload::from_message(message)
            .to_bytes()
            .map_err(|e| DeliveryError::Encoding(format!("payload json: {e}")))?;
        let push = self.encrypt(target, &payload)?;

        let mut request = self
            .client
            .post(push.endpoint.to_string())
            .header("TTL", push.ttl.to_string());

        if let Some(urgency) = push.urgency {
            request = request.header("Urgency", urgency.to_string());
        }

        if let Some(topic) = push.topic {
            request = request.header("Topic", topic);
        }

        if let Some(body) = push.payload {
            request = request
                .header("Content-Encoding", body.content_encoding.to_str())
                .header("Content-Type", "application/octet-stream");

            for (key, value) in &body.crypto_headers {
                request = request.header(*key, value.as_str());
            }

            request = request.body(body.content);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = if (200..300).contains(&status) {
            String::new()
        } else {
            response.text().await.unwrap_or_default()
        };

        match classify(status, &text) {
            Ok(()) => {
                debug!(status, "Push accepted");
                Ok(())
            }
            Err(err) => {
                warn!(status, error = %err, "Push service refused delivery");
                Err(err)
            }
        }
    }
}
