//! Web Push and reply-wait configuration.

use serde::{Deserialize, Serialize};

/// Push delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// VAPID application server public key (base64url, uncompressed P-256).
    #[serde(default)]
    pub vapid_public_key: String,
    /// VAPID private key (base64url, 32 raw bytes).
    #[serde(default)]
    pub vapid_private_key: String,
    /// Contact for the VAPID `sub` claim (`mailto:` or `https:`).
    #[serde(default = "default_subscriber")]
    pub subscriber: String,
    /// How long the push service may hold an undelivered message.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u32,
    /// Reply deadline used when the caller does not send one.
    #[serde(default = "default_reply_timeout")]
    pub default_reply_timeout_seconds: u64,
    /// Upper bound for caller-supplied reply deadlines.
    #[serde(default = "default_max_reply_timeout")]
    pub max_reply_timeout_seconds: u64,
    /// HTTP timeout for one request to a push service.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            vapid_public_key: String::new(),
            vapid_private_key: String::new(),
            subscriber: default_subscriber(),
            ttl_seconds: default_ttl(),
            default_reply_timeout_seconds: default_reply_timeout(),
            max_reply_timeout_seconds: default_max_reply_timeout(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl PushConfig {
    /// Resolve the effective reply deadline for a requested value in seconds.
    ///
    /// Missing or zero falls back to the default; anything above the
    /// maximum is clamped.
    pub fn reply_timeout(&self, requested: Option<u64>) -> std::time::Duration {
        let seconds = match requested {
            Some(s) if s > 0 => s.min(self.max_reply_timeout_seconds),
            _ => self.default_reply_timeout_seconds,
        };
        std::time::Duration::from_secs(seconds)
    }
}

fn default_subscriber() -> String {
    "mailto:admin@localhost".to_string()
}

fn default_ttl() -> u32 {
    300
}

fn default_reply_timeout() -> u64 {
    300
}

fn default_max_reply_timeout() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    10
}
