//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// JWT validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Name of the cookie that may carry the access token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            jwt_access_ttl_minutes: default_access_ttl(),
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_issuer() -> String {
    "torchi".to_string()
}

fn default_access_ttl() -> u64 {
    60 * 24
}

fn default_cookie_name() -> String {
    "access_token".to_string()
}
