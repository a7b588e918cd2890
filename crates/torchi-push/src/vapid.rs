//! VAPID key checks performed at startup.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

use torchi_core::error::AppError;

/// Length of a raw P-256 private scalar.
const PRIVATE_KEY_LEN: usize = 32;
/// Length of an uncompressed P-256 public point.
const PUBLIC_KEY_LEN: usize = 65;

fn decode(key: &str) -> Option<Vec<u8>> {
    let key = key.trim();
    URL_SAFE_NO_PAD
        .decode(key)
        .or_else(|_| URL_SAFE.decode(key))
        .ok()
}

/// Check that the private key is a base64url-encoded 32-byte scalar.
pub fn validate_private_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::configuration("push.vapid_private_key is not set"));
    }
    match decode(key) {
        Some(bytes) if bytes.len() == PRIVATE_KEY_LEN => Ok(()),
        Some(bytes) => Err(AppError::configuration(format!(
            "push.vapid_private_key must decode to {PRIVATE_KEY_LEN} bytes, got {}",
            bytes.len()
        ))),
        None => Err(AppError::configuration(
            "push.vapid_private_key is not valid base64url",
        )),
    }
}

/// Check that the public key, when set, is an uncompressed P-256 point.
pub fn validate_public_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Ok(());
    }
    match decode(key) {
        Some(bytes) if bytes.len() == PUBLIC_KEY_LEN && bytes[0] == 0x04 => Ok(()),
        _ => Err(AppError::configuration(
            "push.vapid_public_key must be a base64url uncompressed P-256 point",
        )),
    }
}
