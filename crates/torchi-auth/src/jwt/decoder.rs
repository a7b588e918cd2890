//! JWT access token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use torchi_core::config::AuthConfig;
use torchi_core::error::AppError;

use super::claims::Claims;

/// Validates access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_issuer(&[config.jwt_issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Rejected access token");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthenticated("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthenticated("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthenticated("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AppError::unauthenticated("Invalid token issuer")
                    }
                    _ => AppError::unauthenticated(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use torchi_core::error::ErrorKind;
    use uuid::Uuid;

    fn config(secret: &str, issuer: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.into(),
            jwt_issuer: issuer.into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let cfg = config("s3cret", "torchi");
        let user = Uuid::new_v4();
        let (token, _) = JwtEncoder::new(&cfg)
            .generate_access_token(user, "a@b.c")
            .expect("encode");
        let claims = JwtDecoder::new(&cfg).decode_access_token(&token).expect("decode");
        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.email, "a@b.c");
    }

    #[test]
    fn test_wrong_secret_is_unauthenticated() {
        let (token, _) = JwtEncoder::new(&config("one", "torchi"))
            .generate_access_token(Uuid::new_v4(), "a@b.c")
            .expect("encode");
        let err = JwtDecoder::new(&config("two", "torchi"))
            .decode_access_token(&token)
            .expect_err("bad signature");
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_wrong_issuer_is_unauthenticated() {
        let (token, _) = JwtEncoder::new(&config("s", "elsewhere"))
            .generate_access_token(Uuid::new_v4(), "a@b.c")
            .expect("encode");
        let err = JwtDecoder::new(&config("s", "torchi"))
            .decode_access_token(&token)
            .expect_err("bad issuer");
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_garbage_is_unauthenticated() {
        let err = JwtDecoder::new(&config("s", "torchi"))
            .decode_access_token("not-a-jwt")
            .expect_err("garbage");
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }
}
