//! # torchi-auth
//!
//! HS256 access tokens identifying the caller of the authenticated routes.
//! Login and token issuance flows live outside this service; the encoder is
//! kept for tooling and tests.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
