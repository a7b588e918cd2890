//! Custom Axum extractors.

pub mod auth;
pub mod cursor;

pub use auth::AuthUser;
pub use cursor::CursorParams;
