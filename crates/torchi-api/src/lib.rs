//! # torchi-api
//!
//! HTTP surface for Torchi built on Axum. The public push API under
//! `/api` needs no login: the endpoint token is the credential. The
//! remaining routes serve the signed-in user and require a JWT.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
