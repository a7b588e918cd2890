//! # torchi-core
//!
//! Core crate for Torchi. Contains the collaborator traits the push engine
//! is written against, configuration schemas, cursor pagination types,
//! and the unified error system.
//!
//! The only internal dependency is `torchi-entity`, whose row models appear
//! in trait signatures.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
