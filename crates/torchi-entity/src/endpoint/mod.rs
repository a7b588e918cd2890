//! Endpoint domain entities.

pub mod model;

pub use model::Endpoint;
