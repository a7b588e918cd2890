//! Endpoint management for the authenticated user.

pub mod service;
pub mod token;

pub use service::EndpointService;
