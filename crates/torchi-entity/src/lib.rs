//! # torchi-entity
//!
//! Domain entity models for Torchi. Every struct in this crate represents a
//! database table row or a domain value object. Database entities derive
//! `sqlx::FromRow` so the PostgreSQL repositories can map rows directly.

pub mod device;
pub mod endpoint;
pub mod notification;
