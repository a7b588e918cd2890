//! Core type definitions used across the Torchi workspace.

pub mod cursor;

pub use cursor::{CursorPage, CursorRequest};
