//! Convenience result type alias for Torchi.

use crate::error::AppError;

/// A specialized `Result` type for Torchi operations.
pub type AppResult<T> = Result<T, AppError>;
