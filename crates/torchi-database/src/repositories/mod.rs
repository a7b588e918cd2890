//! PostgreSQL implementations of the collaborator traits.

pub mod device;
pub mod endpoint;
pub mod notification;

pub use device::DeviceRepository;
pub use endpoint::EndpointRepository;
pub use notification::NotificationRepository;

use torchi_core::error::{AppError, ErrorKind};

/// Map a sqlx error, turning unique violations into `Conflict`.
pub(crate) fn map_write_error(err: sqlx::Error, message: &str) -> AppError {
    let unique = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique {
        AppError::with_source(ErrorKind::Conflict, message.to_string(), err)
    } else {
        AppError::with_source(ErrorKind::Database, message.to_string(), err)
    }
}
