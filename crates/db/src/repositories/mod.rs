//! Repositories for database operations.

mod report;
mod user;

pub use report::ReportRepository;
pub use user::UserRepository;

use servihub_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a database error to the application taxonomy.
///
/// Pool-acquire and connection failures are transient and surface as
/// `StorageUnavailable` so callers know a retry may succeed; everything
/// else is a hard `Database` error.
pub(crate) fn map_db_err(e: DbErr) -> AppError {
    match e {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => AppError::StorageUnavailable(e.to_string()),
        _ => AppError::Database(e.to_string()),
    }
}

/// Whether the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
