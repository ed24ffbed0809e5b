//! SQLite repository implementations.

mod category_repository;
mod expense_repository;
mod user_repository;

pub use category_repository::SqliteCategoryRepository;
pub use expense_repository::SqliteExpenseRepository;
pub use user_repository::SqliteUserRepository;

use tally_core::TallyError;
use uuid::Uuid;

/// Parses a UUID stored as TEXT.
pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, TallyError> {
    Uuid::parse_str(value).map_err(|e| TallyError::Database(format!("Invalid UUID in database: {e}")))
}
