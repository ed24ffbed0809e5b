//! # Tally Repository
//!
//! Data access for Tally:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn CategoryRepository>   (domain interface, traits.rs)
//! SqliteCategoryRepository           (sqlite/)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! SQLite
//! ```
//!
//! The schema lives in the workspace `migrations/` directory and is embedded
//! into the binary with `sqlx::migrate!`.

pub mod pool;
pub mod sqlite;
pub mod traits;

pub use pool::*;
pub use sqlite::*;
pub use traits::*;
