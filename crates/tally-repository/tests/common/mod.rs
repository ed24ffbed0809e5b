//! Common test infrastructure for database integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use std::sync::Arc;
use tally_core::{Category, Email, User, UserId};
use tally_repository::{
    CategoryRepository, DatabasePool, DatabasePoolInterface, SqliteCategoryRepository, SqliteUserRepository,
    UserRepository,
};

/// Test database wrapper.
///
/// Every instance is a private in-memory SQLite database with migrations
/// applied, so tests never share state.
pub struct TestDatabase {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl TestDatabase {
    /// Creates a fresh database.
    pub async fn new() -> Self {
        let pool = DatabasePool::in_memory()
            .await
            .expect("Failed to create in-memory database");

        Self { pool: Arc::new(pool) }
    }

    /// Returns the database pool.
    pub fn pool(&self) -> Arc<dyn DatabasePoolInterface> {
        Arc::clone(&self.pool)
    }

    /// Inserts a user and returns its id.
    pub async fn create_user(&self, username: &str) -> UserId {
        let repo = SqliteUserRepository::new(self.pool());
        let user = User::new(
            username.to_string(),
            Email::new_unchecked(format!("{username}@example.com")),
            "hashed_password_123".to_string(),
        );
        repo.save(&user).await.expect("Failed to save user").id
    }

    /// Inserts a category without a limit.
    pub async fn create_category(&self, owner: UserId, name: &str) -> Category {
        let repo = SqliteCategoryRepository::new(self.pool());
        let category = Category::new(owner, name.to_string(), tally_core::slugify(name), None);
        repo.save(&category).await.expect("Failed to save category")
    }

    /// Inserts a category with a spend limit.
    pub async fn create_limited_category(&self, owner: UserId, name: &str, limit: Decimal) -> Category {
        let repo = SqliteCategoryRepository::new(self.pool());
        let category = Category::new(owner, name.to_string(), tally_core::slugify(name), Some(limit));
        repo.save(&category).await.expect("Failed to save category")
    }
}
