//! Repository trait definitions.
//!
//! Category and expense lookups always take the owner so that one user can
//! never read or modify another user's data.

use async_trait::async_trait;
use tally_core::{
    Category, CategoryId, Expense, ExpenseId, Interface, Page, PageRequest, Period, TallyResult, User, UserId,
};

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> TallyResult<Option<User>>;

    /// Finds a user by username or (case-insensitive) email.
    async fn find_by_username_or_email(&self, identifier: &str) -> TallyResult<Option<User>>;

    /// Checks if a username exists.
    async fn exists_by_username(&self, username: &str) -> TallyResult<bool>;

    /// Checks if an email exists.
    async fn exists_by_email(&self, email: &str) -> TallyResult<bool>;

    /// Saves a new user.
    async fn save(&self, user: &User) -> TallyResult<User>;
}

/// Category repository trait.
#[async_trait]
pub trait CategoryRepository: Interface {
    /// Finds a category by ID.
    async fn find_by_id(&self, owner: UserId, id: CategoryId) -> TallyResult<Option<Category>>;

    /// Finds a category by slug.
    async fn find_by_slug(&self, owner: UserId, slug: &str) -> TallyResult<Option<Category>>;

    /// Finds a category by exact name.
    async fn find_by_name(&self, owner: UserId, name: &str) -> TallyResult<Option<Category>>;

    /// Lists all categories of an owner, ordered by name.
    async fn find_all(&self, owner: UserId) -> TallyResult<Vec<Category>>;

    /// Checks if a slug is taken by a category other than `except`.
    async fn slug_taken(&self, owner: UserId, slug: &str, except: Option<CategoryId>) -> TallyResult<bool>;

    /// Saves a new category.
    async fn save(&self, category: &Category) -> TallyResult<Category>;

    /// Updates name, slug and limit of an existing category.
    async fn update(&self, category: &Category) -> TallyResult<Category>;

    /// Deletes a category together with its expenses.
    async fn delete(&self, owner: UserId, id: CategoryId) -> TallyResult<bool>;
}

/// Expense repository trait.
#[async_trait]
pub trait ExpenseRepository: Interface {
    /// Finds an expense by ID.
    async fn find_by_id(&self, owner: UserId, id: ExpenseId) -> TallyResult<Option<Expense>>;

    /// Lists expenses newest first, optionally filtered by a case-insensitive
    /// match on the description or the category name.
    async fn search(&self, owner: UserId, query: Option<&str>, page: PageRequest) -> TallyResult<Page<Expense>>;

    /// Lists every expense of a category, newest first.
    async fn find_by_category(&self, owner: UserId, category_id: CategoryId) -> TallyResult<Vec<Expense>>;

    /// Lists every expense of an owner, optionally restricted to a period.
    async fn find_by_owner(&self, owner: UserId, period: Option<Period>) -> TallyResult<Vec<Expense>>;

    /// Saves a new expense.
    ///
    /// Fails with a business-rule error when the expense would push its
    /// category past the limit. The check and the insert are atomic.
    async fn save(&self, expense: &Expense) -> TallyResult<Expense>;

    /// Updates an existing expense, checking the limit of its (possibly new)
    /// category atomically with the write. The expense's previous amount is
    /// not counted.
    async fn update(&self, expense: &Expense) -> TallyResult<Expense>;

    /// Deletes an expense.
    async fn delete(&self, owner: UserId, id: ExpenseId) -> TallyResult<bool>;
}
