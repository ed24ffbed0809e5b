//! Expense service trait definition.

use crate::dto::{ExpenseListResponse, ExpenseRequest, ExpenseResponse};
use async_trait::async_trait;
use tally_core::{ExpenseId, Interface, PageRequest, TallyResult, UserId};

/// Expense service trait.
#[async_trait]
pub trait ExpenseService: Interface {
    /// Lists expenses newest first, optionally filtered by `query`.
    async fn list(&self, owner: UserId, query: Option<String>, page: PageRequest) -> TallyResult<ExpenseListResponse>;

    /// Records an expense, creating its category when needed.
    async fn create(&self, owner: UserId, request: ExpenseRequest) -> TallyResult<ExpenseResponse>;

    /// Gets an expense by ID.
    async fn get(&self, owner: UserId, id: ExpenseId) -> TallyResult<ExpenseResponse>;

    /// Replaces an expense.
    async fn update(&self, owner: UserId, id: ExpenseId, request: ExpenseRequest) -> TallyResult<ExpenseResponse>;

    /// Deletes an expense.
    async fn delete(&self, owner: UserId, id: ExpenseId) -> TallyResult<()>;
}
