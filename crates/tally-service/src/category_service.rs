//! Category service trait definition.

use crate::dto::{
    CategoryDetailResponse, CategoryListResponse, CategoryResponse, CreateCategoryRequest, SetLimitRequest,
    UpdateCategoryRequest,
};
use async_trait::async_trait;
use tally_core::{Interface, TallyResult, UserId};

/// Category service trait.
///
/// Categories are addressed by slug, which is unique per owner.
#[async_trait]
pub trait CategoryService: Interface {
    /// Lists the owner's categories ordered by name.
    async fn list(&self, owner: UserId) -> TallyResult<CategoryListResponse>;

    /// Creates a category.
    async fn create(&self, owner: UserId, request: CreateCategoryRequest) -> TallyResult<CategoryResponse>;

    /// Returns a category with its expenses and aggregates.
    async fn get_detail(&self, owner: UserId, slug: &str) -> TallyResult<CategoryDetailResponse>;

    /// Renames a category and replaces its limit.
    async fn update(&self, owner: UserId, slug: &str, request: UpdateCategoryRequest) -> TallyResult<CategoryResponse>;

    /// Sets or clears the spend limit.
    async fn set_limit(&self, owner: UserId, slug: &str, request: SetLimitRequest) -> TallyResult<CategoryResponse>;

    /// Deletes a category and its expenses.
    async fn delete(&self, owner: UserId, slug: &str) -> TallyResult<()>;
}
