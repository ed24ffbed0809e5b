//! Category service implementation.

use super::allocate_slug;
use crate::category_service::CategoryService;
use crate::dto::{
    CategoryDetailResponse, CategoryListResponse, CategoryResponse, CreateCategoryRequest, SetLimitRequest,
    UpdateCategoryRequest,
};
use crate::mappers::category_detail;
use async_trait::async_trait;
use rust_decimal::Decimal;
use shaku::Component;
use std::sync::Arc;
use tally_core::{money, Category, TallyError, TallyResult, UserId, ValidateExt};
use tally_repository::{CategoryRepository, ExpenseRepository};
use tracing::{debug, info};

/// Message returned when an owner already has a category of that name.
pub const DUPLICATE_CATEGORY_MESSAGE: &str = "Category with this name already exists";

/// Category service component.
#[derive(Component)]
#[shaku(interface = CategoryService)]
pub struct CategoryServiceComponent {
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
    #[shaku(inject)]
    expense_repository: Arc<dyn ExpenseRepository>,
}

impl CategoryServiceComponent {
    /// Creates the service outside of a DI module.
    #[must_use]
    pub fn new(
        category_repository: Arc<dyn CategoryRepository>,
        expense_repository: Arc<dyn ExpenseRepository>,
    ) -> Self {
        Self {
            category_repository,
            expense_repository,
        }
    }

    async fn find_by_slug(&self, owner: UserId, slug: &str) -> TallyResult<Category> {
        self.category_repository
            .find_by_slug(owner, slug)
            .await?
            .ok_or_else(|| TallyError::not_found_by("category", "slug", slug))
    }

    async fn ensure_name_free(&self, owner: UserId, name: &str, current: Option<&Category>) -> TallyResult<()> {
        match self.category_repository.find_by_name(owner, name).await? {
            Some(existing) if current.map_or(true, |c| c.id != existing.id) => {
                Err(TallyError::conflict(DUPLICATE_CATEGORY_MESSAGE))
            }
            _ => Ok(()),
        }
    }
}

fn checked_limit(limit: Option<Decimal>) -> TallyResult<Option<Decimal>> {
    limit.map(money::validate_limit).transpose()
}

#[async_trait]
impl CategoryService for CategoryServiceComponent {
    async fn list(&self, owner: UserId) -> TallyResult<CategoryListResponse> {
        debug!("Listing categories of {}", owner);

        let categories = self.category_repository.find_all(owner).await?;
        Ok(CategoryListResponse {
            categories: categories.into_iter().map(CategoryResponse::from).collect(),
        })
    }

    async fn create(&self, owner: UserId, request: CreateCategoryRequest) -> TallyResult<CategoryResponse> {
        request.validate_request()?;
        let name = request.name.trim().to_string();
        let limit = checked_limit(request.limit)?;

        self.ensure_name_free(owner, &name, None).await?;
        let slug = allocate_slug(self.category_repository.as_ref(), owner, &name, None).await?;

        let category = Category::new(owner, name, slug, limit);
        let saved = self.category_repository.save(&category).await?;

        info!("Category created: {} ({})", saved.slug, saved.id);
        Ok(CategoryResponse::from(saved))
    }

    async fn get_detail(&self, owner: UserId, slug: &str) -> TallyResult<CategoryDetailResponse> {
        debug!("Getting category detail: {}", slug);

        let category = self.find_by_slug(owner, slug).await?;
        let expenses = self.expense_repository.find_by_category(owner, category.id).await?;
        Ok(category_detail(category, &expenses))
    }

    async fn update(&self, owner: UserId, slug: &str, request: UpdateCategoryRequest) -> TallyResult<CategoryResponse> {
        request.validate_request()?;
        let name = request.name.trim().to_string();
        let limit = checked_limit(request.limit)?;

        let mut category = self.find_by_slug(owner, slug).await?;
        if category.name != name {
            self.ensure_name_free(owner, &name, Some(&category)).await?;
            let new_slug =
                allocate_slug(self.category_repository.as_ref(), owner, &name, Some(category.id)).await?;
            category.rename(name, new_slug);
        }
        category.set_limit(limit);

        let updated = self.category_repository.update(&category).await?;
        info!("Category updated: {} ({})", updated.slug, updated.id);
        Ok(CategoryResponse::from(updated))
    }

    async fn set_limit(&self, owner: UserId, slug: &str, request: SetLimitRequest) -> TallyResult<CategoryResponse> {
        let limit = checked_limit(request.limit)?;

        let mut category = self.find_by_slug(owner, slug).await?;
        category.set_limit(limit);

        let updated = self.category_repository.update(&category).await?;
        info!("Category limit set: {} -> {:?}", updated.slug, updated.limit);
        Ok(CategoryResponse::from(updated))
    }

    async fn delete(&self, owner: UserId, slug: &str) -> TallyResult<()> {
        let category = self.find_by_slug(owner, slug).await?;
        self.category_repository.delete(owner, category.id).await?;

        info!("Category deleted: {} ({})", category.slug, category.id);
        Ok(())
    }
}

impl std::fmt::Debug for CategoryServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceComponent").finish_non_exhaustive()
    }
}
