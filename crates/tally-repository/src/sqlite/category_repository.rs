//! SQLite category repository implementation.

use super::parse_uuid;
use crate::{traits::CategoryRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tally_core::{money, Category, CategoryId, TallyError, TallyResult, UserId};
use tracing::debug;

const SELECT_CATEGORY: &str = r#"
    SELECT id, owner_id, name, slug, spend_limit, created_at, updated_at
    FROM categories
"#;

/// SQLite category repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CategoryRepository)]
pub struct SqliteCategoryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteCategoryRepository {
    /// Creates a new SQLite category repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn find_one(&self, clause: &str, owner: UserId, value: &str) -> TallyResult<Option<Category>> {
        let sql = format!("{SELECT_CATEGORY} WHERE owner_id = ? AND {clause} = ?");
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(owner.to_string())
            .bind(value)
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(Category::try_from).transpose()
    }
}

/// Database row representation of a category.
#[derive(Debug, FromRow)]
struct CategoryRow {
    id: String,
    owner_id: String,
    name: String,
    slug: String,
    spend_limit: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = TallyError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: CategoryId::from_uuid(parse_uuid(&row.id)?),
            owner_id: UserId::from_uuid(parse_uuid(&row.owner_id)?),
            name: row.name,
            slug: row.slug,
            limit: row.spend_limit.as_deref().map(money::from_storage).transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn find_by_id(&self, owner: UserId, id: CategoryId) -> TallyResult<Option<Category>> {
        debug!("Finding category by id: {}", id);
        self.find_one("id", owner, &id.to_string()).await
    }

    async fn find_by_slug(&self, owner: UserId, slug: &str) -> TallyResult<Option<Category>> {
        debug!("Finding category by slug: {}", slug);
        self.find_one("slug", owner, slug).await
    }

    async fn find_by_name(&self, owner: UserId, name: &str) -> TallyResult<Option<Category>> {
        debug!("Finding category by name: {}", name);
        self.find_one("name", owner, name).await
    }

    async fn find_all(&self, owner: UserId) -> TallyResult<Vec<Category>> {
        debug!("Listing categories for owner: {}", owner);

        let sql = format!("{SELECT_CATEGORY} WHERE owner_id = ? ORDER BY name ASC");
        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(owner.to_string())
            .fetch_all(self.pool.inner())
            .await?;

        rows.into_iter().map(Category::try_from).collect()
    }

    async fn slug_taken(&self, owner: UserId, slug: &str, except: Option<CategoryId>) -> TallyResult<bool> {
        let result: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM categories WHERE owner_id = ? AND slug = ? AND id != ? LIMIT 1",
        )
        .bind(owner.to_string())
        .bind(slug)
        .bind(except.map(|id| id.to_string()).unwrap_or_default())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(result.is_some())
    }

    async fn save(&self, category: &Category) -> TallyResult<Category> {
        debug!("Saving category: {}", category.name);

        sqlx::query(
            r#"
            INSERT INTO categories (id, owner_id, name, slug, spend_limit, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.id.to_string())
        .bind(category.owner_id.to_string())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.limit.map(money::to_storage))
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(category.owner_id, category.id)
            .await?
            .ok_or_else(|| TallyError::internal("Failed to retrieve saved category"))
    }

    async fn update(&self, category: &Category) -> TallyResult<Category> {
        debug!("Updating category: {}", category.id);

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, slug = ?, spend_limit = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.limit.map(money::to_storage))
        .bind(category.updated_at)
        .bind(category.id.to_string())
        .bind(category.owner_id.to_string())
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() == 0 {
            return Err(TallyError::not_found("Category", category.id));
        }

        self.find_by_id(category.owner_id, category.id)
            .await?
            .ok_or_else(|| TallyError::internal("Failed to retrieve updated category"))
    }

    async fn delete(&self, owner: UserId, id: CategoryId) -> TallyResult<bool> {
        debug!("Deleting category: {}", id);

        let result = sqlx::query("DELETE FROM categories WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
