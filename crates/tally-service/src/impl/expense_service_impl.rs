//! Expense service implementation.

use super::allocate_slug;
use crate::dto::{ExpenseListResponse, ExpenseRequest, ExpenseResponse};
use crate::expense_service::ExpenseService;
use crate::mappers::expense_response;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shaku::Component;
use std::collections::HashMap;
use std::sync::Arc;
use tally_core::{
    money, Category, CategoryId, Expense, ExpenseId, PageRequest, TallyError, TallyResult, UserId, ValidateExt,
};
use tally_repository::{CategoryRepository, ExpenseRepository};
use tracing::{debug, info};

/// Expense service component.
#[derive(Component)]
#[shaku(interface = ExpenseService)]
pub struct ExpenseServiceComponent {
    #[shaku(inject)]
    expense_repository: Arc<dyn ExpenseRepository>,
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
}

impl ExpenseServiceComponent {
    /// Creates the service outside of a DI module.
    #[must_use]
    pub fn new(
        expense_repository: Arc<dyn ExpenseRepository>,
        category_repository: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            expense_repository,
            category_repository,
        }
    }

    /// Looks the category up by name and creates it when the owner has none.
    async fn get_or_create_category(&self, owner: UserId, name: &str) -> TallyResult<Category> {
        if let Some(category) = self.category_repository.find_by_name(owner, name).await? {
            return Ok(category);
        }

        let slug = allocate_slug(self.category_repository.as_ref(), owner, name, None).await?;
        let category = Category::new(owner, name.to_string(), slug, None);
        match self.category_repository.save(&category).await {
            Ok(saved) => {
                info!("Category created on the fly: {} ({})", saved.slug, saved.id);
                Ok(saved)
            }
            // A concurrent request created the same category first.
            Err(err @ TallyError::Conflict(_)) => {
                debug!("Category {} was created concurrently, reloading", name);
                self.category_repository.find_by_name(owner, name).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn find_expense(&self, owner: UserId, id: ExpenseId) -> TallyResult<Expense> {
        self.expense_repository
            .find_by_id(owner, id)
            .await?
            .ok_or_else(|| TallyError::not_found("Expense", id))
    }

    async fn find_category(&self, owner: UserId, id: CategoryId) -> TallyResult<Category> {
        self.category_repository
            .find_by_id(owner, id)
            .await?
            .ok_or_else(|| TallyError::internal(format!("Expense refers to missing category {id}")))
    }
}

/// Validates the request and returns the trimmed category name and the amount.
fn checked_request(request: &ExpenseRequest) -> TallyResult<(String, Decimal)> {
    request.validate_request()?;
    let amount = money::validate_amount(request.amount)?;
    Ok((request.category.trim().to_string(), amount))
}

#[async_trait]
impl ExpenseService for ExpenseServiceComponent {
    async fn list(&self, owner: UserId, query: Option<String>, page: PageRequest) -> TallyResult<ExpenseListResponse> {
        debug!("Listing expenses, page: {}, size: {}", page.page, page.size);

        let expenses = self.expense_repository.search(owner, query.as_deref(), page).await?;
        let categories: HashMap<CategoryId, Category> = self
            .category_repository
            .find_all(owner)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let info = expenses.info;
        let responses = expenses
            .content
            .into_iter()
            .map(|expense| {
                let category = categories.get(&expense.category_id).ok_or_else(|| {
                    TallyError::internal(format!("Expense refers to missing category {}", expense.category_id))
                })?;
                Ok(expense_response(expense, category))
            })
            .collect::<TallyResult<Vec<_>>>()?;

        Ok(ExpenseListResponse {
            expenses: responses,
            page: info,
        })
    }

    async fn create(&self, owner: UserId, request: ExpenseRequest) -> TallyResult<ExpenseResponse> {
        let (category_name, amount) = checked_request(&request)?;
        debug!("Creating expense of {} in {}", amount, category_name);

        let category = self.get_or_create_category(owner, &category_name).await?;

        let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
        let expense = Expense::new(owner, category.id, amount, request.description, date);
        let saved = self.expense_repository.save(&expense).await?;

        info!("Expense created: {}", saved.id);
        Ok(expense_response(saved, &category))
    }

    async fn get(&self, owner: UserId, id: ExpenseId) -> TallyResult<ExpenseResponse> {
        debug!("Getting expense: {}", id);

        let expense = self.find_expense(owner, id).await?;
        let category = self.find_category(owner, expense.category_id).await?;
        Ok(expense_response(expense, &category))
    }

    async fn update(&self, owner: UserId, id: ExpenseId, request: ExpenseRequest) -> TallyResult<ExpenseResponse> {
        let (category_name, amount) = checked_request(&request)?;
        debug!("Updating expense: {}", id);

        let mut expense = self.find_expense(owner, id).await?;
        let category = self.get_or_create_category(owner, &category_name).await?;

        let date = request.date.unwrap_or(expense.date);
        expense.update(category.id, amount, request.description, date);
        let updated = self.expense_repository.update(&expense).await?;

        info!("Expense updated: {}", updated.id);
        Ok(expense_response(updated, &category))
    }

    async fn delete(&self, owner: UserId, id: ExpenseId) -> TallyResult<()> {
        if !self.expense_repository.delete(owner, id).await? {
            return Err(TallyError::not_found("Expense", id));
        }

        info!("Expense deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for ExpenseServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::Ordering;
    use tally_core::LIMIT_REACHED_MESSAGE;

    fn create_service() -> (ExpenseServiceComponent, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        let service = ExpenseServiceComponent::new(store.clone(), store.clone());
        (service, store)
    }

    fn request(category: &str, amount: Decimal) -> ExpenseRequest {
        ExpenseRequest {
            category: category.to_string(),
            amount,
            description: "Lunch".to_string(),
            date: None,
        }
    }

    fn dated(category: &str, amount: Decimal, description: &str, day: u32) -> ExpenseRequest {
        ExpenseRequest {
            category: category.to_string(),
            amount,
            description: description.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, day),
        }
    }

    fn limit_category(store: &InMemoryStore, owner: UserId, name: &str, limit: Decimal) {
        let category = Category::new(owner, name.to_string(), tally_core::slugify(name), Some(limit));
        store.categories.lock().unwrap().insert(category.id, category);
    }

    #[tokio::test]
    async fn test_create_creates_missing_category() {
        let (service, store) = create_service();
        let owner = UserId::new();

        let created = service.create(owner, request("Eating Out", dec!(12.5))).await.unwrap();
        assert_eq!(created.category, "Eating Out");
        assert_eq!(created.category_slug, "eating-out");
        assert_eq!(created.date, Utc::now().date_naive());

        service.create(owner, request("Eating Out", dec!(3))).await.unwrap();
        assert_eq!(store.categories.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_reuses_category_created_concurrently() {
        let (service, store) = create_service();
        let owner = UserId::new();
        let first = service.create(owner, request("Food", dec!(5))).await.unwrap();

        store.stale_name_lookups.store(1, Ordering::SeqCst);
        let second = service.create(owner, request("Food", dec!(7))).await.unwrap();

        assert_eq!(second.category_slug, first.category_slug);
        assert_eq!(store.categories.lock().unwrap().len(), 1);
        assert_eq!(store.expenses.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_amount() {
        let (service, store) = create_service();

        for amount in [dec!(0), dec!(-10)] {
            let err = service.create(UserId::new(), request("Food", amount)).await.unwrap_err();
            assert_eq!(err.to_string(), "Amount must be greater than 0");
            assert_eq!(err.status_code(), 400);
        }
        assert!(store.categories.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_beyond_limit_is_rejected() {
        let (service, store) = create_service();
        let owner = UserId::new();
        limit_category(&store, owner, "Food", dec!(100));

        service.create(owner, request("Food", dec!(60))).await.unwrap();
        service.create(owner, request("Food", dec!(40))).await.unwrap();

        let err = service.create(owner, request("Food", dec!(0.01))).await.unwrap_err();
        assert!(matches!(err, TallyError::BusinessRule(ref m) if m == LIMIT_REACHED_MESSAGE));
        assert_eq!(err.status_code(), 400);
        assert_eq!(store.expenses.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_limit_is_unlimited() {
        let (service, store) = create_service();
        let owner = UserId::new();
        limit_category(&store, owner, "Food", Decimal::ZERO);

        assert!(service.create(owner, request("Food", dec!(1000000))).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_excludes_own_amount_from_limit() {
        let (service, store) = create_service();
        let owner = UserId::new();
        limit_category(&store, owner, "Food", dec!(100));

        let created = service.create(owner, request("Food", dec!(80))).await.unwrap();
        let updated = service.update(owner, created.id, request("Food", dec!(100))).await.unwrap();
        assert_eq!(updated.amount, dec!(100));

        let over = service.update(owner, created.id, request("Food", dec!(100.01))).await;
        assert!(matches!(over, Err(TallyError::BusinessRule(_))));
    }

    #[tokio::test]
    async fn test_update_moves_expense_and_keeps_date() {
        let (service, _) = create_service();
        let owner = UserId::new();

        let created = service.create(owner, dated("Food", dec!(5), "Taxi", 3)).await.unwrap();
        let updated = service.update(owner, created.id, request("Travel", dec!(7))).await.unwrap();

        assert_eq!(updated.category, "Travel");
        assert_eq!(updated.description, "Lunch");
        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    }

    #[tokio::test]
    async fn test_get_update_delete_are_owner_scoped() {
        let (service, _) = create_service();
        let owner = UserId::new();
        let stranger = UserId::new();
        let created = service.create(owner, request("Food", dec!(5))).await.unwrap();

        assert!(matches!(service.get(stranger, created.id).await, Err(TallyError::NotFound { .. })));
        assert!(matches!(
            service.update(stranger, created.id, request("Food", dec!(1))).await,
            Err(TallyError::NotFound { .. })
        ));
        assert!(matches!(service.delete(stranger, created.id).await, Err(TallyError::NotFound { .. })));

        assert!(service.get(owner, created.id).await.is_ok());
        service.delete(owner, created.id).await.unwrap();
        assert!(service.get(owner, created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_paginates_and_filters() {
        let (service, _) = create_service();
        let owner = UserId::new();
        for day in 1..=12 {
            service.create(owner, dated("Food", dec!(1), &format!("Meal {day}"), day)).await.unwrap();
        }
        service.create(owner, dated("Travel", dec!(50), "Train", 13)).await.unwrap();

        let first = service.list(owner, None, PageRequest::first()).await.unwrap();
        assert_eq!(first.expenses.len(), 10);
        assert_eq!(first.page.total_elements, 13);
        assert_eq!(first.expenses[0].description, "Train");

        let second = service.list(owner, None, PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(second.expenses.len(), 3);
        assert!(second.page.last);

        let travel = service.list(owner, Some("TRAV".to_string()), PageRequest::first()).await.unwrap();
        assert_eq!(travel.expenses.len(), 1);

        let meal = service.list(owner, Some("meal 1".to_string()), PageRequest::first()).await.unwrap();
        assert_eq!(meal.page.total_elements, 4);
    }
}
