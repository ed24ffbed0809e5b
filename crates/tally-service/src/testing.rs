//! In-memory repository fakes shared by the service tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tally_core::{
    money, Category, CategoryId, Expense, ExpenseId, Page, PageRequest, Period, TallyError, TallyResult, User,
    UserId,
};
use tally_repository::{CategoryRepository, ExpenseRepository, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> TallyResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> TallyResult<Option<User>> {
        let email = identifier.trim().to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == identifier || u.email.as_str() == email)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> TallyResult<bool> {
        Ok(self.users.lock().unwrap().values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> TallyResult<bool> {
        let email = email.trim().to_lowercase();
        Ok(self.users.lock().unwrap().values().any(|u| u.email.as_str() == email))
    }

    async fn save(&self, user: &User) -> TallyResult<User> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user.clone())
    }
}

/// Categories and expenses share one store so that deletes cascade.
#[derive(Default)]
pub struct InMemoryStore {
    pub categories: Mutex<HashMap<CategoryId, Category>>,
    pub expenses: Mutex<HashMap<ExpenseId, Expense>>,
    /// Number of upcoming `find_by_name` calls that miss, as if another
    /// request had not committed its category yet.
    pub stale_name_lookups: AtomicUsize,
}

fn newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

/// Same rule as the SQLite repository: both maps are locked by the caller.
fn check_limit(
    categories: &HashMap<CategoryId, Category>,
    expenses: &HashMap<ExpenseId, Expense>,
    expense: &Expense,
) -> TallyResult<()> {
    let category = categories
        .get(&expense.category_id)
        .filter(|c| c.owner_id == expense.owner_id)
        .ok_or_else(|| TallyError::validation(format!("Category {} does not exist", expense.category_id)))?;
    let spent = money::sum(
        expenses
            .values()
            .filter(|e| e.category_id == category.id && e.id != expense.id)
            .map(|e| e.amount),
    );
    category.ensure_within_limit(spent, expense.amount)
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_id(&self, owner: UserId, id: CategoryId) -> TallyResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .get(&id)
            .filter(|c| c.owner_id == owner)
            .cloned())
    }

    async fn find_by_slug(&self, owner: UserId, slug: &str) -> TallyResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .find(|c| c.owner_id == owner && c.slug == slug)
            .cloned())
    }

    async fn find_by_name(&self, owner: UserId, name: &str) -> TallyResult<Option<Category>> {
        let stale = self
            .stale_name_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(None);
        }
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .find(|c| c.owner_id == owner && c.name == name)
            .cloned())
    }

    async fn find_all(&self, owner: UserId) -> TallyResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .categories
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.owner_id == owner)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn slug_taken(&self, owner: UserId, slug: &str, except: Option<CategoryId>) -> TallyResult<bool> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .any(|c| c.owner_id == owner && c.slug == slug && Some(c.id) != except))
    }

    async fn save(&self, category: &Category) -> TallyResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        if categories
            .values()
            .any(|c| c.owner_id == category.owner_id && c.name == category.name)
        {
            return Err(TallyError::conflict("UNIQUE constraint failed: categories.owner_id, categories.name"));
        }
        categories.insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn update(&self, category: &Category) -> TallyResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        match categories.get_mut(&category.id) {
            Some(existing) if existing.owner_id == category.owner_id => {
                *existing = category.clone();
                Ok(category.clone())
            }
            _ => Err(TallyError::not_found("Category", category.id)),
        }
    }

    async fn delete(&self, owner: UserId, id: CategoryId) -> TallyResult<bool> {
        let mut categories = self.categories.lock().unwrap();
        if !categories.get(&id).is_some_and(|c| c.owner_id == owner) {
            return Ok(false);
        }
        categories.remove(&id);
        self.expenses.lock().unwrap().retain(|_, e| e.category_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryStore {
    async fn find_by_id(&self, owner: UserId, id: ExpenseId) -> TallyResult<Option<Expense>> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .get(&id)
            .filter(|e| e.owner_id == owner)
            .cloned())
    }

    async fn search(&self, owner: UserId, query: Option<&str>, page: PageRequest) -> TallyResult<Page<Expense>> {
        let query = query.map(|q| q.trim().to_ascii_lowercase()).filter(|q| !q.is_empty());
        let categories = self.categories.lock().unwrap().clone();
        let mut matching: Vec<Expense> = self
            .expenses
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.owner_id == owner)
            .filter(|e| match &query {
                Some(q) => {
                    e.description.to_ascii_lowercase().contains(q)
                        || categories
                            .get(&e.category_id)
                            .is_some_and(|c| c.name.to_ascii_lowercase().contains(q))
                }
                None => true,
            })
            .cloned()
            .collect();
        newest_first(&mut matching);

        let total = matching.len() as u64;
        let content = matching.into_iter().skip(page.offset()).take(page.limit()).collect();
        Ok(Page::new(content, page, total))
    }

    async fn find_by_category(&self, owner: UserId, category_id: CategoryId) -> TallyResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.owner_id == owner && e.category_id == category_id)
            .cloned()
            .collect();
        newest_first(&mut expenses);
        Ok(expenses)
    }

    async fn find_by_owner(&self, owner: UserId, period: Option<Period>) -> TallyResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.owner_id == owner && period.map_or(true, |p| p.contains(e.date)))
            .cloned()
            .collect();
        newest_first(&mut expenses);
        Ok(expenses)
    }

    async fn save(&self, expense: &Expense) -> TallyResult<Expense> {
        let categories = self.categories.lock().unwrap();
        let mut expenses = self.expenses.lock().unwrap();
        check_limit(&categories, &expenses, expense)?;
        expenses.insert(expense.id, expense.clone());
        Ok(expense.clone())
    }

    async fn update(&self, expense: &Expense) -> TallyResult<Expense> {
        let categories = self.categories.lock().unwrap();
        let mut expenses = self.expenses.lock().unwrap();
        check_limit(&categories, &expenses, expense)?;
        match expenses.get_mut(&expense.id) {
            Some(existing) if existing.owner_id == expense.owner_id => {
                *existing = expense.clone();
                Ok(expense.clone())
            }
            _ => Err(TallyError::not_found("Expense", expense.id)),
        }
    }

    async fn delete(&self, owner: UserId, id: ExpenseId) -> TallyResult<bool> {
        let mut expenses = self.expenses.lock().unwrap();
        if !expenses.get(&id).is_some_and(|e| e.owner_id == owner) {
            return Ok(false);
        }
        expenses.remove(&id);
        Ok(true)
    }
}
