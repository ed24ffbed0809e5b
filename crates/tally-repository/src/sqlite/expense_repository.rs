//! SQLite expense repository implementation.

use super::parse_uuid;
use crate::{traits::ExpenseRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shaku::Component;
use sqlx::{FromRow, SqliteConnection};
use std::sync::Arc;
use tally_core::{
    check_spend_limit, money, CategoryId, Expense, ExpenseId, Page, PageRequest, Period, TallyError, TallyResult,
    UserId,
};
use tracing::{debug, warn};

const SELECT_EXPENSE: &str = r#"
    SELECT e.id, e.owner_id, e.category_id, e.amount, e.description, e.spent_on, e.created_at, e.updated_at
    FROM expenses e
"#;

const NEWEST_FIRST: &str = "ORDER BY e.spent_on DESC, e.created_at DESC, e.id DESC";

/// SQLite expense repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ExpenseRepository)]
pub struct SqliteExpenseRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteExpenseRepository {
    /// Creates a new SQLite expense repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of an expense.
#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: String,
    owner_id: String,
    category_id: String,
    amount: String,
    description: String,
    spent_on: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = TallyError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(Expense {
            id: ExpenseId::from_uuid(parse_uuid(&row.id)?),
            owner_id: UserId::from_uuid(parse_uuid(&row.owner_id)?),
            category_id: CategoryId::from_uuid(parse_uuid(&row.category_id)?),
            amount: money::from_storage(&row.amount)?,
            description: row.description,
            date: row.spent_on,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Builds a `LIKE` pattern matching `query` anywhere, with wildcards escaped.
///
/// Only ASCII is lowercased, the same way SQLite's `LOWER()` folds the columns.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn into_expenses(rows: Vec<ExpenseRow>) -> TallyResult<Vec<Expense>> {
    rows.into_iter().map(Expense::try_from).collect()
}

/// Checks the limit of the expense's category inside an open transaction.
///
/// The category row is written first, so the transaction holds the database
/// write lock before it reads the running total, and concurrent writers to
/// the same database are serialized.
async fn check_limit_locked(conn: &mut SqliteConnection, expense: &Expense) -> TallyResult<()> {
    let limit = sqlx::query_scalar::<_, Option<String>>(
        "UPDATE categories SET updated_at = updated_at WHERE id = ? AND owner_id = ? RETURNING spend_limit",
    )
    .bind(expense.category_id.to_string())
    .bind(expense.owner_id.to_string())
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| TallyError::validation(format!("Category {} does not exist", expense.category_id)))?;
    let limit = limit.as_deref().map(money::from_storage).transpose()?;

    let amounts = sqlx::query_scalar::<_, String>(
        "SELECT amount FROM expenses WHERE owner_id = ? AND category_id = ? AND id <> ?",
    )
    .bind(expense.owner_id.to_string())
    .bind(expense.category_id.to_string())
    .bind(expense.id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    let spent = money::sum(
        amounts
            .iter()
            .map(|amount| money::from_storage(amount))
            .collect::<TallyResult<Vec<_>>>()?,
    );

    if let Err(err) = check_spend_limit(limit, spent, expense.amount) {
        warn!(
            "Limit reached for category {}: spent {}, adding {}, limit {:?}",
            expense.category_id, spent, expense.amount, limit
        );
        return Err(err);
    }
    Ok(())
}

#[async_trait]
impl ExpenseRepository for SqliteExpenseRepository {
    async fn find_by_id(&self, owner: UserId, id: ExpenseId) -> TallyResult<Option<Expense>> {
        debug!("Finding expense by id: {}", id);

        let sql = format!("{SELECT_EXPENSE} WHERE e.id = ? AND e.owner_id = ?");
        let row = sqlx::query_as::<_, ExpenseRow>(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(Expense::try_from).transpose()
    }

    async fn search(&self, owner: UserId, query: Option<&str>, page: PageRequest) -> TallyResult<Page<Expense>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        debug!("Searching expenses for owner {} (query: {:?}, page: {})", owner, query, page.page);

        let (filter, pattern) = match query {
            Some(q) => (
                r"AND (LOWER(e.description) LIKE ? ESCAPE '\' OR LOWER(c.name) LIKE ? ESCAPE '\')",
                Some(like_pattern(q)),
            ),
            None => ("", None),
        };

        let from = format!(
            "FROM expenses e JOIN categories c ON c.id = e.category_id WHERE e.owner_id = ? {filter}"
        );

        let count_sql = format!("SELECT COUNT(*) {from}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner.to_string());
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern.clone()).bind(pattern.clone());
        }
        let total = count_query.fetch_one(self.pool.inner()).await?;

        let select_sql = format!(
            "SELECT e.id, e.owner_id, e.category_id, e.amount, e.description, e.spent_on, \
             e.created_at, e.updated_at {from} {NEWEST_FIRST} LIMIT ? OFFSET ?"
        );
        let mut select_query = sqlx::query_as::<_, ExpenseRow>(&select_sql).bind(owner.to_string());
        if let Some(pattern) = &pattern {
            select_query = select_query.bind(pattern.clone()).bind(pattern.clone());
        }
        let rows = select_query
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(self.pool.inner())
            .await?;

        let total = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(into_expenses(rows)?, page, total))
    }

    async fn find_by_category(&self, owner: UserId, category_id: CategoryId) -> TallyResult<Vec<Expense>> {
        debug!("Listing expenses of category: {}", category_id);

        let sql = format!("{SELECT_EXPENSE} WHERE e.owner_id = ? AND e.category_id = ? {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, ExpenseRow>(&sql)
            .bind(owner.to_string())
            .bind(category_id.to_string())
            .fetch_all(self.pool.inner())
            .await?;

        into_expenses(rows)
    }

    async fn find_by_owner(&self, owner: UserId, period: Option<Period>) -> TallyResult<Vec<Expense>> {
        debug!("Listing expenses of owner {} in period {:?}", owner, period);

        let rows = match period {
            Some(period) => {
                let sql = format!("{SELECT_EXPENSE} WHERE e.owner_id = ? AND e.spent_on BETWEEN ? AND ? {NEWEST_FIRST}");
                sqlx::query_as::<_, ExpenseRow>(&sql)
                    .bind(owner.to_string())
                    .bind(period.start)
                    .bind(period.end)
                    .fetch_all(self.pool.inner())
                    .await?
            }
            None => {
                let sql = format!("{SELECT_EXPENSE} WHERE e.owner_id = ? {NEWEST_FIRST}");
                sqlx::query_as::<_, ExpenseRow>(&sql)
                    .bind(owner.to_string())
                    .fetch_all(self.pool.inner())
                    .await?
            }
        };

        into_expenses(rows)
    }

    async fn save(&self, expense: &Expense) -> TallyResult<Expense> {
        debug!("Saving expense of {} in category {}", expense.amount, expense.category_id);

        let mut tx = self.pool.inner().begin().await?;
        check_limit_locked(&mut *tx, expense).await?;

        sqlx::query(
            r#"
            INSERT INTO expenses (id, owner_id, category_id, amount, description, spent_on, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.id.to_string())
        .bind(expense.owner_id.to_string())
        .bind(expense.category_id.to_string())
        .bind(money::to_storage(expense.amount))
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.find_by_id(expense.owner_id, expense.id)
            .await?
            .ok_or_else(|| TallyError::internal("Failed to retrieve saved expense"))
    }

    async fn update(&self, expense: &Expense) -> TallyResult<Expense> {
        debug!("Updating expense: {}", expense.id);

        let mut tx = self.pool.inner().begin().await?;
        check_limit_locked(&mut *tx, expense).await?;

        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET category_id = ?, amount = ?, description = ?, spent_on = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(expense.category_id.to_string())
        .bind(money::to_storage(expense.amount))
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.updated_at)
        .bind(expense.id.to_string())
        .bind(expense.owner_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TallyError::not_found("Expense", expense.id));
        }
        tx.commit().await?;

        self.find_by_id(expense.owner_id, expense.id)
            .await?
            .ok_or_else(|| TallyError::internal("Failed to retrieve updated expense"))
    }

    async fn delete(&self, owner: UserId, id: ExpenseId) -> TallyResult<bool> {
        debug!("Deleting expense: {}", id);

        let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
