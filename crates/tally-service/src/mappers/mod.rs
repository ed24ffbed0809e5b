//! Entity-DTO mappers.

use crate::dto::{
    CategoryDetailResponse, CategoryExpenseItem, CategoryResponse, ExpenseResponse, UserResponse,
};
use tally_core::{total_of, Category, Expense, User};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.to_string(),
            created_at: user.created_at,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            limit: category.limit,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<&Expense> for CategoryExpenseItem {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            amount: expense.amount,
            description: expense.description.clone(),
            date: expense.date,
        }
    }
}

/// Builds the detail view of a category from its expenses.
#[must_use]
pub fn category_detail(category: Category, expenses: &[Expense]) -> CategoryDetailResponse {
    let total = total_of(expenses);
    CategoryDetailResponse {
        difference_from_limit: category.difference_from_limit(total),
        id: category.id,
        name: category.name,
        slug: category.slug,
        limit: category.limit,
        count: expenses.len(),
        total,
        expenses: expenses.iter().map(CategoryExpenseItem::from).collect(),
    }
}

/// Builds the API view of an expense; `category` must be the expense's category.
#[must_use]
pub fn expense_response(expense: Expense, category: &Category) -> ExpenseResponse {
    ExpenseResponse {
        id: expense.id,
        category: category.name.clone(),
        category_slug: category.slug.clone(),
        amount: expense.amount,
        description: expense.description,
        date: expense.date,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_core::UserId;

    fn expense(category: &Category, amount: Decimal) -> Expense {
        Expense::new(
            category.owner_id,
            category.id,
            amount,
            "Lunch".to_string(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
    }

    #[test]
    fn test_category_detail_with_limit() {
        let category = Category::new(UserId::new(), "Food".to_string(), "food".to_string(), Some(dec!(100)));
        let expenses = vec![expense(&category, dec!(30)), expense(&category, dec!(45.50))];

        let detail = category_detail(category, &expenses);
        assert_eq!(detail.count, 2);
        assert_eq!(detail.total, dec!(75.50));
        assert_eq!(detail.difference_from_limit, dec!(24.50));
        assert_eq!(detail.expenses.len(), 2);
    }

    #[test]
    fn test_category_detail_without_limit_has_zero_difference() {
        let category = Category::new(UserId::new(), "Food".to_string(), "food".to_string(), None);
        let expenses = vec![expense(&category, dec!(30))];

        let detail = category_detail(category, &expenses);
        assert_eq!(detail.difference_from_limit, Decimal::ZERO);
    }

    #[test]
    fn test_expense_response_carries_category_name() {
        let category = Category::new(UserId::new(), "Eating Out".to_string(), "eating-out".to_string(), None);
        let response = expense_response(expense(&category, dec!(5)), &category);
        assert_eq!(response.category, "Eating Out");
        assert_eq!(response.category_slug, "eating-out");
    }
}
