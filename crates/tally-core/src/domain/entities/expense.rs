//! Expense entity: a single dated transaction under a category.

use crate::{CategoryId, ExpenseId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const SUMMARY_CHARS: usize = 50;

/// An amount of money spent in a category on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Always the owner of `category_id`.
    pub owner_id: UserId,
    pub category_id: CategoryId,
    /// Strictly positive.
    pub amount: Decimal,
    pub description: String,
    /// The day the money was spent; drives date-range statistics.
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Creates a new expense.
    #[must_use]
    pub fn new(
        owner_id: UserId,
        category_id: CategoryId,
        amount: Decimal,
        description: String,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            owner_id,
            category_id,
            amount,
            description,
            date,
            created_at: now,
            updated_at: now,
        }
    }

    /// First 50 characters of the description.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self.description.char_indices().nth(SUMMARY_CHARS) {
            Some((idx, _)) => &self.description[..idx],
            None => &self.description,
        }
    }

    /// Replaces the mutable fields in place.
    pub fn update(&mut self, category_id: CategoryId, amount: Decimal, description: String, date: NaiveDate) {
        self.category_id = category_id;
        self.amount = amount;
        self.description = description;
        self.date = date;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expense(description: &str) -> Expense {
        Expense::new(
            UserId::new(),
            CategoryId::new(),
            dec!(9.99),
            description.to_string(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
    }

    #[test]
    fn test_summary_truncates_to_fifty_chars() {
        let long = "x".repeat(80);
        assert_eq!(expense(&long).summary().chars().count(), 50);
        assert_eq!(expense("short").summary(), "short");
    }

    #[test]
    fn test_summary_respects_char_boundaries() {
        let text = "é".repeat(60);
        assert_eq!(expense(&text).summary(), "é".repeat(50));
    }

    #[test]
    fn test_update_moves_category() {
        let mut e = expense("lunch");
        let other = CategoryId::new();
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        e.update(other, dec!(12.00), "dinner".to_string(), day);
        assert_eq!(e.category_id, other);
        assert_eq!(e.amount, dec!(12.00));
        assert_eq!(e.date, day);
    }
}
