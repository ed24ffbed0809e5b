//! Category entity: a named spending bucket with an optional limit.

use crate::{CategoryId, TallyError, TallyResult, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Message returned when an expense would push a category past its limit.
pub const LIMIT_REACHED_MESSAGE: &str = "Limit has been reached";

/// Checks `already_spent + amount` against a stored limit.
///
/// `None` and zero both mean unlimited. Reaching the limit exactly is allowed.
pub fn check_spend_limit(limit: Option<Decimal>, already_spent: Decimal, amount: Decimal) -> TallyResult<()> {
    match limit.filter(|limit| *limit > Decimal::ZERO) {
        Some(limit) if already_spent + amount > limit => Err(TallyError::business_rule(LIMIT_REACHED_MESSAGE)),
        _ => Ok(()),
    }
}

/// A spending category owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub owner_id: UserId,
    /// Display name, unique per owner.
    pub name: String,
    /// URL identifier derived from the name, unique per owner.
    pub slug: String,
    /// Spend limit; `None` or zero means unlimited.
    pub limit: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category.
    #[must_use]
    pub fn new(owner_id: UserId, name: String, slug: String, limit: Option<Decimal>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            owner_id,
            name,
            slug,
            limit,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the limit only when one is actually enforced (nonzero).
    #[must_use]
    pub fn effective_limit(&self) -> Option<Decimal> {
        self.limit.filter(|limit| *limit > Decimal::ZERO)
    }

    /// `limit - spent` when a limit is enforced, zero otherwise.
    #[must_use]
    pub fn difference_from_limit(&self, spent: Decimal) -> Decimal {
        self.effective_limit()
            .map_or(Decimal::ZERO, |limit| limit - spent)
    }

    /// Checks that adding `amount` to `already_spent` stays within the limit.
    pub fn ensure_within_limit(&self, already_spent: Decimal, amount: Decimal) -> TallyResult<()> {
        check_spend_limit(self.limit, already_spent, amount)
    }

    /// Renames the category; the caller supplies the regenerated slug.
    pub fn rename(&mut self, name: String, slug: String) {
        self.name = name;
        self.slug = slug;
        self.updated_at = Utc::now();
    }

    /// Sets or clears the spend limit.
    pub fn set_limit(&mut self, limit: Option<Decimal>) {
        self.limit = limit;
        self.updated_at = Utc::now();
    }
}
