//! Statistics service trait definition.

use crate::dto::{CategoryStatsResponse, TotalExpensesResponse};
use async_trait::async_trait;
use tally_core::{Interface, TallyResult, UserId};

/// Statistics service trait.
#[async_trait]
pub trait StatsService: Interface {
    /// Totals per category over a named range token, or over all time.
    async fn category_totals(&self, owner: UserId, range: Option<String>) -> TallyResult<CategoryStatsResponse>;

    /// Sum of every expense of the owner.
    async fn total_expenses(&self, owner: UserId) -> TallyResult<TotalExpensesResponse>;
}
