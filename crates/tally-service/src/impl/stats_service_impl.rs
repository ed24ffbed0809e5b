//! Statistics service implementation.

use crate::dto::{CategoryStatsResponse, TotalExpensesResponse};
use crate::stats_service::StatsService;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use shaku::Component;
use std::sync::Arc;
use tally_core::{category_totals, money, total_of, DateRange, TallyResult, UserId};
use tally_repository::{CategoryRepository, ExpenseRepository};
use tracing::debug;

/// Statistics service component.
#[derive(Component)]
#[shaku(interface = StatsService)]
pub struct StatsServiceComponent {
    #[shaku(inject)]
    expense_repository: Arc<dyn ExpenseRepository>,
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
}

impl StatsServiceComponent {
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

    /// Per-category totals for a range resolved against `today`.
    pub async fn category_totals_on(
        &self,
        owner: UserId,
        range: Option<&str>,
        today: NaiveDate,
    ) -> TallyResult<CategoryStatsResponse> {
        let range = DateRange::parse_optional(range)?;
        let period = range.map(|r| r.period(today));
        debug!("Computing category totals of {} for {:?}", owner, period);

        let categories = self.category_repository.find_all(owner).await?;
        let expenses = self.expense_repository.find_by_owner(owner, period).await?;

        let category_data = category_totals(&categories, &expenses, period);
        let total = money::sum(category_data.values().copied());

        Ok(CategoryStatsResponse {
            range,
            start: period.map(|p| p.start),
            end: period.map(|p| p.end),
            category_data,
            total,
        })
    }
}

#[async_trait]
impl StatsService for StatsServiceComponent {
    async fn category_totals(&self, owner: UserId, range: Option<String>) -> TallyResult<CategoryStatsResponse> {
        self.category_totals_on(owner, range.as_deref(), Utc::now().date_naive())
            .await
    }

    async fn total_expenses(&self, owner: UserId) -> TallyResult<TotalExpensesResponse> {
        let expenses = self.expense_repository.find_by_owner(owner, None).await?;
        Ok(TotalExpensesResponse {
            total: total_of(&expenses),
            count: expenses.len(),
        })
    }
}

impl std::fmt::Debug for StatsServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsServiceComponent").finish_non_exhaustive()
    }
}
