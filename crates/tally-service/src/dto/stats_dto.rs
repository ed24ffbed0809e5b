//! Statistics DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_core::DateRange;
use utoipa::{IntoParams, ToSchema};

/// Query parameters of the statistics endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// One of `today`, `yesterday`, `this week`, `this month`; all time when omitted.
    pub range: Option<String>,
}

/// Per-category totals over a date window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryStatsResponse {
    /// The resolved range, absent for all-time statistics.
    pub range: Option<DateRange>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Total per category name; categories without expenses report zero.
    #[schema(value_type = Object)]
    pub category_data: BTreeMap<String, Decimal>,
    #[schema(value_type = String)]
    pub total: Decimal,
}

/// All-time spending of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TotalExpensesResponse {
    #[schema(value_type = String)]
    pub total: Decimal,
    pub count: usize,
}
