//! Expense DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::validation::rules::not_blank;
use tally_core::{ExpenseId, PageInfo};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request to create or replace an expense.
///
/// The category is referenced by name and created on the fly when the owner
/// has no category of that name yet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExpenseRequest {
    #[validate(
        length(min = 1, max = 30, message = "Category must be between 1 and 30 characters"),
        custom(function = "not_blank", message = "Category must not be blank")
    )]
    pub category: String,

    #[schema(value_type = String, example = "12.50")]
    pub amount: Decimal,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: String,

    /// Day of the expense; today (UTC) when omitted.
    pub date: Option<NaiveDate>,
}

/// Query parameters of the expense list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpenseQuery {
    /// Case-insensitive match on the description or the category name.
    pub query: Option<String>,
}

/// Expense as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: ExpenseId,
    /// Category name.
    pub category: String,
    pub category_slug: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paginated expense list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseResponse>,
    #[serde(flatten)]
    pub page: PageInfo,
}
