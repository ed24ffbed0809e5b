//! Category DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::validation::rules::not_blank;
use tally_core::{CategoryId, ExpenseId};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(
        length(min = 1, max = 30, message = "Name must be between 1 and 30 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    /// Spend limit; absent or zero means unlimited.
    #[schema(value_type = Option<String>, example = "250.00")]
    pub limit: Option<Decimal>,
}

/// Request to rename a category and replace its limit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(
        length(min = 1, max = 30, message = "Name must be between 1 and 30 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[schema(value_type = Option<String>, example = "250.00")]
    pub limit: Option<Decimal>,
}

/// Request to set or clear a category's spend limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetLimitRequest {
    #[schema(value_type = Option<String>, example = "100.00")]
    pub limit: Option<Decimal>,
}

/// Category as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[schema(value_type = Option<String>)]
    pub limit: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal expense view inside a category detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryExpenseItem {
    pub id: ExpenseId,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

/// Category with its aggregated spending.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailResponse {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[schema(value_type = Option<String>)]
    pub limit: Option<Decimal>,
    /// Number of expenses in the category.
    pub count: usize,
    #[schema(value_type = String)]
    pub total: Decimal,
    /// `limit - total` when a nonzero limit is set, otherwise zero.
    #[schema(value_type = String)]
    pub difference_from_limit: Decimal,
    pub expenses: Vec<CategoryExpenseItem>,
}

/// Category list wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_category_request_name_length() {
        let ok = CreateCategoryRequest {
            name: "Food".to_string(),
            limit: None,
        };
        assert!(ok.validate().is_ok());

        let too_long = CreateCategoryRequest {
            name: "x".repeat(31),
            limit: None,
        };
        assert!(too_long.validate().is_err());

        let blank = CreateCategoryRequest {
            name: "   ".to_string(),
            limit: None,
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_limit_accepts_number_or_string() {
        let from_number: SetLimitRequest = serde_json::from_str(r#"{"limit": 12.5}"#).unwrap();
        let from_string: SetLimitRequest = serde_json::from_str(r#"{"limit": "12.50"}"#).unwrap();
        assert_eq!(from_number.limit, from_string.limit);

        let cleared: SetLimitRequest = serde_json::from_str("{}").unwrap();
        assert!(cleared.limit.is_none());
    }
}
