//! OpenAPI documentation configuration.

use tally_core::{CategoryId, DateRange, ErrorResponse, ExpenseId, FieldError, PageInfo, UserId};
use tally_service::{
    AuthResponse, CategoryDetailResponse, CategoryExpenseItem, CategoryListResponse, CategoryResponse,
    CategoryStatsResponse, CreateCategoryRequest, ExpenseListResponse, ExpenseRequest, ExpenseResponse,
    LoginRequest, RefreshTokenRequest, RegisterRequest, SetLimitRequest, TotalExpensesResponse,
    UpdateCategoryRequest, UserResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::controllers::health_controller::HealthResponse;

/// OpenAPI documentation for the Tally API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tally Expense API",
        version = "1.0.0",
        description = "Personal expense tracking with categories, spend limits and statistics",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::refresh_token,
        crate::controllers::auth_controller::get_current_user,
        crate::controllers::expense_controller::list_expenses,
        crate::controllers::expense_controller::create_expense,
        crate::controllers::expense_controller::get_expense,
        crate::controllers::expense_controller::update_expense,
        crate::controllers::expense_controller::delete_expense,
        crate::controllers::category_controller::list_categories,
        crate::controllers::category_controller::create_category,
        crate::controllers::category_controller::get_category,
        crate::controllers::category_controller::update_category,
        crate::controllers::category_controller::set_limit,
        crate::controllers::category_controller::delete_category,
        crate::controllers::stats_controller::category_totals,
        crate::controllers::stats_controller::total_expenses,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            CategoryId,
            ExpenseId,
            PageInfo,
            DateRange,
            ErrorResponse,
            FieldError,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            UserResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            SetLimitRequest,
            CategoryResponse,
            CategoryExpenseItem,
            CategoryDetailResponse,
            CategoryListResponse,
            ExpenseRequest,
            ExpenseResponse,
            ExpenseListResponse,
            CategoryStatsResponse,
            TotalExpensesResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token refresh"),
        (name = "Expenses", description = "Expense records"),
        (name = "Categories", description = "Expense categories and spend limits"),
        (name = "Stats", description = "Expense statistics"),
        (name = "Health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
