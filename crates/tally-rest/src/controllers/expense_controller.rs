//! Expense controller.

use crate::{
    extractors::{AuthenticatedUser, PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tally_core::{ExpenseId, TallyError};
use tally_service::{ExpenseListResponse, ExpenseQuery, ExpenseRequest, ExpenseResponse};
use tracing::debug;

/// Creates the expense router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", get(get_expense).put(update_expense).delete(delete_expense))
}

/// A malformed id cannot name an existing expense.
fn parse_expense_id(id: &str) -> Result<ExpenseId, AppError> {
    ExpenseId::parse(id).map_err(|_| AppError(TallyError::not_found("Expense", id)))
}

/// List the caller's expenses, newest first.
#[utoipa::path(
    get,
    path = "/expenses",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(ExpenseQuery, PaginationQuery),
    responses(
        (status = 200, description = "Page of expenses", body = ExpenseListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ExpenseQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<ExpenseListResponse> {
    debug!("Listing expenses for {} (query: {:?})", user.user_id, query.query);

    let response = state
        .expense_service
        .list(user.user_id, query.query, pagination.into())
        .await?;
    ok(response)
}

/// Record a new expense.
#[utoipa::path(
    post,
    path = "/expenses",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    request_body = ExpenseRequest,
    responses(
        (status = 201, description = "Expense created", body = ExpenseResponse),
        (status = 400, description = "Invalid amount or spend limit reached"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_expense(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExpenseResponse>>), AppError> {
    debug!("Creating expense in category: {}", request.category);

    let response = state.expense_service.create(user.user_id, request).await?;
    Ok(created(response))
}

/// Get one expense.
#[utoipa::path(
    get,
    path = "/expenses/{id}",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Expense id")),
    responses(
        (status = 200, description = "Expense", body = ExpenseResponse),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn get_expense(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<ExpenseResponse> {
    let id = parse_expense_id(&id)?;
    let response = state.expense_service.get(user.user_id, id).await?;
    ok(response)
}

/// Replace an expense.
#[utoipa::path(
    put,
    path = "/expenses/{id}",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Expense id")),
    request_body = ExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ExpenseResponse),
        (status = 400, description = "Invalid amount or spend limit reached"),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ExpenseRequest>,
) -> ApiResult<ExpenseResponse> {
    let id = parse_expense_id(&id)?;
    debug!("Updating expense: {}", id);

    let response = state.expense_service.update(user.user_id, id, request).await?;
    ok(response)
}

/// Delete an expense.
#[utoipa::path(
    delete,
    path = "/expenses/{id}",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Expense id")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_expense_id(&id)?;
    debug!("Deleting expense: {}", id);

    state.expense_service.delete(user.user_id, id).await?;
    Ok(no_content())
}
