//! Category controller.

use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tally_service::{
    CategoryDetailResponse, CategoryListResponse, CategoryResponse, CreateCategoryRequest, SetLimitRequest,
    UpdateCategoryRequest,
};
use tracing::debug;

/// Creates the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:slug", get(get_category).put(update_category).delete(delete_category))
        .route("/:slug/set-limit", patch(set_limit))
}

/// List the caller's categories.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories", body = CategoryListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_categories(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<CategoryListResponse> {
    let response = state.category_service.list(user.user_id).await?;
    ok(response)
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name or limit"),
        (status = 409, description = "Category name already used")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), AppError> {
    debug!("Creating category: {}", request.name);

    let response = state.category_service.create(user.user_id, request).await?;
    Ok(created(response))
}

/// Get a category with its expenses and limit summary.
#[utoipa::path(
    get,
    path = "/categories/{slug}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category detail", body = CategoryDetailResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> ApiResult<CategoryDetailResponse> {
    let response = state.category_service.get_detail(user.user_id, &slug).await?;
    ok(response)
}

/// Rename a category and replace its limit.
#[utoipa::path(
    put,
    path = "/categories/{slug}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Category slug")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already used")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    debug!("Updating category: {}", slug);

    let response = state.category_service.update(user.user_id, &slug, request).await?;
    ok(response)
}

/// Set or clear the spend limit of a category.
#[utoipa::path(
    patch,
    path = "/categories/{slug}/set-limit",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Category slug")),
    request_body = SetLimitRequest,
    responses(
        (status = 200, description = "Limit updated", body = CategoryResponse),
        (status = 400, description = "Negative limit"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn set_limit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<SetLimitRequest>,
) -> ApiResult<CategoryResponse> {
    debug!("Setting limit of {} to {:?}", slug, request.limit);

    let response = state.category_service.set_limit(user.user_id, &slug, request).await?;
    ok(response)
}

/// Delete a category and every expense in it.
#[utoipa::path(
    delete,
    path = "/categories/{slug}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Deleting category: {}", slug);

    state.category_service.delete(user.user_id, &slug).await?;
    Ok(no_content())
}
