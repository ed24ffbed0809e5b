//! Expense statistics controller.

use crate::{
    extractors::AuthenticatedUser,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use tally_service::{CategoryStatsResponse, StatsQuery, TotalExpensesResponse};

/// Creates the stats router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(category_totals))
        .route("/total", get(total_expenses))
}

/// Totals per category over an optional relative range.
#[utoipa::path(
    get,
    path = "/expense-stats",
    tag = "Stats",
    security(("bearer_auth" = [])),
    params(StatsQuery),
    responses(
        (status = 200, description = "Totals per category", body = CategoryStatsResponse),
        (status = 400, description = "Unknown range")
    )
)]
pub async fn category_totals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> ApiResult<CategoryStatsResponse> {
    let response = state.stats_service.category_totals(user.user_id, query.range).await?;
    ok(response)
}

/// Sum and count of every expense of the caller.
#[utoipa::path(
    get,
    path = "/expense-stats/total",
    tag = "Stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Grand total", body = TotalExpensesResponse)
    )
)]
pub async fn total_expenses(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<TotalExpensesResponse> {
    let response = state.stats_service.total_expenses(user.user_id).await?;
    ok(response)
}
