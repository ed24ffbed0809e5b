//! Main application router.

use crate::{
    controllers::{auth_controller, category_controller, expense_controller, health_controller, stats_controller},
    middleware::{auth_middleware, logging_middleware},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, Router};
use shaku::HasComponent;
use tally_config::ServerConfig;
use tally_repository::DatabasePoolInterface;
use tally_service::{AuthService, CategoryService, ExpenseService, StatsService};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router from a Shaku module.
pub fn create_router_from_module<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: HasComponent<dyn AuthService>
        + HasComponent<dyn CategoryService>
        + HasComponent<dyn ExpenseService>
        + HasComponent<dyn StatsService>
        + HasComponent<dyn DatabasePoolInterface>,
{
    create_router(AppState::from_module(module), server_config)
}

/// Creates the main application router.
///
/// Everything lives under `/api/v1`. The auth middleware only attaches
/// claims; handlers that need a user reject unauthenticated requests.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new()
        .nest("/auth", auth_controller::router())
        .nest("/expenses", expense_controller::router())
        .nest("/categories", category_controller::router())
        .nest("/expense-stats", stats_controller::router())
        .nest("/health", health_controller::router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    let router = Router::new()
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Tally Expense API v1"
}
