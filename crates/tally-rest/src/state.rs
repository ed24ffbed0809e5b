//! Application state for Axum handlers.

use shaku::HasComponent;
use std::sync::Arc;
use tally_repository::DatabasePoolInterface;
use tally_service::{AuthService, CategoryService, ExpenseService, StatsService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub category_service: Arc<dyn CategoryService>,
    pub expense_service: Arc<dyn ExpenseService>,
    pub stats_service: Arc<dyn StatsService>,
    /// Used by the readiness probe.
    pub db_pool: Arc<dyn DatabasePoolInterface>,
}

impl AppState {
    /// Resolves every service from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: HasComponent<dyn AuthService>
            + HasComponent<dyn CategoryService>
            + HasComponent<dyn ExpenseService>
            + HasComponent<dyn StatsService>
            + HasComponent<dyn DatabasePoolInterface>,
    {
        Self {
            auth_service: module.resolve(),
            category_service: module.resolve(),
            expense_service: module.resolve(),
            stats_service: module.resolve(),
            db_pool: module.resolve(),
        }
    }
}
