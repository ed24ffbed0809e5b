//! Dependency injection module using Shaku.
//!
//! `TallyModule` holds every component of the single-process deployment:
//! the SQLite pool, the repositories, the security components and the
//! business services.

use shaku::module;
use std::sync::Arc;
use tally_config::SecurityConfig;
use tally_repository::{
    DatabasePool, DatabasePoolParameters, SqliteCategoryRepository, SqliteExpenseRepository, SqliteUserRepository,
};
use tally_security::{PasswordHasher, PasswordHasherParameters, TokenProvider, TokenProviderParameters};
use tally_service::{AuthServiceComponent, CategoryServiceComponent, ExpenseServiceComponent, StatsServiceComponent};

module! {
    pub TallyModule {
        components = [
            DatabasePool,
            PasswordHasher,
            TokenProvider,
            SqliteUserRepository,
            SqliteCategoryRepository,
            SqliteExpenseRepository,
            AuthServiceComponent,
            CategoryServiceComponent,
            ExpenseServiceComponent,
            StatsServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the module around an already connected pool.
#[must_use]
pub fn build_module(db_pool: &DatabasePool, security_config: &SecurityConfig) -> Arc<TallyModule> {
    let password_hasher = PasswordHasher::with_cost(security_config.password_hash_cost);

    let module = TallyModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool: db_pool.pool() })
        .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
            argon2: password_hasher.argon2_arc(),
        })
        .with_component_parameters::<TokenProvider>(TokenProviderParameters {
            config: Arc::new(security_config.clone()),
        })
        .build();

    Arc::new(module)
}
