//! Service implementations.
//!
//! This module contains the concrete implementations of service traits.
//! Trait definitions live in the parent module (e.g. `expense_service.rs`).

pub mod auth_service_impl;
pub mod category_service_impl;
pub mod expense_service_impl;
pub mod stats_service_impl;

pub use auth_service_impl::AuthServiceComponent;
pub use category_service_impl::CategoryServiceComponent;
pub use expense_service_impl::ExpenseServiceComponent;
pub use stats_service_impl::StatsServiceComponent;

use tally_core::{slug, slugify, CategoryId, TallyResult, UserId};
use tally_repository::CategoryRepository;

/// Picks the first free slug for `name`: the bare slug, then `-2`, `-3`, ...
pub(crate) async fn allocate_slug(
    categories: &dyn CategoryRepository,
    owner: UserId,
    name: &str,
    except: Option<CategoryId>,
) -> TallyResult<String> {
    let base = slugify(name);
    let mut n = 1;
    loop {
        let candidate = slug::candidate(&base, n);
        if !categories.slug_taken(owner, &candidate, except).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}
