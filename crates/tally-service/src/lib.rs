//! # Tally Service
//!
//! Business logic service layer for Tally.
//! Services own validation, ownership scoping, slug allocation and the
//! spend-limit rule; persistence goes through the repository traits.

pub mod auth_service;
pub mod category_service;
pub mod dto;
pub mod r#impl;
pub mod mappers;
pub mod expense_service;
pub mod stats_service;

#[cfg(test)]
mod testing;

pub use auth_service::*;
pub use category_service::*;
pub use dto::*;
pub use expense_service::*;
pub use r#impl::*;
pub use stats_service::*;
