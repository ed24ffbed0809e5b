//! Domain entities.

mod category;
mod expense;
mod user;

pub use category::{check_spend_limit, Category, LIMIT_REACHED_MESSAGE};
pub use expense::Expense;
pub use user::User;
