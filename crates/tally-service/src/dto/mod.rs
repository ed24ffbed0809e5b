//! Data Transfer Objects (DTOs) for the service layer.

mod auth_dto;
mod category_dto;
mod expense_dto;
mod stats_dto;

pub use auth_dto::*;
pub use category_dto::*;
pub use expense_dto::*;
pub use stats_dto::*;
