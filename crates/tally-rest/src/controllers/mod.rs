//! REST API controllers.

pub mod auth_controller;
pub mod category_controller;
pub mod expense_controller;
pub mod health_controller;
pub mod stats_controller;
