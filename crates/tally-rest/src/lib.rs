//! # Tally REST
//!
//! REST API layer using Axum for Tally.
//! Provides HTTP endpoints for authentication, expenses, categories,
//! statistics and health checks, plus the OpenAPI document.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
