//! # Tally Server Library
//!
//! Dependency injection wiring and startup helpers for the Tally server.

pub mod di;
pub mod startup;
