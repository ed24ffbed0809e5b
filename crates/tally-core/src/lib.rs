//! # Tally Core
//!
//! Core types, domain entities, and error definitions for Tally.
//! This crate has no I/O of its own; every other layer of the workspace
//! builds on the abstractions defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod money;
pub mod pagination;
pub mod result;
pub mod slug;
pub mod stats;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use money::*;
pub use pagination::*;
pub use result::*;
pub use slug::slugify;
pub use stats::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
