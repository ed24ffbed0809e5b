//! # Tally Security
//!
//! JWT access/refresh tokens and Argon2id password hashing.

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;
