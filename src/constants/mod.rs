//! Application constants module.
//!
//! Centralizes collection names, error messages and machine-readable error codes.

pub mod collections;
pub mod error_codes;
pub mod errors;

pub use collections::*;
pub use error_codes::*;
pub use errors::*;
