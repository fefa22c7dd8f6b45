//! Synapse Sprint backend core: configuration, MongoDB connection bootstrap and
//! the user repository.

pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod utils;
