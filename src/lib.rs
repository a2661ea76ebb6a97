//! Ngopi cafe directory
//!
//! Admin REST API over cafes, coffee terms, facilities, recommendations and
//! reviews, plus the generic data table that drives the admin screens.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod table;

// Re-export commonly used types
pub use core::{AppError, ResourcePage, ResourceQuery, Result};
pub use modules::Repositories;
