//! Shared types, errors, and configuration for Flowmetric.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy
//! - Pagination types for list endpoints
//! - JWT claims and token validation
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{Claims, JwtConfig, JwtError, JwtService};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
