//! Core business logic for Flowmetric.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain rules, validation, and calculations live here.
//!
//! # Modules
//!
//! - `billing` - Subscription plan price resolution
//! - `metrics` - Success rates, time-range filters, placeholder figures
//! - `reconcile` - Collection reconciliation for aggregate updates
//! - `validation` - Company aggregate payload validation
//! - `credentials` - Secret masking

pub mod billing;
pub mod credentials;
pub mod metrics;
pub mod reconcile;
pub mod validation;
