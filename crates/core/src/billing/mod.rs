//! Subscription plan price resolution.

mod price;

pub use price::{DEFAULT_PLAN_PRICE, PricingModel, plan_base_price};

#[cfg(test)]
mod tests;
