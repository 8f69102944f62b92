//! Placeholder dashboard figures.
//!
//! These values are NOT derived from real billing or metering data. The
//! portals render them while the real data sources are still being wired up,
//! and they must stay clearly stub-named so nobody mistakes them for
//! load-bearing business metrics.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Placeholder SE support hours shown on the billing overview.
pub const PLACEHOLDER_SE_HOURS: u32 = 12;

/// Placeholder storage usage (GB) shown on the billing overview.
pub const PLACEHOLDER_STORAGE_GB: u32 = 25;

/// Placeholder monthly revenue: a flat 125 per execution.
#[must_use]
pub fn placeholder_monthly_revenue(executions: u64) -> Decimal {
    Decimal::from(executions) * dec!(125)
}

/// Placeholder production-node count for a company card.
#[must_use]
pub fn placeholder_node_count() -> u32 {
    rand::rng().random_range(5..=40)
}

/// Placeholder contract renewal date: one year after the company was created.
#[must_use]
pub fn placeholder_renewal_date(company_created_at: DateTime<Utc>) -> DateTime<Utc> {
    company_created_at + Duration::days(365)
}
