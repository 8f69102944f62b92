//! Monthly base price lookup for subscription plans.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fallback monthly price when a flat-rate or tiered plan has no cap amount.
pub const DEFAULT_PLAN_PRICE: Decimal = dec!(2000);

/// How a subscription plan charges the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// Fixed monthly price up to the cap amount.
    FlatRate,
    /// Tiered pricing; the cap amount is the top tier.
    Tiered,
    /// Billed from metered usage; the base price is zero.
    UsageBased,
}

/// Resolves the monthly base price for a plan.
///
/// Flat-rate and tiered plans charge their cap amount (defaulting to
/// [`DEFAULT_PLAN_PRICE`] when unset). Usage-based plans have no base price;
/// their charges come from metering which is computed elsewhere.
#[must_use]
pub fn plan_base_price(model: PricingModel, cap_amount: Option<Decimal>) -> Decimal {
    match model {
        PricingModel::FlatRate | PricingModel::Tiered => {
            cap_amount.unwrap_or(DEFAULT_PLAN_PRICE)
        }
        PricingModel::UsageBased => Decimal::ZERO,
    }
}
