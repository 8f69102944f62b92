//! Tests for plan price resolution.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{DEFAULT_PLAN_PRICE, PricingModel, plan_base_price};

#[rstest]
#[case(PricingModel::FlatRate, Some(dec!(500)), dec!(500))]
#[case(PricingModel::FlatRate, None, dec!(2000))]
#[case(PricingModel::Tiered, Some(dec!(3500)), dec!(3500))]
#[case(PricingModel::Tiered, None, dec!(2000))]
#[case(PricingModel::UsageBased, Some(dec!(500)), Decimal::ZERO)]
#[case(PricingModel::UsageBased, None, Decimal::ZERO)]
fn test_plan_base_price(
    #[case] model: PricingModel,
    #[case] cap: Option<Decimal>,
    #[case] expected: Decimal,
) {
    assert_eq!(plan_base_price(model, cap), expected);
}

#[test]
fn test_default_price_is_2000() {
    assert_eq!(DEFAULT_PLAN_PRICE, dec!(2000));
}

proptest! {
    /// Usage-based plans never have a base price, regardless of cap.
    #[test]
    fn test_usage_based_always_zero(cap in 0i64..1_000_000) {
        let price = plan_base_price(PricingModel::UsageBased, Some(Decimal::from(cap)));
        prop_assert_eq!(price, Decimal::ZERO);
    }

    /// Capped plans always charge exactly their cap when one is set.
    #[test]
    fn test_capped_plans_charge_cap(cap in 1i64..1_000_000) {
        let cap = Decimal::from(cap);
        prop_assert_eq!(plan_base_price(PricingModel::FlatRate, Some(cap)), cap);
        prop_assert_eq!(plan_base_price(PricingModel::Tiered, Some(cap)), cap);
    }
}
