//! Tests for dashboard metric calculations.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use super::placeholder::{placeholder_monthly_revenue, placeholder_node_count};
use super::{TimeRange, success_rate};

#[test]
fn test_success_rate_zero_total_is_zero() {
    assert_eq!(success_rate(0, 0), 0);
}

#[test]
fn test_success_rate_rounds() {
    assert_eq!(success_rate(9, 10), 90);
    assert_eq!(success_rate(1, 3), 33);
    assert_eq!(success_rate(2, 3), 67);
    assert_eq!(success_rate(10, 10), 100);
}

proptest! {
    /// The rate is always a valid percentage.
    #[test]
    fn test_success_rate_bounded(successful in 0u64..10_000, extra in 0u64..10_000) {
        let total = successful + extra;
        let rate = success_rate(successful, total);
        prop_assert!(rate <= 100);
    }
}

#[test]
fn test_time_range_itd_has_no_lower_bound() {
    assert_eq!(TimeRange::InceptionToDate.start(Utc::now()), None);
}

#[test]
fn test_time_range_month_to_date() {
    let now = Utc.with_ymd_and_hms(2026, 8, 26, 14, 30, 0).unwrap();
    let start = TimeRange::MonthToDate.start(now).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_time_range_quarter_to_date() {
    let now = Utc.with_ymd_and_hms(2026, 8, 26, 14, 30, 0).unwrap();
    let start = TimeRange::QuarterToDate.start(now).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap());

    let jan = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
    let start = TimeRange::QuarterToDate.start(jan).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_time_range_last_7() {
    let now = Utc.with_ymd_and_hms(2026, 8, 26, 0, 0, 0).unwrap();
    let start = TimeRange::Last7.start(now).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 19, 0, 0, 0).unwrap());
}

#[test]
fn test_time_range_serde_names() {
    assert_eq!(
        serde_json::from_str::<TimeRange>("\"last-30\"").unwrap(),
        TimeRange::Last30
    );
    assert_eq!(
        serde_json::from_str::<TimeRange>("\"itd\"").unwrap(),
        TimeRange::InceptionToDate
    );
}

#[test]
fn test_placeholder_revenue_is_125_per_execution() {
    assert_eq!(placeholder_monthly_revenue(0), dec!(0));
    assert_eq!(placeholder_monthly_revenue(8), dec!(1000));
}

#[test]
fn test_placeholder_node_count_in_range() {
    for _ in 0..50 {
        let n = placeholder_node_count();
        assert!((5..=40).contains(&n));
    }
}
