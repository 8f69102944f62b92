//! Date-range filters for dashboard queries.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Reporting window selected on a dashboard.
///
/// Serialized forms match the query-string values the portals send
/// (`last-7`, `last-30`, `mtd`, `qtd`, `ytd`, `itd`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    /// Last 7 days.
    #[serde(rename = "last-7")]
    Last7,
    /// Last 30 days.
    #[serde(rename = "last-30")]
    Last30,
    /// Month to date.
    #[serde(rename = "mtd")]
    MonthToDate,
    /// Quarter to date.
    #[serde(rename = "qtd")]
    QuarterToDate,
    /// Year to date.
    #[serde(rename = "ytd")]
    YearToDate,
    /// Inception to date (no lower bound).
    #[default]
    #[serde(rename = "itd")]
    InceptionToDate,
}

impl TimeRange {
    /// Returns the inclusive lower bound for this range, or `None` for
    /// inception-to-date.
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Last7 => Some(now - Duration::days(7)),
            Self::Last30 => Some(now - Duration::days(30)),
            Self::MonthToDate => start_of_day(now.year(), now.month()),
            Self::QuarterToDate => {
                let quarter_start_month = (now.month() - 1) / 3 * 3 + 1;
                start_of_day(now.year(), quarter_start_month)
            }
            Self::YearToDate => start_of_day(now.year(), 1),
            Self::InceptionToDate => None,
        }
    }
}

fn start_of_day(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}
