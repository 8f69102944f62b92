//! Dashboard metric calculations.

pub mod placeholder;
mod time_range;

pub use time_range::TimeRange;

#[cfg(test)]
mod tests;

/// Zero-safe execution success rate as a rounded whole percentage.
///
/// Returns 0 when there are no executions at all.
#[must_use]
pub fn success_rate(successful: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (successful * 100 + total / 2) / total;
    #[allow(clippy::cast_possible_truncation)]
    {
        rounded.min(100) as u8
    }
}
