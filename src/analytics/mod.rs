pub mod aggregate;
pub mod comparison;
pub mod daily;

use chrono::NaiveDate;

/// One agent's execution metrics for one calendar day, as delivered by the
/// backend after envelope normalization. `success_rate` is a percentage in
/// [0, 100]; duration is seconds; cost is a monetary amount.
///
/// Records never carry session or request context -- the reducers below are
/// pure functions over values.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub date: NaiveDate,
    pub total_runs: u64,
    pub success_rate: f64,
    pub avg_duration_secs: f64,
    pub total_cost: f64,
}

/// Grouped-and-reduced metrics for one calendar day, possibly merging
/// several raw records sharing that date.
///
/// `success_rate` and `avg_duration_secs` keep full precision here; display
/// rounding happens in the aggregate rollup. A single-record group reduces
/// to the record unchanged apart from the derived counts.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_runs: u64,
    pub success_rate: f64,
    pub avg_duration_secs: f64,
    pub total_cost: f64,
    pub success_count: u64,
    pub failure_count: u64,
}

/// Scalar rollup of a daily summary sequence over its full date range.
/// Means are rounded to 1 decimal, cost to 2. All-zero for an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct AggregateStats {
    pub total_runs: u64,
    pub avg_success_rate: f64,
    pub avg_duration_secs: f64,
    pub total_cost: f64,
}

/// Round to `decimals` decimal places, half away from zero.
#[inline]
pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(85.04, 1), 85.0);
        assert_eq!(round_dp(85.26, 1), 85.3);
        assert_eq!(round_dp(6.004, 2), 6.0);
        assert_eq!(round_dp(-1.25, 1), -1.3);
    }
}
