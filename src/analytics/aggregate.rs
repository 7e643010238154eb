/// Aggregate stats reduction.
///
/// Folds a daily summary sequence into one scalar rollup for KPI tiles:
/// total runs and cost are sums, rate and duration are means of the per-day
/// values. Means round to 1 decimal, cost to 2. Pure function.
use super::{round_dp, AggregateStats, DailySummary};
use statrs::statistics::Statistics;

/// Roll up a summary window. Empty input returns all zeros, never NaN.
pub fn compute_aggregate_stats(summaries: &[DailySummary]) -> AggregateStats {
    if summaries.is_empty() {
        return AggregateStats::default();
    }

    let total_runs: u64 = summaries.iter().map(|s| s.total_runs).sum();
    let total_cost: f64 = summaries.iter().map(|s| s.total_cost).sum();
    let avg_success_rate = summaries.iter().map(|s| s.success_rate).mean();
    let avg_duration_secs = summaries.iter().map(|s| s.avg_duration_secs).mean();

    AggregateStats {
        total_runs,
        avg_success_rate: round_dp(avg_success_rate, 1),
        avg_duration_secs: round_dp(avg_duration_secs, 1),
        total_cost: round_dp(total_cost, 2),
    }
}
