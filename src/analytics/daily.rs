/// Daily summary reduction.
///
/// Groups raw per-run records by calendar day and reduces each group to one
/// summary: run and cost totals are summed, success rate and duration are
/// straight (unweighted) means across the group, and success/failure counts
/// are derived from the reduced rate. Output is always sorted ascending by
/// date regardless of input order.
///
/// Pure function, no side effects, no allocations beyond the output.
use super::{DailySummary, PerformanceRecord};
use chrono::NaiveDate;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Reduce a flat record list into one summary per distinct date.
/// Empty input yields empty output.
pub fn compute_daily_summaries(records: &[PerformanceRecord]) -> Vec<DailySummary> {
    // BTreeMap keeps the date-ascending invariant for free.
    let mut by_date: BTreeMap<NaiveDate, Vec<&PerformanceRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_default().push(record);
    }

    by_date
        .into_iter()
        .map(|(date, group)| reduce_group(date, &group))
        .collect()
}

fn reduce_group(date: NaiveDate, group: &[&PerformanceRecord]) -> DailySummary {
    let total_runs: u64 = group.iter().map(|r| r.total_runs).sum();
    let total_cost: f64 = group.iter().map(|r| r.total_cost).sum();

    // Straight mean, not weighted by run count. Groups are never empty.
    let success_rate = group.iter().map(|r| r.success_rate).mean();
    let avg_duration_secs = group.iter().map(|r| r.avg_duration_secs).mean();

    // Clamp guards against rounding pushing the count past the total.
    let success_count =
        (((total_runs as f64) * success_rate / 100.0).round() as u64).min(total_runs);
    let failure_count = total_runs - success_count;

    DailySummary {
        date,
        total_runs,
        success_rate,
        avg_duration_secs,
        total_cost,
        success_count,
        failure_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, runs: u64, rate: f64, duration: f64, cost: f64) -> PerformanceRecord {
        PerformanceRecord {
            date: date.parse().unwrap(),
            total_runs: runs,
            success_rate: rate,
            avg_duration_secs: duration,
            total_cost: cost,
        }
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(compute_daily_summaries(&[]).is_empty());
    }

    #[test]
    fn test_single_record_passes_through_with_counts() {
        let summaries = compute_daily_summaries(&[record("2024-01-05", 10, 90.0, 5.5, 2.5)]);
        assert_eq!(summaries.len(), 1);
        let day = &summaries[0];
        assert_eq!(day.date, "2024-01-05".parse().unwrap());
        assert_eq!(day.total_runs, 10);
        assert_eq!(day.success_rate, 90.0);
        assert_eq!(day.avg_duration_secs, 5.5);
        assert_eq!(day.total_cost, 2.5);
        assert_eq!(day.success_count, 9);
        assert_eq!(day.failure_count, 1);
    }

    #[test]
    fn test_same_date_records_merge() {
        let summaries = compute_daily_summaries(&[
            record("2024-03-01", 5, 100.0, 4.0, 1.0),
            record("2024-03-01", 5, 60.0, 6.0, 2.0),
        ]);
        assert_eq!(summaries.len(), 1, "same-date records must reduce to one summary");
        let day = &summaries[0];
        assert_eq!(day.total_runs, 10);
        assert_eq!(day.success_rate, 80.0, "rate is the straight mean of 100 and 60");
        assert_eq!(day.avg_duration_secs, 5.0);
        assert_eq!(day.total_cost, 3.0);
        assert_eq!(day.success_count, 8, "round(10 * 80 / 100)");
        assert_eq!(day.failure_count, 2);
    }

    #[test]
    fn test_output_sorted_ascending_regardless_of_input_order() {
        let summaries = compute_daily_summaries(&[
            record("2024-01-03", 1, 50.0, 1.0, 0.1),
            record("2024-01-01", 2, 50.0, 1.0, 0.1),
            record("2024-01-02", 3, 50.0, 1.0, 0.1),
            record("2024-01-01", 4, 50.0, 1.0, 0.1),
        ]);
        let dates: Vec<_> = summaries.iter().map(|s| s.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(dates, sorted, "dates must be strictly ascending with no duplicates");
        assert_eq!(dates.len(), 3);
    }

    #[test]
    fn test_run_count_conservation() {
        let records = vec![
            record("2024-02-01", 7, 80.0, 3.0, 1.0),
            record("2024-02-01", 3, 40.0, 5.0, 0.5),
            record("2024-02-02", 12, 95.0, 2.0, 2.0),
            record("2024-02-04", 0, 0.0, 0.0, 0.0),
        ];
        let summaries = compute_daily_summaries(&records);
        let input_runs: u64 = records.iter().map(|r| r.total_runs).sum();
        let output_runs: u64 = summaries.iter().map(|s| s.total_runs).sum();
        assert_eq!(input_runs, output_runs, "grouping must not lose or fabricate runs");
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("2024-02-02", 12, 95.0, 2.0, 2.0),
            record("2024-02-01", 7, 80.0, 3.0, 1.0),
            record("2024-02-01", 3, 40.0, 5.0, 0.5),
        ];
        assert_eq!(
            compute_daily_summaries(&records),
            compute_daily_summaries(&records)
        );
    }

    #[test]
    fn test_zero_run_day() {
        let summaries = compute_daily_summaries(&[record("2024-06-01", 0, 0.0, 0.0, 0.0)]);
        assert_eq!(summaries[0].success_count, 0);
        assert_eq!(summaries[0].failure_count, 0);
    }
}
