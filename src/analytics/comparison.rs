/// Multi-agent comparison merge.
///
/// Outer-joins several named per-agent daily series on date into one
/// date-ascending table with one column per agent, suitable for multi-series
/// charts. The projected metric is parametrized, as is the policy for dates
/// where an agent has no record: `Zero` renders a zero bar, `Absent` renders
/// a gap. Pure function, O(agents x dates).
use super::DailySummary;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// One agent's daily summaries, tagged with its display name.
#[derive(Debug, Clone)]
pub struct AgentDailySeries {
    pub agent_id: String,
    pub agent_name: String,
    pub data: Vec<DailySummary>,
}

/// Which summary field the comparison table projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    SuccessRate,
    TotalRuns,
    AvgDuration,
    TotalCost,
}

impl ComparisonMetric {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success_rate" => Some(Self::SuccessRate),
            "total_runs" => Some(Self::TotalRuns),
            "avg_duration" => Some(Self::AvgDuration),
            "total_cost" => Some(Self::TotalCost),
            _ => None,
        }
    }

    /// Count-style metrics zero-fill missing dates; rate-style metrics leave
    /// a gap, since "no data" is not the same as "zero".
    #[inline]
    pub fn default_fill(self) -> FillStrategy {
        match self {
            Self::TotalRuns | Self::TotalCost => FillStrategy::Zero,
            Self::SuccessRate | Self::AvgDuration => FillStrategy::Absent,
        }
    }

    #[inline]
    fn project(self, day: &DailySummary) -> f64 {
        match self {
            Self::SuccessRate => day.success_rate,
            Self::TotalRuns => day.total_runs as f64,
            Self::AvgDuration => day.avg_duration_secs,
            Self::TotalCost => day.total_cost,
        }
    }
}

/// Policy for dates where an agent has no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    Zero,
    Absent,
}

impl FillStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "zero" => Some(Self::Zero),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }
}

/// One date's values across all agents, keyed by agent display name.
/// `None` serializes as null and charts as a gap.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AgentComparisonRow {
    pub date: NaiveDate,
    pub values: BTreeMap<String, Option<f64>>,
}

/// Merge per-agent series into one row per date in the union of all input
/// dates, sorted ascending. Duplicate dates inside a single series are a
/// caller contract violation; the last entry wins (never summed, which
/// would double-count).
pub fn compute_agent_comparison(
    series: &[AgentDailySeries],
    metric: ComparisonMetric,
    fill: FillStrategy,
) -> Vec<AgentComparisonRow> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut per_agent: Vec<(&str, BTreeMap<NaiveDate, f64>)> = Vec::with_capacity(series.len());

    for agent in series {
        let mut by_date = BTreeMap::new();
        for day in &agent.data {
            by_date.insert(day.date, metric.project(day));
        }
        dates.extend(by_date.keys().copied());
        per_agent.push((agent.agent_name.as_str(), by_date));
    }

    dates
        .into_iter()
        .map(|date| {
            let values = per_agent
                .iter()
                .map(|(name, by_date)| {
                    let value = match by_date.get(&date) {
                        Some(v) => Some(*v),
                        None => match fill {
                            FillStrategy::Zero => Some(0.0),
                            FillStrategy::Absent => None,
                        },
                    };
                    (name.to_string(), value)
                })
                .collect();
            AgentComparisonRow { date, values }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, runs: u64, rate: f64, duration: f64, cost: f64) -> DailySummary {
        let success_count = ((runs as f64) * rate / 100.0).round() as u64;
        DailySummary {
            date: date.parse().unwrap(),
            total_runs: runs,
            success_rate: rate,
            avg_duration_secs: duration,
            total_cost: cost,
            success_count,
            failure_count: runs - success_count,
        }
    }

    fn agent(id: &str, name: &str, data: Vec<DailySummary>) -> AgentDailySeries {
        AgentDailySeries {
            agent_id: id.into(),
            agent_name: name.into(),
            data,
        }
    }

    #[test]
    fn test_no_agents_no_rows() {
        let rows = compute_agent_comparison(&[], ComparisonMetric::SuccessRate, FillStrategy::Absent);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_disjoint_dates_outer_join() {
        let rows = compute_agent_comparison(
            &[
                agent("a1", "A", vec![day("2024-01-01", 10, 90.0, 5.0, 1.0)]),
                agent("b1", "B", vec![day("2024-01-02", 10, 70.0, 5.0, 1.0)]),
            ],
            ComparisonMetric::SuccessRate,
            FillStrategy::Absent,
        );
        assert_eq!(rows.len(), 2, "disjoint dates must not collapse or drop");

        assert_eq!(rows[0].date, "2024-01-01".parse().unwrap());
        assert_eq!(rows[0].values["A"], Some(90.0));
        assert_eq!(rows[0].values["B"], None);

        assert_eq!(rows[1].date, "2024-01-02".parse().unwrap());
        assert_eq!(rows[1].values["A"], None);
        assert_eq!(rows[1].values["B"], Some(70.0));
    }

    #[test]
    fn test_zero_fill_for_run_counts() {
        let rows = compute_agent_comparison(
            &[
                agent("a1", "A", vec![day("2024-01-01", 10, 90.0, 5.0, 1.0)]),
                agent("b1", "B", vec![day("2024-01-02", 4, 70.0, 5.0, 1.0)]),
            ],
            ComparisonMetric::TotalRuns,
            ComparisonMetric::TotalRuns.default_fill(),
        );
        assert_eq!(rows[0].values["A"], Some(10.0));
        assert_eq!(rows[0].values["B"], Some(0.0), "missing run counts zero-fill by default");
        assert_eq!(rows[1].values["A"], Some(0.0));
        assert_eq!(rows[1].values["B"], Some(4.0));
    }

    #[test]
    fn test_fill_override() {
        // Rate metrics default to gaps, but the policy is caller-configurable.
        let rows = compute_agent_comparison(
            &[
                agent("a1", "A", vec![day("2024-01-01", 10, 90.0, 5.0, 1.0)]),
                agent("b1", "B", vec![day("2024-01-02", 4, 70.0, 5.0, 1.0)]),
            ],
            ComparisonMetric::SuccessRate,
            FillStrategy::Zero,
        );
        assert_eq!(rows[0].values["B"], Some(0.0));
    }

    #[test]
    fn test_rows_sorted_ascending_over_union() {
        let rows = compute_agent_comparison(
            &[
                agent(
                    "a1",
                    "A",
                    vec![
                        day("2024-01-03", 1, 50.0, 1.0, 0.1),
                        day("2024-01-01", 1, 50.0, 1.0, 0.1),
                    ],
                ),
                agent("b1", "B", vec![day("2024-01-02", 1, 50.0, 1.0, 0.1)]),
            ],
            ComparisonMetric::SuccessRate,
            FillStrategy::Absent,
        );
        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![
                "2024-01-01".parse().unwrap(),
                "2024-01-02".parse().unwrap(),
                "2024-01-03".parse().unwrap(),
            ]
        );
    }

    #[test]
    fn test_duplicate_date_in_series_last_wins() {
        let rows = compute_agent_comparison(
            &[agent(
                "a1",
                "A",
                vec![
                    day("2024-01-01", 10, 40.0, 5.0, 1.0),
                    day("2024-01-01", 20, 60.0, 5.0, 1.0),
                ],
            )],
            ComparisonMetric::SuccessRate,
            FillStrategy::Absent,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values["A"], Some(60.0), "last record wins, values are not summed");
    }

    #[test]
    fn test_metric_projection() {
        let series = [agent("a1", "A", vec![day("2024-01-01", 8, 75.0, 3.5, 1.25)])];
        let runs = compute_agent_comparison(&series, ComparisonMetric::TotalRuns, FillStrategy::Zero);
        let duration =
            compute_agent_comparison(&series, ComparisonMetric::AvgDuration, FillStrategy::Absent);
        let cost = compute_agent_comparison(&series, ComparisonMetric::TotalCost, FillStrategy::Zero);
        assert_eq!(runs[0].values["A"], Some(8.0));
        assert_eq!(duration[0].values["A"], Some(3.5));
        assert_eq!(cost[0].values["A"], Some(1.25));
    }
}
