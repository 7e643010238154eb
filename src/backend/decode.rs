/// Envelope normalization.
///
/// The only place wire-shape tolerance lives: every accepted backend shape
/// is flattened into canonical `PerformanceRecord`s here. Missing numeric
/// fields default to 0, rates are clamped into [0, 100], negative durations
/// and costs are floored at 0, and rows without a usable date are dropped
/// and counted. The pure reducers never see a malformed value.
use super::types::{RawPerformanceRecord, RecordsEnvelope};
use crate::analytics::PerformanceRecord;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    pub records: Vec<PerformanceRecord>,
    /// Rows dropped for a missing or unparsable date.
    pub rejected: usize,
}

pub fn normalize_records(envelope: RecordsEnvelope) -> DecodeOutcome {
    let raw = envelope.into_raw();
    let mut records = Vec::with_capacity(raw.len());
    let mut rejected = 0usize;

    for row in &raw {
        match normalize_record(row) {
            Some(record) => records.push(record),
            None => rejected += 1,
        }
    }

    DecodeOutcome { records, rejected }
}

fn normalize_record(raw: &RawPerformanceRecord) -> Option<PerformanceRecord> {
    let date = parse_day(raw.date.as_deref()?)?;

    Some(PerformanceRecord {
        date,
        total_runs: raw.total_runs.unwrap_or(0.0).max(0.0) as u64,
        success_rate: raw.success_rate.unwrap_or(0.0).clamp(0.0, 100.0),
        avg_duration_secs: raw.avg_duration.unwrap_or(0.0).max(0.0),
        total_cost: raw.total_cost.unwrap_or(0.0).max(0.0),
    })
}

/// Day keys arrive either as plain dates or full RFC 3339 timestamps.
fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.date_naive())
    })
}
