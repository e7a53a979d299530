use crate::model::TouchRow;
use chrono::{DateTime, Utc};

/// Week 0 origin: the earliest touch across the whole dataset, never a
/// per-file minimum.
pub fn start_of(rows: &[TouchRow]) -> Option<DateTime<Utc>> {
    rows.iter().map(|r| r.timestamp).min()
}

/// Whole days since `start` in 7-day buckets; exactly 7, 14, ... days after
/// start open a new week.
pub fn week_index(start: DateTime<Utc>, timestamp: DateTime<Utc>) -> i64 {
    (timestamp - start).num_days() / 7
}
