// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! Single-channel reading series with strict timestamp ordering

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::fleet::ChannelKind;

/// One sensor observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Observed value
    pub value: f64,
}

/// Insert behavior for repeated timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Any timestamp at or before the last stored one is rejected
    Reject,
    /// Insert-or-replace keyed by timestamp
    Upsert,
}

/// Finite, restartable window over a series snapshot.
///
/// Holds an `Arc` slice taken under the channel read lock, so consumers
/// iterate without holding any lock and can restart iteration freely.
#[derive(Debug, Clone)]
pub struct SeriesWindow {
    readings: Arc<[Reading]>,
}

impl SeriesWindow {
    /// Empty window.
    pub fn empty() -> Self {
        Self {
            readings: Arc::from(Vec::new()),
        }
    }

    pub(crate) fn from_slice(slice: &[Reading]) -> Self {
        Self {
            readings: Arc::from(slice.to_vec()),
        }
    }

    /// Iterate the window in ascending timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.readings.iter()
    }

    /// Number of readings in the window.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// True when the window holds no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Earliest reading in the window.
    pub fn first(&self) -> Option<&Reading> {
        self.readings.first()
    }

    /// Latest reading in the window.
    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Values only, in timestamp order.
    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.value).collect()
    }
}

/// Ordered history for one (asset, channel) pair
#[derive(Debug)]
pub struct ChannelSeries {
    asset_id: String,
    channel: ChannelKind,
    readings: Vec<Reading>,
    generation: u64,
}

impl ChannelSeries {
    /// Empty series for one channel.
    pub fn new(asset_id: &str, channel: ChannelKind) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            channel,
            readings: Vec::new(),
            generation: 0,
        }
    }

    /// Append a reading, enforcing the duplicate policy.
    ///
    /// Under `Reject` timestamps must be strictly increasing. Under `Upsert`
    /// a reading at an existing timestamp replaces the stored value and a new
    /// timestamp lands at its ordered position. Returns the new generation.
    pub fn append(&mut self, reading: Reading, policy: DuplicatePolicy) -> Result<u64> {
        match policy {
            DuplicatePolicy::Reject => {
                if let Some(last) = self.readings.last() {
                    if reading.timestamp <= last.timestamp {
                        return Err(EngineError::OutOfOrder {
                            asset_id: self.asset_id.clone(),
                            channel: self.channel,
                            incoming: reading.timestamp,
                            last: last.timestamp,
                        });
                    }
                }
                self.readings.push(reading);
            }
            DuplicatePolicy::Upsert => {
                match self
                    .readings
                    .binary_search_by_key(&reading.timestamp, |r| r.timestamp)
                {
                    Ok(idx) => self.readings[idx] = reading,
                    Err(idx) => self.readings.insert(idx, reading),
                }
            }
        }

        self.generation += 1;
        Ok(self.generation)
    }

    /// Snapshot of `[from, to)`; open bounds take the series edge.
    pub fn window(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> SeriesWindow {
        let lo = match from {
            Some(ts) => self.readings.partition_point(|r| r.timestamp < ts),
            None => 0,
        };
        let hi = match to {
            Some(ts) => self.readings.partition_point(|r| r.timestamp < ts),
            None => self.readings.len(),
        };
        if lo >= hi {
            return SeriesWindow::empty();
        }
        SeriesWindow::from_slice(&self.readings[lo..hi])
    }

    /// Most recent reading.
    pub fn latest(&self) -> Option<Reading> {
        self.readings.last().copied()
    }

    /// Number of stored readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// True when the series holds no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Monotonic counter bumped on every successful append.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Channel this series records.
    pub fn channel(&self) -> ChannelKind {
        self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(day)
    }

    #[test]
    fn test_reject_out_of_order() {
        let mut series = ChannelSeries::new("pump-01", ChannelKind::Rms);
        series
            .append(Reading { timestamp: ts(2), value: 1.0 }, DuplicatePolicy::Reject)
            .unwrap();

        // Equal timestamp
        let err = series
            .append(Reading { timestamp: ts(2), value: 2.0 }, DuplicatePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, EngineError::OutOfOrder { .. }));

        // Earlier timestamp
        let err = series
            .append(Reading { timestamp: ts(1), value: 2.0 }, DuplicatePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, EngineError::OutOfOrder { .. }));

        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_upsert_replaces_by_timestamp() {
        let mut series = ChannelSeries::new("pump-01", ChannelKind::Rms);
        for day in [1, 2, 4] {
            series
                .append(Reading { timestamp: ts(day), value: day as f64 }, DuplicatePolicy::Upsert)
                .unwrap();
        }

        // Replace existing
        series
            .append(Reading { timestamp: ts(2), value: 20.0 }, DuplicatePolicy::Upsert)
            .unwrap();
        // Insert between existing
        series
            .append(Reading { timestamp: ts(3), value: 3.0 }, DuplicatePolicy::Upsert)
            .unwrap();

        let values = series.window(None, None).values();
        assert_eq!(values, vec![1.0, 20.0, 3.0, 4.0]);
        assert_eq!(series.generation(), 5);
    }

    #[test]
    fn test_window_bounds_and_restartability() {
        let mut series = ChannelSeries::new("pump-01", ChannelKind::Rms);
        for day in 0..10 {
            series
                .append(Reading { timestamp: ts(day), value: day as f64 }, DuplicatePolicy::Reject)
                .unwrap();
        }

        let window = series.window(Some(ts(2)), Some(ts(5)));
        assert_eq!(window.values(), vec![2.0, 3.0, 4.0]);

        // Restartable: two full passes see the same data
        let first: Vec<f64> = window.iter().map(|r| r.value).collect();
        let second: Vec<f64> = window.iter().map(|r| r.value).collect();
        assert_eq!(first, second);
    }
}
