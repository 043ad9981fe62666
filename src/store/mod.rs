// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! In-memory time-series store - per-asset sensor histories

mod series;

pub use series::{ChannelSeries, DuplicatePolicy, Reading, SeriesWindow};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::Result;
use crate::fleet::ChannelKind;

type ChannelKey = (String, ChannelKind);

/// Store holding every asset's channel histories.
///
/// Reads are concurrent; writes are exclusive per (asset, channel): each
/// series sits behind its own lock, so appending to one channel never blocks
/// queries against another.
pub struct TimeSeriesStore {
    channels: RwLock<HashMap<ChannelKey, Arc<RwLock<ChannelSeries>>>>,
    policy: DuplicatePolicy,
}

impl TimeSeriesStore {
    /// Empty store with the given duplicate policy.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            policy,
        }
    }

    fn series(&self, asset_id: &str, channel: ChannelKind) -> Option<Arc<RwLock<ChannelSeries>>> {
        self.channels
            .read()
            .get(&(asset_id.to_string(), channel))
            .cloned()
    }

    fn series_or_create(&self, asset_id: &str, channel: ChannelKind) -> Arc<RwLock<ChannelSeries>> {
        if let Some(series) = self.series(asset_id, channel) {
            return series;
        }
        let mut channels = self.channels.write();
        channels
            .entry((asset_id.to_string(), channel))
            .or_insert_with(|| Arc::new(RwLock::new(ChannelSeries::new(asset_id, channel))))
            .clone()
    }

    /// Append a reading to its channel. Returns the channel generation, which
    /// downstream models compare against to detect staleness.
    pub fn append(&self, asset_id: &str, channel: ChannelKind, reading: Reading) -> Result<u64> {
        let series = self.series_or_create(asset_id, channel);
        let mut series = series.write();
        series.append(reading, self.policy)
    }

    /// Snapshot of `[from, to)` for one channel, ascending by timestamp.
    /// Unknown channels yield an empty window.
    pub fn query(
        &self,
        asset_id: &str,
        channel: ChannelKind,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> SeriesWindow {
        match self.series(asset_id, channel) {
            Some(series) => series.read().window(from, to),
            None => SeriesWindow::empty(),
        }
    }

    /// Current generation for a channel; 0 when nothing was ever stored.
    pub fn generation(&self, asset_id: &str, channel: ChannelKind) -> u64 {
        self.series(asset_id, channel)
            .map(|s| s.read().generation())
            .unwrap_or(0)
    }

    /// Most recent reading for a channel.
    pub fn latest(&self, asset_id: &str, channel: ChannelKind) -> Option<Reading> {
        self.series(asset_id, channel).and_then(|s| s.read().latest())
    }

    /// Channels with recorded history for an asset, in a stable order.
    pub fn channels_for(&self, asset_id: &str) -> Vec<ChannelKind> {
        let mut channels: Vec<ChannelKind> = self
            .channels
            .read()
            .keys()
            .filter(|(id, _)| id == asset_id)
            .map(|(_, ch)| *ch)
            .collect();
        channels.sort_by_key(|ch| ch.name());
        channels
    }

    /// Number of (asset, channel) series in the store.
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Total readings across all channels.
    pub fn reading_count(&self) -> usize {
        self.channels
            .read()
            .values()
            .map(|s| s.read().len())
            .sum()
    }
}
