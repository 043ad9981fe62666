// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! Fleet registry - assets and their monitored channels

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Monitored feature channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Vibration RMS level
    Rms,
    /// Vibration kurtosis (impulsiveness)
    Kurtosis,
    /// Band-limited fault energy
    FaultEnergy,
    /// Surface or bearing temperature
    Temperature,
    /// User-defined channel
    Custom(u32),
}

impl ChannelKind {
    /// Wire name used in CSV records and snapshot columns.
    pub fn name(&self) -> String {
        match self {
            ChannelKind::Rms => "rms".to_string(),
            ChannelKind::Kurtosis => "kurtosis".to_string(),
            ChannelKind::FaultEnergy => "fault_energy".to_string(),
            ChannelKind::Temperature => "temperature".to_string(),
            ChannelKind::Custom(id) => format!("custom:{}", id),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Asset operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    /// In service and eligible for ranking
    Active,
    /// Decommissioned; history kept, excluded from ranking
    Retired,
}

/// A monitored asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset identifier
    pub id: String,
    /// Channels with recorded history
    pub channels: Vec<ChannelKind>,
    /// Current operating status
    pub status: AssetStatus,
    /// First time the asset was seen by the engine
    pub registered_at: DateTime<Utc>,
}

impl Asset {
    /// Create an active asset with no channels yet.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            channels: Vec::new(),
            status: AssetStatus::Active,
            registered_at: Utc::now(),
        }
    }
}

/// Registry of every asset known to the engine
#[derive(Debug, Default)]
pub struct FleetRegistry {
    assets: HashMap<String, Asset>,
}

impl FleetRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update an asset, recording `channel` against it.
    /// Returns true when the asset was newly registered.
    pub fn ensure(&mut self, id: &str, channel: ChannelKind) -> bool {
        let is_new = !self.assets.contains_key(id);
        let asset = self
            .assets
            .entry(id.to_string())
            .or_insert_with(|| Asset::new(id));
        if !asset.channels.contains(&channel) {
            asset.channels.push(channel);
        }
        is_new
    }

    /// Insert a pre-built asset, replacing any existing entry.
    pub fn register(&mut self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    /// Mark an asset retired; it keeps its history but leaves the ranking.
    pub fn retire(&mut self, id: &str) -> Result<()> {
        match self.assets.get_mut(id) {
            Some(asset) => {
                asset.status = AssetStatus::Retired;
                Ok(())
            }
            None => Err(EngineError::UnknownAsset(id.to_string())),
        }
    }

    /// Look up an asset.
    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.get(id)
    }

    /// Whether the asset is known.
    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// Ids of all active assets, sorted for deterministic iteration order.
    pub fn active_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .assets
            .values()
            .filter(|a| a.status == AssetStatus::Active)
            .map(|a| a.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of registered assets, retired included.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True when no assets are registered.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_registers_once() {
        let mut fleet = FleetRegistry::new();
        assert!(fleet.ensure("pump-01", ChannelKind::Rms));
        assert!(!fleet.ensure("pump-01", ChannelKind::FaultEnergy));

        let asset = fleet.get("pump-01").unwrap();
        assert_eq!(asset.channels, vec![ChannelKind::Rms, ChannelKind::FaultEnergy]);
        assert_eq!(asset.status, AssetStatus::Active);
    }

    #[test]
    fn test_retired_assets_leave_active_set() {
        let mut fleet = FleetRegistry::new();
        fleet.ensure("pump-01", ChannelKind::Rms);
        fleet.ensure("pump-02", ChannelKind::Rms);

        fleet.retire("pump-01").unwrap();
        assert_eq!(fleet.active_ids(), vec!["pump-02".to_string()]);
        assert_eq!(fleet.len(), 2);
    }

    #[test]
    fn test_retire_unknown_asset_fails() {
        let mut fleet = FleetRegistry::new();
        assert!(matches!(
            fleet.retire("ghost"),
            Err(EngineError::UnknownAsset(_))
        ));
    }
}
