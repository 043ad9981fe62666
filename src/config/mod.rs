// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::export::ExportFormat;
use crate::fleet::ChannelKind;
use crate::model::TrendFamily;
use crate::store::DuplicatePolicy;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Data directory
    pub data_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Enable demo mode (simulated fleet)
    pub demo_mode: bool,

    /// Time-series store configuration
    pub store: StoreConfig,

    /// Degradation model configuration
    pub model: ModelConfig,

    /// RUL estimator configuration
    pub estimator: EstimatorConfig,

    /// Fleet ranking configuration
    pub ranking: RankingConfig,

    /// Snapshot export configuration
    pub export: ExportConfig,

    /// Fleet simulator configuration
    pub sim: SimConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "prognos".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            demo_mode: false,
            store: StoreConfig::default(),
            model: ModelConfig::default(),
            estimator: EstimatorConfig::default(),
            ranking: RankingConfig::default(),
            export: ExportConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("prognos"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Time-series store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Behavior for readings at an already-stored timestamp
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

/// Degradation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Trend family to fit
    pub family: TrendFamily,

    /// Channel preferred for prognosis when an asset records several
    pub primary_channel: ChannelKind,

    /// Minimum readings required for a fit
    pub min_readings: usize,

    /// Rolling-mean window applied before fitting (1 disables smoothing)
    pub smoothing_window: usize,

    /// Readings that may arrive after a fit before the model is invalidated
    pub staleness_allowance: u64,

    /// Wall-clock budget for a single asset fit in milliseconds
    pub fit_timeout_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            family: TrendFamily::Auto,
            primary_channel: ChannelKind::FaultEnergy,
            min_readings: 5,
            smoothing_window: 7,
            staleness_allowance: 0,
            fit_timeout_ms: 2000,
        }
    }
}

/// RUL estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Confidence level for the uncertainty interval
    pub confidence: f64,

    /// Interval inflation per unit of missing fit quality
    pub quality_penalty: f64,

    /// Horizon cap for non-crossing trends, in days
    pub max_rul_days: f64,

    /// Maximum model fit age before estimation fails, in seconds
    pub max_model_age_secs: i64,

    /// Failure thresholds per channel type
    pub thresholds: ThresholdConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            quality_penalty: 2.0,
            max_rul_days: 365.0,
            max_model_age_secs: 3600,
            thresholds: ThresholdConfig::default(),
        }
    }
}

/// Failure thresholds per channel type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Vibration RMS failure level
    pub rms: f64,

    /// Kurtosis failure level
    pub kurtosis: f64,

    /// Fault energy failure level
    pub fault_energy: f64,

    /// Temperature failure level
    pub temperature: f64,

    /// Fallback for custom channels
    pub custom: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            rms: 12.0,
            kurtosis: 8.0,
            fault_energy: 100.0,
            temperature: 90.0,
            custom: 1.0,
        }
    }
}

impl ThresholdConfig {
    /// Threshold for a channel type.
    pub fn for_channel(&self, channel: ChannelKind) -> f64 {
        match channel {
            ChannelKind::Rms => self.rms,
            ChannelKind::Kurtosis => self.kurtosis,
            ChannelKind::FaultEnergy => self.fault_energy,
            ChannelKind::Temperature => self.temperature,
            ChannelKind::Custom(_) => self.custom,
        }
    }
}

/// Fleet ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Urgency weight (w1)
    pub urgency_weight: f64,

    /// Confidence-penalty weight (w2)
    pub uncertainty_weight: f64,

    /// Divide-by-zero guard added to the RUL denominator
    pub epsilon: f64,

    /// RUL at or below this many days is bucketed red
    pub red_days: f64,

    /// RUL at or below this many days is bucketed amber
    pub amber_days: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            urgency_weight: 1.0,
            uncertainty_weight: 0.5,
            epsilon: 0.01,
            red_days: 30.0,
            amber_days: 90.0,
        }
    }
}

/// Snapshot export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Write a snapshot after every ranking
    pub enabled: bool,

    /// Snapshot file format
    pub format: ExportFormat,

    /// Directory for timestamped snapshots
    pub dir: PathBuf,

    /// Stable filename external dashboards poll
    pub latest_filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: ExportFormat::Csv,
            dir: PathBuf::from("./snapshots"),
            latest_filename: "latest_snapshot.csv".to_string(),
        }
    }
}

/// Fleet simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed; the same seed reproduces the same fleet
    pub seed: u64,

    /// Days of daily history to generate per asset
    pub history_days: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            history_days: 120,
        }
    }
}
