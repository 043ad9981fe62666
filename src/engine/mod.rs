// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! Engine facade - ingestion, model caches, and pull-based queries
//!
//! One `Engine` instance owns the time-series store and every derived
//! cache; there is no global state. Presentation layers poll `asset_rul`
//! and `fleet_ranking` or subscribe to the event bus.

mod events;

pub use events::{EngineEvent, EnginePayload, EventBus};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::estimate::{RulEstimate, RulEstimator};
use crate::fleet::{ChannelKind, FleetRegistry};
use crate::ingest::RawRecord;
use crate::model::{DegradationFitter, DegradationModel};
use crate::rank::{FleetRanker, FleetRanking, RiskBucket};
use crate::store::{Reading, TimeSeriesStore};

type ModelKey = (String, ChannelKind);

/// The prognostic engine.
pub struct Engine {
    config: Arc<Config>,
    store: TimeSeriesStore,
    fleet: RwLock<FleetRegistry>,
    models: RwLock<HashMap<ModelKey, DegradationModel>>,
    estimates: RwLock<HashMap<String, RulEstimate>>,
    ranking: RwLock<Option<FleetRanking>>,
    fitter: DegradationFitter,
    estimator: RulEstimator,
    ranker: FleetRanker,
    events: EventBus,
}

impl Engine {
    /// Build an engine from configuration.
    pub fn new(config: Config) -> Self {
        let store = TimeSeriesStore::new(config.store.duplicate_policy);
        let fitter = DegradationFitter::new(config.model.clone());
        let estimator = RulEstimator::new(config.estimator.clone());
        let ranker = FleetRanker::new(config.ranking.clone());

        Self {
            config: Arc::new(config),
            store,
            fleet: RwLock::new(FleetRegistry::new()),
            models: RwLock::new(HashMap::new()),
            estimates: RwLock::new(HashMap::new()),
            ranking: RwLock::new(None),
            fitter,
            estimator,
            ranker,
            events: EventBus::new(1024),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Event bus for ingest/refit/ranking/alert notifications.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Underlying time-series store.
    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    /// Mark an asset retired; it keeps its history but leaves the ranking.
    pub fn retire_asset(&self, asset_id: &str) -> Result<()> {
        self.fleet.write().retire(asset_id)?;
        *self.ranking.write() = None;
        Ok(())
    }

    /// Number of registered assets, retired included.
    pub fn asset_count(&self) -> usize {
        self.fleet.read().len()
    }

    /// Ingest one reading. Unknown assets are registered on first sight.
    ///
    /// Invalidates the asset's cached estimate and the fleet ranking;
    /// other assets' models are untouched.
    pub fn ingest(&self, record: &RawRecord) -> Result<()> {
        record.validate()?;

        if self.fleet.write().ensure(&record.asset_id, record.channel) {
            debug!("Registered new asset {}", record.asset_id);
        }

        let generation = self.store.append(
            &record.asset_id,
            record.channel,
            Reading {
                timestamp: record.timestamp,
                value: record.value,
            },
        )?;

        self.invalidate(&record.asset_id);
        self.events.publish(EnginePayload::ReadingIngested {
            asset_id: record.asset_id.clone(),
            channel: record.channel,
            generation,
        });
        Ok(())
    }

    /// Ingest a batch of readings. Out-of-order readings are recoverable
    /// and skipped with a warning; malformed records abort the batch.
    /// Returns the number of readings stored.
    pub fn ingest_all(&self, records: impl IntoIterator<Item = RawRecord>) -> Result<usize> {
        let mut stored = 0;
        for record in records {
            match self.ingest(&record) {
                Ok(()) => stored += 1,
                Err(err @ EngineError::OutOfOrder { .. }) => {
                    warn!("Skipping reading: {}", err);
                }
                Err(err) => return Err(err),
            }
        }
        info!("Ingested {} readings", stored);
        Ok(stored)
    }

    fn invalidate(&self, asset_id: &str) {
        self.estimates.write().remove(asset_id);
        *self.ranking.write() = None;
    }

    fn model_is_current(&self, model: &DegradationModel) -> bool {
        let generation = self.store.generation(&model.asset_id, model.channel);
        generation.saturating_sub(model.generation) <= self.config.model.staleness_allowance
            && model.age_secs(Utc::now()) <= self.config.estimator.max_model_age_secs
    }

    /// Channel used for prognosis: the configured primary when the asset
    /// records it, otherwise the asset's first recorded channel.
    fn prognosis_channel(&self, asset_id: &str) -> ChannelKind {
        let channels = self.store.channels_for(asset_id);
        let primary = self.config.model.primary_channel;
        if channels.contains(&primary) {
            primary
        } else {
            channels.first().copied().unwrap_or(primary)
        }
    }

    fn refit(&self, asset_id: &str, channel: ChannelKind) -> Result<DegradationModel> {
        let window = self.store.query(asset_id, channel, None, None);
        let generation = self.store.generation(asset_id, channel);

        let started = Instant::now();
        let model = self.fitter.fit(asset_id, channel, &window, generation)?;
        let elapsed = started.elapsed();

        if elapsed > std::time::Duration::from_millis(self.config.model.fit_timeout_ms) {
            return Err(EngineError::ModelFitTimeout {
                asset_id: asset_id.to_string(),
                elapsed_ms: elapsed.as_millis() as u64,
                budget_ms: self.config.model.fit_timeout_ms,
            });
        }

        debug!(
            "Fitted {} on {} ({} readings, quality {:.3})",
            asset_id, channel, model.sample_count, model.fit_quality
        );
        self.events.publish(EnginePayload::ModelRefit {
            asset_id: asset_id.to_string(),
            fit_quality: model.fit_quality,
        });
        Ok(model)
    }

    /// Current model for an asset channel, refitting when missing or stale.
    fn current_model(&self, asset_id: &str, channel: ChannelKind) -> Result<DegradationModel> {
        let key = (asset_id.to_string(), channel);

        {
            let models = self.models.read();
            if let Some(model) = models.get(&key) {
                if self.model_is_current(model) {
                    return Ok(model.clone());
                }
            }
        }

        let model = self.refit(asset_id, channel)?;
        self.models.write().insert(key, model.clone());
        Ok(model)
    }

    /// Current RUL estimate for one asset (`getAssetRUL`).
    ///
    /// Served from cache while the underlying model is current; otherwise
    /// the model is refitted and the estimate recomputed.
    pub fn asset_rul(&self, asset_id: &str) -> Result<RulEstimate> {
        if !self.fleet.read().contains(asset_id) {
            return Err(EngineError::UnknownAsset(asset_id.to_string()));
        }

        {
            let estimates = self.estimates.read();
            if let Some(estimate) = estimates.get(asset_id) {
                let models = self.models.read();
                if let Some(model) = models.get(&(asset_id.to_string(), estimate.channel)) {
                    if model.version == estimate.model_version && self.model_is_current(model) {
                        return Ok(estimate.clone());
                    }
                }
            }
        }

        let channel = self.prognosis_channel(asset_id);
        let model = self.current_model(asset_id, channel)?;
        let threshold = self.config.estimator.thresholds.for_channel(channel);
        let estimate = self.estimator.estimate(&model, threshold, Utc::now())?;

        self.estimates
            .write()
            .insert(asset_id.to_string(), estimate.clone());
        Ok(estimate)
    }

    /// Current fleet ranking (`getFleetRanking`).
    ///
    /// Per-asset fits run in parallel; the ranking is the barrier that
    /// waits for all of them. Assets that fail to fit (too little data,
    /// fit timeout, stale model) are excluded with a warning and never
    /// abort the fleet computation. An empty fleet yields an empty
    /// ranking.
    pub fn fleet_ranking(&self) -> FleetRanking {
        if let Some(ranking) = self.ranking.read().as_ref() {
            return ranking.clone();
        }

        let active = self.fleet.read().active_ids();
        let results: Vec<(String, Result<RulEstimate>)> = active
            .par_iter()
            .map(|id| (id.clone(), self.asset_rul(id)))
            .collect();

        let mut estimates = HashMap::new();
        for (asset_id, result) in results {
            match result {
                Ok(estimate) => {
                    estimates.insert(asset_id, estimate);
                }
                Err(err) => warn!("Excluding {} from ranking: {}", asset_id, err),
            }
        }

        let ranking = self.ranker.rank(&estimates);

        for entry in &ranking.entries {
            if entry.bucket == RiskBucket::Red {
                self.events.publish(EnginePayload::Alert {
                    asset_id: entry.asset_id.clone(),
                    bucket: entry.bucket,
                    rul_days: entry.rul_days,
                });
            }
        }
        self.events.publish(EnginePayload::RankingUpdated {
            assets: ranking.len(),
            red_count: ranking.summary.red_count,
        });

        *self.ranking.write() = Some(ranking.clone());
        ranking
    }
}
