// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! Event bus for engine-to-consumer notifications

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::fleet::ChannelKind;
use crate::rank::RiskBucket;

/// Event payloads published by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnginePayload {
    /// A reading was appended to the store
    ReadingIngested {
        /// Asset the reading belongs to
        asset_id: String,
        /// Channel the reading belongs to
        channel: ChannelKind,
        /// New channel generation
        generation: u64,
    },
    /// A degradation model was (re)fitted
    ModelRefit {
        /// Asset that was refitted
        asset_id: String,
        /// Fit quality of the new model
        fit_quality: f64,
    },
    /// A fleet ranking was produced
    RankingUpdated {
        /// Assets ranked
        assets: usize,
        /// Assets in the red bucket
        red_count: usize,
    },
    /// An asset entered an alerting bucket
    Alert {
        /// Asset at risk
        asset_id: String,
        /// Bucket that triggered the alert
        bucket: RiskBucket,
        /// Current point RUL in days
        rul_days: f64,
    },
}

/// Event wrapper with a monotonic id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Monotonic event id
    pub id: u64,
    /// When the event was published
    pub timestamp: DateTime<Utc>,
    /// Event payload
    pub payload: EnginePayload,
}

/// Broadcast bus for pub/sub engine notifications.
///
/// Sending never blocks; events published with no subscribers are dropped.
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
    counter: AtomicU64,
}

impl EventBus {
    /// Bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            counter: AtomicU64::new(0),
        }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, payload: EnginePayload) {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        let _ = self.tx.send(EngineEvent {
            id,
            timestamp: Utc::now(),
            payload,
        });
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }
}
