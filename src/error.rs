// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! Engine error types

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::fleet::ChannelKind;

/// Errors surfaced by the prognostic engine.
///
/// Per-asset failures (`InsufficientData`, `ModelFitTimeout`) never abort a
/// fleet-wide ranking; the asset is excluded and logged. `MalformedRecord`
/// is the one data-corruption-level failure that propagates as fatal.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reading arrived at or before the last stored timestamp for its channel.
    #[error("out-of-order reading for {asset_id}/{channel}: {incoming} is not after {last}")]
    OutOfOrder {
        /// Asset the reading belongs to
        asset_id: String,
        /// Channel the reading belongs to
        channel: ChannelKind,
        /// Timestamp of the rejected reading
        incoming: DateTime<Utc>,
        /// Last timestamp already stored for the channel
        last: DateTime<Utc>,
    },

    /// Too few readings to fit a degradation trend.
    #[error("insufficient data for {asset_id}/{channel}: {got} readings, {min} required")]
    InsufficientData {
        /// Asset that failed to fit
        asset_id: String,
        /// Channel that failed to fit
        channel: ChannelKind,
        /// Readings available
        got: usize,
        /// Configured minimum
        min: usize,
    },

    /// Model fit age exceeds the configured limit; caller must refit.
    #[error("model for {asset_id} is stale: fitted {age_secs}s ago, limit {max_age_secs}s")]
    ModelStale {
        /// Asset whose model went stale
        asset_id: String,
        /// Seconds since the model was fitted
        age_secs: i64,
        /// Configured maximum fit age
        max_age_secs: i64,
    },

    /// Per-asset fit exceeded its wall-clock budget.
    #[error("model fit for {asset_id} exceeded {budget_ms}ms (took {elapsed_ms}ms)")]
    ModelFitTimeout {
        /// Asset whose fit timed out
        asset_id: String,
        /// Observed fit duration
        elapsed_ms: u64,
        /// Configured budget
        budget_ms: u64,
    },

    /// Asset id not present in the fleet registry.
    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    /// Reading record failed schema validation.
    #[error("malformed reading record: {0}")]
    MalformedRecord(String),
}

/// Engine result alias.
pub type Result<T> = std::result::Result<T, EngineError>;
