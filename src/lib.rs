// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! prognos - Predictive Maintenance Engine
//!
//! A Rust engine for remaining-useful-life (RUL) estimation and fleet risk
//! ranking over multi-asset sensor time series:
//! - In-memory per-asset channel histories with strict ordering
//! - Deterministic degradation trend fitting (linear / exponential / auto)
//! - Threshold-crossing RUL projection with uncertainty intervals
//! - Fleet-wide priority ranking with RED/AMBER/GREEN maintenance buckets
//! - Pull-based query API plus an event bus for dashboards to consume
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        Prognos Engine                          │
//! ├────────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐  ┌────────────┐  ┌───────────┐  ┌─────────────┐  │
//! │  │ Ingest  │→ │ TimeSeries │→ │ Degrade   │→ │ RUL         │  │
//! │  │ Records │  │ Store      │  │ Model     │  │ Estimator   │  │
//! │  └─────────┘  └────────────┘  └───────────┘  └─────────────┘  │
//! │       ↓             ↓               ↓              ↓           │
//! │  ┌──────────────────────────────────────────────────────────┐ │
//! │  │                       Event Bus                          │ │
//! │  └──────────────────────────────────────────────────────────┘ │
//! │       ↓             ↓               ↓              ↓           │
//! │  ┌─────────┐  ┌────────────┐  ┌───────────┐  ┌─────────────┐  │
//! │  │ Fleet   │  │ Snapshot   │  │ Simulator │  │ CLI /       │  │
//! │  │ Ranker  │  │ Export     │  │           │  │ Dashboards  │  │
//! │  └─────────┘  └────────────┘  └───────────┘  └─────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod fleet;
pub mod store;
pub mod model;
pub mod estimate;
pub mod rank;
pub mod engine;
pub mod ingest;
pub mod export;
pub mod sim;

// Re-exports for convenience
pub use config::Config;
pub use engine::{Engine, EventBus};
pub use error::EngineError;
pub use estimate::{RulEstimate, RulEstimator};
pub use fleet::{Asset, AssetStatus, ChannelKind};
pub use ingest::RawRecord;
pub use model::{DegradationModel, TrendFamily};
pub use rank::{FleetRanker, FleetRanking, RiskBucket};
pub use store::{DuplicatePolicy, Reading, TimeSeriesStore};

/// Prognos version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prognos name
pub const NAME: &str = "prognos";
