// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! RUL estimation - projecting fitted trends onto failure thresholds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use uuid::Uuid;

use crate::config::EstimatorConfig;
use crate::error::{EngineError, Result};
use crate::fleet::ChannelKind;
use crate::model::{days_between, DegradationModel, TrendFamily};

/// Remaining-useful-life estimate for one asset.
///
/// Derived, never authoritative: recomputed on demand from the current
/// degradation model, and valid only against `model_version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulEstimate {
    /// Asset the estimate belongs to
    pub asset_id: String,
    /// Channel the prognosis was made on
    pub channel: ChannelKind,
    /// Point estimate in days, floored at 0
    pub rul_days: f64,
    /// Uncertainty interval (lo, hi) in days
    pub interval_days: (f64, f64),
    /// Failure threshold the projection used
    pub failure_threshold: f64,
    /// Fit quality of the underlying model
    pub fit_quality: f64,
    /// True when the trend never crosses and the horizon cap was applied
    pub capped: bool,
    /// When the estimate was computed
    pub computed_at: DateTime<Utc>,
    /// Model version the estimate was derived from
    pub model_version: Uuid,
}

impl RulEstimate {
    /// Width of the uncertainty interval in days.
    pub fn interval_width(&self) -> f64 {
        self.interval_days.1 - self.interval_days.0
    }
}

/// Converts fitted degradation models into RUL estimates.
pub struct RulEstimator {
    config: EstimatorConfig,
    z: f64,
}

impl RulEstimator {
    /// Estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        // Two-sided quantile for the configured confidence level; the unit
        // normal cannot fail to construct, the fallback is the 95% quantile.
        let p = 0.5 + config.confidence.clamp(0.0, 0.999) / 2.0;
        let z = Normal::new(0.0, 1.0)
            .map(|n| n.inverse_cdf(p))
            .unwrap_or(1.96);
        Self { config, z }
    }

    /// Project `model` forward to the first crossing of `threshold`.
    ///
    /// Deterministic given (model, threshold, now). Fails with `ModelStale`
    /// when the fit age exceeds the configured limit.
    pub fn estimate(
        &self,
        model: &DegradationModel,
        threshold: f64,
        now: DateTime<Utc>,
    ) -> Result<RulEstimate> {
        let age_secs = model.age_secs(now);
        if age_secs > self.config.max_model_age_secs {
            return Err(EngineError::ModelStale {
                asset_id: model.asset_id.clone(),
                age_secs,
                max_age_secs: self.config.max_model_age_secs,
            });
        }

        let elapsed_days = days_between(model.origin, now).max(0.0);
        let cap = self.config.max_rul_days;

        let (mut rul_days, mut capped) = match model.crossing_days(threshold) {
            Some(cross) => ((cross - elapsed_days).max(0.0), false),
            None => (cap, true),
        };
        if rul_days > cap {
            rul_days = cap;
            capped = true;
        }

        // A capped estimate means "at least the horizon"; its interval is
        // pinned to the cap and contributes no uncertainty width downstream.
        let interval_days = if capped {
            (cap, cap)
        } else {
            let half_width = self.half_width(model, threshold);
            let lo = (rul_days - half_width).max(0.0);
            let hi = (rul_days + half_width).min(cap);
            (lo, hi.max(lo))
        };

        Ok(RulEstimate {
            asset_id: model.asset_id.clone(),
            channel: model.channel,
            rul_days,
            interval_days,
            failure_threshold: threshold,
            fit_quality: model.fit_quality,
            capped,
            computed_at: now,
            model_version: model.version,
        })
    }

    /// Residual spread translated into days through the trend slope at the
    /// crossing, inflated for low fit quality.
    fn half_width(&self, model: &DegradationModel, threshold: f64) -> f64 {
        let rate = match model.family {
            TrendFamily::Exponential => (model.slope * threshold).abs(),
            _ => model.slope.abs(),
        };
        let sigma_days = if rate > 1e-10 {
            model.residual_std / rate
        } else {
            self.config.max_rul_days
        };

        self.z * sigma_days * (1.0 + self.config.quality_penalty * (1.0 - model.fit_quality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn model(slope: f64, fit_quality: f64, residual_std: f64) -> DegradationModel {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        DegradationModel {
            asset_id: "pump-01".to_string(),
            channel: ChannelKind::FaultEnergy,
            family: TrendFamily::Linear,
            intercept: 10.0,
            slope,
            fit_quality,
            residual_std,
            sample_count: 30,
            origin: start,
            fitted_at: start,
            generation: 30,
            version: Uuid::new_v4(),
        }
    }

    fn estimator() -> RulEstimator {
        RulEstimator::new(EstimatorConfig::default())
    }

    // The fixture models carry old fitted_at stamps; tests that project
    // days past the fit use an estimator without the age limit.
    fn lenient_estimator() -> RulEstimator {
        RulEstimator::new(EstimatorConfig {
            max_model_age_secs: i64::MAX,
            ..EstimatorConfig::default()
        })
    }

    #[test]
    fn test_point_estimate_is_never_negative() {
        let m = model(2.0, 0.95, 0.5);
        // "now" far beyond the projected crossing
        let now = m.origin + chrono::Duration::days(400);
        let est = lenient_estimator().estimate(&m, 20.0, now).unwrap();

        assert_eq!(est.rul_days, 0.0);
        assert!(est.interval_days.0 >= 0.0);
    }

    #[test]
    fn test_crossing_projection() {
        let m = model(2.0, 1.0, 0.0);
        let now = m.origin + chrono::Duration::days(5);
        // 10 + 2t = 50 at t = 20, minus 5 elapsed days
        let est = lenient_estimator().estimate(&m, 50.0, now).unwrap();
        assert!((est.rul_days - 15.0).abs() < 1e-9);
        assert!(!est.capped);
    }

    #[test]
    fn test_flat_model_caps_at_horizon() {
        let m = model(0.0, 0.0, 0.1);
        let est = estimator().estimate(&m, 50.0, m.origin).unwrap();

        assert_eq!(est.rul_days, EstimatorConfig::default().max_rul_days);
        assert!(est.capped);
        // "At least the horizon": the interval is pinned to the cap
        assert_eq!(est.interval_days, (est.rul_days, est.rul_days));
    }

    #[test]
    fn test_lower_quality_widens_interval() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let good = estimator().estimate(&model(2.0, 0.95, 1.0), 50.0, now).unwrap();
        let poor = estimator().estimate(&model(2.0, 0.40, 1.0), 50.0, now).unwrap();

        assert!(poor.interval_width() > good.interval_width());
    }

    #[test]
    fn test_stale_model_is_rejected() {
        let m = model(2.0, 0.9, 0.5);
        let now = m.fitted_at + chrono::Duration::days(30);
        let err = estimator().estimate(&m, 50.0, now).unwrap_err();
        assert!(matches!(err, EngineError::ModelStale { .. }));
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let m = model(1.5, 0.8, 0.7);
        let now = m.origin + chrono::Duration::days(3);
        let a = lenient_estimator().estimate(&m, 40.0, now).unwrap();
        let b = lenient_estimator().estimate(&m, 40.0, now).unwrap();

        assert_eq!(a.rul_days, b.rul_days);
        assert_eq!(a.interval_days, b.interval_days);
    }
}
