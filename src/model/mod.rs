//! Degradation modeling - fitting monotonic trends to channel histories

mod fit;
mod smoothing;

pub use fit::FitOutcome;
pub use smoothing::rolling_mean;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ModelConfig;
use crate::error::{EngineError, Result};
use crate::fleet::ChannelKind;
use crate::store::SeriesWindow;

/// Slopes below this magnitude are treated as non-degrading.
const SLOPE_EPS: f64 = 1e-12;

/// Trend families the fitter knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendFamily {
    /// `v = intercept + slope * t`
    Linear,
    /// `v = intercept * exp(slope * t)`; positive histories only
    Exponential,
    /// Fit every applicable family, keep the best R-squared
    Auto,
}

/// Fractional days between two instants.
pub fn days_between(origin: DateTime<Utc>, at: DateTime<Utc>) -> f64 {
    at.signed_duration_since(origin).num_milliseconds() as f64 / 86_400_000.0
}

/// A fitted degradation trend for one asset channel.
///
/// Owned by exactly one asset; `generation` records the store state the fit
/// saw, so newer readings mark the model stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationModel {
    /// Asset this model belongs to
    pub asset_id: String,
    /// Channel the trend was fitted on
    pub channel: ChannelKind,
    /// Resolved family (never `Auto`)
    pub family: TrendFamily,
    /// Value at the time origin (linear) or scale factor (exponential)
    pub intercept: f64,
    /// Rate per day
    pub slope: f64,
    /// R-squared-like fit quality in [0, 1]
    pub fit_quality: f64,
    /// Residual standard deviation in the value domain
    pub residual_std: f64,
    /// Readings the fit consumed
    pub sample_count: usize,
    /// Time zero of the fit axis (first reading in the window)
    pub origin: DateTime<Utc>,
    /// When the fit was computed
    pub fitted_at: DateTime<Utc>,
    /// Store generation at fit time
    pub generation: u64,
    /// Version tag; estimates are valid only against the version they saw
    pub version: Uuid,
}

impl DegradationModel {
    /// Projected channel value at `at`.
    pub fn value_at(&self, at: DateTime<Utc>) -> f64 {
        let t = days_between(self.origin, at);
        match self.family {
            TrendFamily::Exponential => self.intercept * (self.slope * t).exp(),
            _ => self.intercept + self.slope * t,
        }
    }

    /// Days from the fit origin until the trend first reaches `threshold`,
    /// or `None` when the trend never crosses (flat or moving away).
    pub fn crossing_days(&self, threshold: f64) -> Option<f64> {
        if self.slope.abs() < SLOPE_EPS {
            return None;
        }
        let t = match self.family {
            TrendFamily::Exponential => {
                if self.intercept <= 0.0 {
                    return None;
                }
                let ratio = threshold / self.intercept;
                if ratio <= 0.0 {
                    return None;
                }
                ratio.ln() / self.slope
            }
            _ => (threshold - self.intercept) / self.slope,
        };
        (t.is_finite() && t >= 0.0).then_some(t)
    }

    /// Seconds elapsed since the fit was computed.
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.fitted_at).num_seconds()
    }
}

/// Fits degradation trends according to the model configuration.
pub struct DegradationFitter {
    config: ModelConfig,
}

impl DegradationFitter {
    /// Fitter with the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Fit a degradation trend to a channel window.
    ///
    /// Deterministic: the same window always yields the same parameters.
    /// Fails with `InsufficientData` below the configured minimum readings,
    /// or when no family produces a usable fit.
    pub fn fit(
        &self,
        asset_id: &str,
        channel: ChannelKind,
        history: &SeriesWindow,
        generation: u64,
    ) -> Result<DegradationModel> {
        let insufficient = |got: usize| EngineError::InsufficientData {
            asset_id: asset_id.to_string(),
            channel,
            got,
            min: self.config.min_readings.max(2),
        };

        let n = history.len();
        if n < self.config.min_readings.max(2) {
            return Err(insufficient(n));
        }
        let origin = match history.first() {
            Some(first) => first.timestamp,
            None => return Err(insufficient(0)),
        };

        let t: Vec<f64> = history
            .iter()
            .map(|r| days_between(origin, r.timestamp))
            .collect();
        let raw = history.values();
        let values = rolling_mean(&raw, self.config.smoothing_window);

        let best = match self.config.family {
            TrendFamily::Linear => {
                fit::linear_fit(&t, &values).map(|o| (TrendFamily::Linear, o))
            }
            TrendFamily::Exponential => {
                fit::exponential_fit(&t, &values).map(|o| (TrendFamily::Exponential, o))
            }
            TrendFamily::Auto => {
                let linear = fit::linear_fit(&t, &values).map(|o| (TrendFamily::Linear, o));
                let exponential =
                    fit::exponential_fit(&t, &values).map(|o| (TrendFamily::Exponential, o));
                match (linear, exponential) {
                    (Some(l), Some(e)) => {
                        if e.1.r_squared > l.1.r_squared {
                            Some(e)
                        } else {
                            Some(l)
                        }
                    }
                    (l, e) => l.or(e),
                }
            }
        };

        let (family, outcome) = best.ok_or_else(|| insufficient(n))?;

        Ok(DegradationModel {
            asset_id: asset_id.to_string(),
            channel,
            family,
            intercept: outcome.intercept,
            slope: outcome.slope,
            fit_quality: outcome.r_squared,
            residual_std: outcome.residual_std,
            sample_count: n,
            origin,
            fitted_at: Utc::now(),
            generation,
            version: Uuid::new_v4(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ChannelSeries, DuplicatePolicy, Reading};
    use chrono::TimeZone;

    fn window_from(values: &[f64]) -> SeriesWindow {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut series = ChannelSeries::new("pump-01", ChannelKind::FaultEnergy);
        for (day, &value) in values.iter().enumerate() {
            series
                .append(
                    Reading {
                        timestamp: start + chrono::Duration::days(day as i64),
                        value,
                    },
                    DuplicatePolicy::Reject,
                )
                .unwrap();
        }
        series.window(None, None)
    }

    fn config(min_readings: usize) -> ModelConfig {
        ModelConfig {
            min_readings,
            smoothing_window: 1,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_single_reading_below_minimum_fails() {
        let fitter = DegradationFitter::new(config(3));
        let window = window_from(&[1.0]);

        let err = fitter
            .fit("pump-01", ChannelKind::FaultEnergy, &window, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientData { got: 1, min: 3, .. }
        ));
    }

    #[test]
    fn test_fit_parameters_are_deterministic() {
        let fitter = DegradationFitter::new(config(3));
        let values: Vec<f64> = (0..30).map(|i| 10.0 + 0.4 * i as f64 + (i as f64).sin()).collect();
        let window = window_from(&values);

        let a = fitter.fit("pump-01", ChannelKind::FaultEnergy, &window, 30).unwrap();
        let b = fitter.fit("pump-01", ChannelKind::FaultEnergy, &window, 30).unwrap();
        assert_eq!(a.intercept, b.intercept);
        assert_eq!(a.slope, b.slope);
        assert_eq!(a.fit_quality, b.fit_quality);
        assert_eq!(a.residual_std, b.residual_std);
    }

    #[test]
    fn test_auto_prefers_exponential_for_exponential_data() {
        let fitter = DegradationFitter::new(config(3));
        let values: Vec<f64> = (0..40).map(|i| 5.0 * (0.12 * i as f64).exp()).collect();
        let window = window_from(&values);

        let model = fitter.fit("pump-01", ChannelKind::FaultEnergy, &window, 40).unwrap();
        assert_eq!(model.family, TrendFamily::Exponential);
        assert!(model.fit_quality > 0.99);
    }

    #[test]
    fn test_flat_signal_has_zero_quality_and_no_crossing() {
        let fitter = DegradationFitter::new(config(3));
        let window = window_from(&[7.0; 20]);

        let model = fitter.fit("pump-01", ChannelKind::FaultEnergy, &window, 20).unwrap();
        assert_eq!(model.fit_quality, 0.0);
        assert!(model.crossing_days(100.0).is_none());
    }

    #[test]
    fn test_crossing_days_linear() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let model = DegradationModel {
            asset_id: "pump-01".to_string(),
            channel: ChannelKind::FaultEnergy,
            family: TrendFamily::Linear,
            intercept: 10.0,
            slope: 2.0,
            fit_quality: 1.0,
            residual_std: 0.0,
            sample_count: 10,
            origin: start,
            fitted_at: start,
            generation: 10,
            version: Uuid::new_v4(),
        };

        // 10 + 2t = 50 at t = 20
        assert!((model.crossing_days(50.0).unwrap() - 20.0).abs() < 1e-9);
        // Already past the threshold: crossing clamps to "now or earlier"
        assert_eq!(model.crossing_days(10.0), Some(0.0));
        // Moving away from the threshold
        assert!(model.crossing_days(5.0).is_none());
    }
}
