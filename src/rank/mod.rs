//! Fleet risk ranking - urgency scoring and maintenance buckets

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RankingConfig;
use crate::estimate::RulEstimate;

/// Maintenance urgency bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBucket {
    /// Routine monitoring
    Green,
    /// Maintenance due in the next planned window
    Amber,
    /// Immediate action required
    Red,
}

impl RiskBucket {
    /// Dashboard label.
    pub fn label(&self) -> &'static str {
        match self {
            RiskBucket::Red => "RED - Immediate Action",
            RiskBucket::Amber => "AMBER - Plan Maintenance",
            RiskBucket::Green => "GREEN - Normal",
        }
    }

    /// Recommended maintenance action for the bucket.
    pub fn recommended_action(&self) -> &'static str {
        match self {
            RiskBucket::Red => {
                "Immediate action: inspect bearing, check lubrication and alignment. \
                 Plan shutdown within 24-48 hours."
            }
            RiskBucket::Amber => {
                "Planned maintenance: increase monitoring frequency and schedule \
                 maintenance in the next planned window."
            }
            RiskBucket::Green => {
                "Normal operation: continue routine monitoring and preventive maintenance."
            }
        }
    }
}

/// One ranked fleet entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedAsset {
    /// Asset identifier
    pub asset_id: String,
    /// Composite urgency score; higher ranks first
    pub risk_score: f64,
    /// Point RUL estimate in days
    pub rul_days: f64,
    /// Uncertainty interval in days
    pub interval_days: (f64, f64),
    /// Maintenance bucket derived from the RUL
    pub bucket: RiskBucket,
}

/// Fleet-wide KPI block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSummary {
    /// Assets included in the ranking
    pub assets_monitored: usize,
    /// Assets in the red bucket
    pub red_count: usize,
    /// Assets in the amber bucket
    pub amber_count: usize,
    /// Mean point RUL across ranked assets, in days
    pub mean_rul_days: f64,
}

/// Ranked fleet output, most urgent first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetRanking {
    /// When the ranking was produced
    pub generated_at: DateTime<Utc>,
    /// Entries in descending risk order
    pub entries: Vec<RankedAsset>,
    /// KPI summary across the ranked fleet
    pub summary: FleetSummary,
}

impl FleetRanking {
    /// The `n` most urgent entries.
    pub fn top(&self, n: usize) -> &[RankedAsset] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Number of ranked assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no assets were ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Aggregates per-asset RUL estimates into a fleet priority ordering.
pub struct FleetRanker {
    config: RankingConfig,
}

impl FleetRanker {
    /// Ranker with the given weights and bucket boundaries.
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// `risk = w1 / (rul + eps) + w2 * interval_width`
    pub fn risk_score(&self, estimate: &RulEstimate) -> f64 {
        self.config.urgency_weight / (estimate.rul_days + self.config.epsilon)
            + self.config.uncertainty_weight * estimate.interval_width()
    }

    /// Bucket an RUL point estimate.
    pub fn bucket_for(&self, rul_days: f64) -> RiskBucket {
        if rul_days <= self.config.red_days {
            RiskBucket::Red
        } else if rul_days <= self.config.amber_days {
            RiskBucket::Amber
        } else {
            RiskBucket::Green
        }
    }

    /// Rank the fleet by descending risk score, ties broken by ascending
    /// asset id. An empty input yields an empty ranking; that is the
    /// documented boundary case, not an error.
    pub fn rank(&self, estimates: &HashMap<String, RulEstimate>) -> FleetRanking {
        let mut entries: Vec<RankedAsset> = estimates
            .values()
            .map(|est| RankedAsset {
                asset_id: est.asset_id.clone(),
                risk_score: self.risk_score(est),
                rul_days: est.rul_days,
                interval_days: est.interval_days,
                bucket: self.bucket_for(est.rul_days),
            })
            .collect();

        entries.sort_by(|a, b| {
            b.risk_score
                .partial_cmp(&a.risk_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.asset_id.cmp(&b.asset_id))
        });

        let summary = FleetSummary {
            assets_monitored: entries.len(),
            red_count: entries.iter().filter(|e| e.bucket == RiskBucket::Red).count(),
            amber_count: entries.iter().filter(|e| e.bucket == RiskBucket::Amber).count(),
            mean_rul_days: if entries.is_empty() {
                0.0
            } else {
                entries.iter().map(|e| e.rul_days).sum::<f64>() / entries.len() as f64
            },
        };

        FleetRanking {
            generated_at: Utc::now(),
            entries,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::ChannelKind;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn estimate(asset_id: &str, rul_days: f64, half_width: f64) -> RulEstimate {
        RulEstimate {
            asset_id: asset_id.to_string(),
            channel: ChannelKind::FaultEnergy,
            rul_days,
            interval_days: ((rul_days - half_width).max(0.0), rul_days + half_width),
            failure_threshold: 50.0,
            fit_quality: 0.9,
            capped: false,
            computed_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            model_version: Uuid::new_v4(),
        }
    }

    fn ranker() -> FleetRanker {
        FleetRanker::new(RankingConfig {
            urgency_weight: 1.0,
            uncertainty_weight: 0.5,
            epsilon: 0.01,
            ..RankingConfig::default()
        })
    }

    #[test]
    fn test_empty_fleet_yields_empty_ranking() {
        let ranking = ranker().rank(&HashMap::new());
        assert!(ranking.is_empty());
        assert_eq!(ranking.summary.assets_monitored, 0);
    }

    #[test]
    fn test_weighted_ordering() {
        // A: 10 +/- 2, B: 5 +/- 1, C: 5 +/- 3. With w1=1, w2=0.5, eps=0.01
        // the risk formula scores the wider-interval C above B, and both
        // above the longer-lived A.
        let mut estimates = HashMap::new();
        estimates.insert("A".to_string(), estimate("A", 10.0, 2.0));
        estimates.insert("B".to_string(), estimate("B", 5.0, 1.0));
        estimates.insert("C".to_string(), estimate("C", 5.0, 3.0));

        let ranking = ranker().rank(&estimates);
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.asset_id.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);

        // Scores are monotone in uncertainty at equal RUL
        assert!(ranking.entries[0].risk_score > ranking.entries[1].risk_score);
    }

    #[test]
    fn test_ties_break_by_ascending_asset_id() {
        let mut estimates = HashMap::new();
        estimates.insert("zeta".to_string(), estimate("zeta", 5.0, 1.0));
        estimates.insert("alpha".to_string(), estimate("alpha", 5.0, 1.0));

        let ranking = ranker().rank(&estimates);
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.asset_id.as_str()).collect();
        assert_eq!(order, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_buckets_and_summary() {
        let ranker = FleetRanker::new(RankingConfig::default());
        let mut estimates = HashMap::new();
        estimates.insert("red".to_string(), estimate("red", 10.0, 1.0));
        estimates.insert("amber".to_string(), estimate("amber", 60.0, 1.0));
        estimates.insert("green".to_string(), estimate("green", 200.0, 1.0));

        let ranking = ranker.rank(&estimates);
        assert_eq!(ranking.summary.red_count, 1);
        assert_eq!(ranking.summary.amber_count, 1);
        assert_eq!(ranking.summary.assets_monitored, 3);
        assert!((ranking.summary.mean_rul_days - 90.0).abs() < 1e-9);

        let red = ranking.entries.iter().find(|e| e.asset_id == "red").unwrap();
        assert_eq!(red.bucket, RiskBucket::Red);
        assert_eq!(red.bucket.label(), "RED - Immediate Action");
    }
}
