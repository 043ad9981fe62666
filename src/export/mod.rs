//! Fleet snapshot export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rank::FleetRanking;

/// Snapshot file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// One row per ranked asset, dashboard-friendly column names
    Csv,
    /// One JSON object per line, summary object last
    JsonLines,
}

/// Writes ranked fleet snapshots for external dashboards to poll.
pub struct SnapshotExporter {
    format: ExportFormat,
}

impl SnapshotExporter {
    /// Exporter for the given format.
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Write a ranking snapshot to `writer`.
    pub fn write_ranking<W: Write>(&self, ranking: &FleetRanking, writer: &mut W) -> Result<()> {
        match self.format {
            ExportFormat::Csv => {
                writeln!(
                    writer,
                    "asset_id,predicted_RUL,risk_score,risk_bucket,interval_lo,interval_hi"
                )?;
                for entry in &ranking.entries {
                    writeln!(
                        writer,
                        "{},{:.3},{:.6},{},{:.3},{:.3}",
                        entry.asset_id,
                        entry.rul_days,
                        entry.risk_score,
                        entry.bucket.label(),
                        entry.interval_days.0,
                        entry.interval_days.1,
                    )?;
                }
            }
            ExportFormat::JsonLines => {
                for entry in &ranking.entries {
                    writeln!(writer, "{}", serde_json::to_string(entry)?)?;
                }
                writeln!(writer, "{}", serde_json::to_string(&ranking.summary)?)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Write a ranking snapshot to `path`, creating parent directories.
    pub fn export_to_path(&self, ranking: &FleetRanking, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_ranking(ranking, &mut writer)?;
        info!(
            "Exported fleet snapshot ({} assets) to {:?}",
            ranking.len(),
            path
        );
        Ok(())
    }

    /// Timestamped snapshot filename under `dir`.
    pub fn timestamped_path(&self, dir: &Path) -> PathBuf {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let ext = match self.format {
            ExportFormat::Csv => "csv",
            ExportFormat::JsonLines => "jsonl",
        };
        dir.join(format!("snapshot_{}.{}", timestamp, ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::{FleetRanker, RiskBucket};
    use crate::config::RankingConfig;
    use crate::estimate::RulEstimate;
    use crate::fleet::ChannelKind;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn ranking() -> FleetRanking {
        let mut estimates = HashMap::new();
        estimates.insert(
            "pump-01".to_string(),
            RulEstimate {
                asset_id: "pump-01".to_string(),
                channel: ChannelKind::FaultEnergy,
                rul_days: 12.0,
                interval_days: (8.0, 16.0),
                failure_threshold: 100.0,
                fit_quality: 0.9,
                capped: false,
                computed_at: Utc::now(),
                model_version: Uuid::new_v4(),
            },
        );
        FleetRanker::new(RankingConfig::default()).rank(&estimates)
    }

    #[test]
    fn test_csv_snapshot_shape() {
        let mut buf = Vec::new();
        SnapshotExporter::new(ExportFormat::Csv)
            .write_ranking(&ranking(), &mut buf)
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "asset_id,predicted_RUL,risk_score,risk_bucket,interval_lo,interval_hi"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("pump-01,12.000,"));
        assert!(row.contains(RiskBucket::Red.label()));
    }

    #[test]
    fn test_jsonl_snapshot_roundtrips() {
        let mut buf = Vec::new();
        SnapshotExporter::new(ExportFormat::JsonLines)
            .write_ranking(&ranking(), &mut buf)
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        let first = text.lines().next().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(first).unwrap();
        assert_eq!(parsed["asset_id"], "pump-01");
    }
}
