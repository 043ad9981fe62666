// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! Reading ingestion - structured records from CSV or JSON lines

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::fleet::ChannelKind;

/// One ingestion record as delivered by the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Asset the reading belongs to
    pub asset_id: String,
    /// Channel the reading belongs to
    pub channel: ChannelKind,
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Observed value
    pub value: f64,
}

impl RawRecord {
    /// Schema validation. Failures here are data corruption and fatal to
    /// the batch, unlike per-asset model failures.
    pub fn validate(&self) -> Result<()> {
        if self.asset_id.trim().is_empty() {
            return Err(EngineError::MalformedRecord("empty asset_id".to_string()));
        }
        if !self.value.is_finite() {
            return Err(EngineError::MalformedRecord(format!(
                "non-finite value for asset {}",
                self.asset_id
            )));
        }
        Ok(())
    }
}

fn parse_channel(field: &str) -> Result<ChannelKind> {
    let normalized = field.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "rms" => Ok(ChannelKind::Rms),
        "kurtosis" => Ok(ChannelKind::Kurtosis),
        "fault_energy" | "faultenergy" => Ok(ChannelKind::FaultEnergy),
        "temperature" => Ok(ChannelKind::Temperature),
        other => {
            if let Some(id) = other.strip_prefix("custom:") {
                id.parse::<u32>()
                    .map(ChannelKind::Custom)
                    .map_err(|_| EngineError::MalformedRecord(format!("bad channel: {}", field)))
            } else {
                Err(EngineError::MalformedRecord(format!(
                    "unknown channel: {}",
                    field
                )))
            }
        }
    }
}

/// Parse one `asset_id,channel,timestamp,value` CSV line.
pub fn parse_line(line: &str) -> Result<RawRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(EngineError::MalformedRecord(format!(
            "expected 4 fields, got {}: {:?}",
            fields.len(),
            line
        )));
    }

    let channel = parse_channel(fields[1])?;
    let timestamp = fields[2].parse::<DateTime<Utc>>().map_err(|e| {
        EngineError::MalformedRecord(format!("bad timestamp {:?}: {}", fields[2], e))
    })?;
    let value = fields[3]
        .parse::<f64>()
        .map_err(|e| EngineError::MalformedRecord(format!("bad value {:?}: {}", fields[3], e)))?;

    let record = RawRecord {
        asset_id: fields[0].to_string(),
        channel,
        timestamp,
        value,
    };
    record.validate()?;
    Ok(record)
}

/// Read a CSV reading file; a leading `asset_id,...` header row is skipped.
pub fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)
        .map_err(|e| EngineError::MalformedRecord(format!("{}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line
            .map_err(|e| EngineError::MalformedRecord(format!("{}: {}", path.display(), e)))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if lineno == 0 && line.starts_with("asset_id") {
            continue;
        }
        let record = parse_line(line).map_err(|e| {
            EngineError::MalformedRecord(format!("{} line {}: {}", path.display(), lineno + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Read a JSON-lines reading file.
pub fn read_jsonl(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)
        .map_err(|e| EngineError::MalformedRecord(format!("{}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line
            .map_err(|e| EngineError::MalformedRecord(format!("{}: {}", path.display(), e)))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RawRecord = serde_json::from_str(&line).map_err(|e| {
            EngineError::MalformedRecord(format!("{} line {}: {}", path.display(), lineno + 1, e))
        })?;
        record.validate()?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_line() {
        let record = parse_line("pump-01, fault_energy, 2026-03-01T12:00:00Z, 42.5").unwrap();
        assert_eq!(record.asset_id, "pump-01");
        assert_eq!(record.channel, ChannelKind::FaultEnergy);
        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(record.value, 42.5);
    }

    #[test]
    fn test_parse_custom_channel() {
        let record = parse_line("m-9,custom:7,2026-03-01T00:00:00Z,1.0").unwrap();
        assert_eq!(record.channel, ChannelKind::Custom(7));
    }

    #[test]
    fn test_malformed_lines_are_fatal() {
        assert!(matches!(
            parse_line("pump-01,fault_energy,2026-03-01T00:00:00Z"),
            Err(EngineError::MalformedRecord(_))
        ));
        assert!(matches!(
            parse_line("pump-01,warble,2026-03-01T00:00:00Z,1.0"),
            Err(EngineError::MalformedRecord(_))
        ));
        assert!(matches!(
            parse_line("pump-01,rms,not-a-time,1.0"),
            Err(EngineError::MalformedRecord(_))
        ));
        assert!(matches!(
            parse_line("pump-01,rms,2026-03-01T00:00:00Z,NaN"),
            Err(EngineError::MalformedRecord(_))
        ));
    }
}
