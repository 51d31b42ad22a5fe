//! Batch ingestion of raw position reports.
//!
//! Each record in a batch is validated independently: records that pass
//! are stamped with the source tag and appended to the position store,
//! records that fail are appended verbatim to the error log together
//! with the failure reasons. One bad record never blocks the rest of the
//! batch.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{GeoPoint, IngestFailure, Mmsi, PositionReport, RawReport};

/// Source tag stamped on every record accepted through this path.
pub const SOURCE_TAG: &str = "api";

/// Batch result: both destinations always add up to the batch size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    pub accepted: usize,
    pub rejected: usize,
}

/// Validate one raw report.
///
/// Checks run in order and all failures are collected, so the error log
/// entry names every problem with the record, not just the first.
pub fn validate_report(raw: &RawReport) -> Result<PositionReport, Vec<String>> {
    let mut errors: Vec<&str> = Vec::new();

    let mmsi = match raw.mmsi {
        Some(value) if Mmsi::new(value).is_valid() => Some(Mmsi::new(value)),
        Some(_) => {
            errors.push("mmsi is out of range");
            None
        }
        None => {
            errors.push("mmsi is missing");
            None
        }
    };

    let pos = match &raw.pos {
        Some(geometry) => match &geometry.coordinates {
            Some(coords) if coords.len() >= 2 => {
                let point = GeoPoint::new(coords[1], coords[0]);
                if !point.lat_in_bounds() {
                    errors.push("lat is out of range");
                }
                if !point.lon_in_bounds() {
                    errors.push("lon is out of range");
                }
                Some(point)
            }
            _ => {
                errors.push("coords are missing");
                None
            }
        },
        None => {
            errors.push("pos is missing");
            None
        }
    };

    if raw.unix.is_none() {
        errors.push("unix is missing");
    }

    let time = match &raw.time {
        Some(text) => match DateTime::parse_from_rfc3339(text) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                errors.push("time is invalid");
                None
            }
        },
        None => {
            errors.push("time is missing");
            None
        }
    };

    if let Some(cog) = raw.cog {
        if cog < 0.0 {
            errors.push("cog is negative");
        }
    }
    if let Some(sog) = raw.sog {
        if sog < 0.0 {
            errors.push("sog is negative");
        }
    }

    match (mmsi, pos, raw.unix, time) {
        (Some(mmsi), Some(pos), Some(unix), Some(time)) if errors.is_empty() => {
            Ok(PositionReport {
                mmsi,
                time,
                dt: unix,
                pos,
                cog: raw.cog,
                sog: raw.sog,
                name: raw.name.clone(),
                tag: raw.tag.clone(),
            })
        }
        _ => Err(errors.into_iter().map(String::from).collect()),
    }
}

/// Ingest a batch of raw records.
///
/// Accepted records are stamped `tag = "api"` and stored in one append;
/// each rejected record is logged with its reasons and the verbatim
/// payload. Only a store failure aborts the call.
pub async fn ingest_batch(
    repo: &dyn FullRepository,
    batch: &[serde_json::Value],
) -> RepositoryResult<IngestOutcome> {
    let mut accepted: Vec<PositionReport> = Vec::with_capacity(batch.len());
    let mut rejected = 0usize;

    for value in batch {
        let failure = match serde_json::from_value::<RawReport>(value.clone()) {
            Ok(raw) => match validate_report(&raw) {
                Ok(mut report) => {
                    report.tag = Some(SOURCE_TAG.to_string());
                    accepted.push(report);
                    None
                }
                Err(reasons) => Some(reasons.join(", ")),
            },
            Err(e) => Some(format!("record is malformed: {}", e)),
        };

        if let Some(message) = failure {
            rejected += 1;
            log::warn!("rejected position report: {}", message);
            repo.log_failure(&IngestFailure {
                time: Utc::now(),
                tag: SOURCE_TAG.to_string(),
                message,
                json: value.to_string(),
            })
            .await?;
        }
    }

    if !accepted.is_empty() {
        repo.store_positions(&accepted).await?;
    }
    log::info!(
        "ingested batch: accepted={} rejected={}",
        accepted.len(),
        rejected
    );

    Ok(IngestOutcome {
        accepted: accepted.len(),
        rejected,
    })
}
