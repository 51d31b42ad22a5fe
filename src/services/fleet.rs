//! Fleet track assembly: time-bin aggregation and metadata join.
//!
//! Raw position reports arrive at whatever rate the feeders transmit.
//! For display the reports are reduced to at most one sample per vessel
//! per time bin, joined with registry metadata, and regrouped into
//! per-vessel tracks ready for segmentation.
//!
//! Reduction rules within one bin:
//! - name, lat, lon: taken from the record with the greatest raw
//!   timestamp (last-wins; exact ties resolve to the later-inserted
//!   record via the stable sort)
//! - cog: arithmetic mean of the records that carry one
//! - sog: maximum of the records that carry one

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::time::{round_to_precision, UnixSeconds};
use crate::models::{Mmsi, OrgFilter, PositionReport, VesselInfo};
use crate::services::track;

/// Resolved fleet query parameters. Defaults mirror the query contract:
/// all time, no speed floor, one-minute bins, no filter, no cap.
#[derive(Debug, Clone)]
pub struct FleetParams {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Minimum speed over ground; reports below the floor are dropped
    /// before binning. Reports without a sog pass only when the floor is 0.
    pub min_sog: f64,
    /// Bin width in minutes.
    pub bin_minutes: u32,
    pub org: Option<OrgFilter>,
    /// Cap on the number of vessels returned, applied after the org filter.
    pub limit: Option<usize>,
}

impl Default for FleetParams {
    fn default() -> Self {
        FleetParams {
            from: DateTime::UNIX_EPOCH,
            to: Utc::now(),
            min_sog: 0.0,
            bin_minutes: 1,
            org: None,
            limit: None,
        }
    }
}

/// One reduced sample: the unique representative of a (vessel, bin) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedSample {
    pub mmsi: Mmsi,
    /// Bin start, epoch seconds.
    pub bin_start: i64,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub cog: Option<f64>,
    pub sog: Option<f64>,
}

/// One track point as served to the frontend: integer course and speed,
/// six-decimal coordinates, timestamped with the bin start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub dt: i64,
    pub lat: f64,
    pub lon: f64,
    pub cog: Option<f64>,
    pub sog: Option<f64>,
}

/// A vessel's reconstructed track with joined registry metadata.
#[derive(Debug, Clone, Serialize)]
pub struct VesselTrack {
    pub mmsi: Mmsi,
    pub info: VesselInfo,
    /// Timestamp of the most recent sample.
    pub dt: i64,
    /// Samples, most recent first.
    pub track: Vec<TrackPoint>,
    /// Drawable polyline segments, split at reception outages.
    pub lines: Vec<Vec<[f64; 2]>>,
}

impl VesselTrack {
    /// The vessel's current position: its most recent sample.
    pub fn current_position(&self) -> Option<&TrackPoint> {
        self.track.first()
    }
}

/// Fleet query response: tracks plus the resolved parameters.
#[derive(Debug, Clone, Serialize)]
pub struct FleetData {
    pub tracks: Vec<VesselTrack>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub sog: f64,
    pub mins: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Reduce raw reports to one sample per (vessel, bin).
///
/// The reports are stable-sorted by raw timestamp so that "last" is
/// deterministic within one invocation even for equal timestamps.
pub fn bin_positions(reports: &[PositionReport], params: &FleetParams) -> Vec<BinnedSample> {
    let mut selected: Vec<&PositionReport> = reports
        .iter()
        .filter(|r| {
            r.time >= params.from
                && r.time <= params.to
                && match r.sog {
                    Some(sog) => sog >= params.min_sog,
                    None => params.min_sog <= 0.0,
                }
        })
        .collect();
    selected.sort_by_key(|r| r.time.timestamp());

    let mut groups: BTreeMap<(Mmsi, i64), Vec<&PositionReport>> = BTreeMap::new();
    for report in selected {
        let bin_start = UnixSeconds::from_datetime(report.time)
            .truncate_to_bin(params.bin_minutes)
            .value();
        groups.entry((report.mmsi, bin_start)).or_default().push(report);
    }

    groups
        .into_iter()
        .map(|((mmsi, bin_start), group)| {
            let last = group[group.len() - 1];

            let cogs: Vec<f64> = group.iter().filter_map(|r| r.cog).collect();
            let cog = if cogs.is_empty() {
                None
            } else {
                Some(cogs.iter().sum::<f64>() / cogs.len() as f64)
            };
            let sog = group
                .iter()
                .filter_map(|r| r.sog)
                .fold(None, |max: Option<f64>, s| {
                    Some(max.map_or(s, |m| m.max(s)))
                });

            BinnedSample {
                mmsi,
                bin_start,
                name: last.name.clone(),
                lat: round_to_precision(last.pos.lat, 6),
                lon: round_to_precision(last.pos.lon, 6),
                cog,
                sog,
            }
        })
        .collect()
}

/// Regroup binned samples into per-vessel tracks, most recent first.
pub fn group_tracks(samples: Vec<BinnedSample>) -> Vec<(Mmsi, Vec<TrackPoint>)> {
    let mut by_vessel: BTreeMap<Mmsi, Vec<TrackPoint>> = BTreeMap::new();
    for sample in samples {
        by_vessel.entry(sample.mmsi).or_default().push(TrackPoint {
            dt: sample.bin_start,
            lat: sample.lat,
            lon: sample.lon,
            cog: sample.cog.map(|c| round_to_precision(c, 0)),
            sog: sample.sog.map(|s| round_to_precision(s, 0)),
        });
    }

    let mut tracks: Vec<(Mmsi, Vec<TrackPoint>)> = by_vessel.into_iter().collect();
    for (_, points) in &mut tracks {
        points.sort_by(|a, b| b.dt.cmp(&a.dt));
    }
    tracks
}

/// Assemble the full fleet response: bin, join, filter, cap, segment.
pub async fn fleet_tracks(
    repo: &dyn FullRepository,
    params: &FleetParams,
    outage_multiplier: u32,
) -> RepositoryResult<FleetData> {
    let reports = repo.fetch_positions(params.from, params.to).await?;
    let samples = bin_positions(&reports, params);
    let grouped = group_tracks(samples);

    let max_gap = track::outage_threshold_secs(params.bin_minutes, outage_multiplier);
    let mut tracks = Vec::with_capacity(grouped.len());
    for (mmsi, points) in grouped {
        let info = repo
            .fetch_vessel(mmsi)
            .await?
            .unwrap_or_else(|| VesselInfo::fallback(mmsi));
        if let Some(filter) = params.org {
            if !filter.matches(&info) {
                continue;
            }
        }

        let segments = track::split_segments(&points, max_gap);
        let lines = track::renderable_lines(&segments);
        let dt = points.first().map(|p| p.dt).unwrap_or_default();
        tracks.push(VesselTrack {
            mmsi,
            info,
            dt,
            track: points,
            lines,
        });
    }

    if let Some(limit) = params.limit {
        tracks.truncate(limit);
    }
    log::debug!(
        "fleet query: {} tracks, bins of {} min",
        tracks.len(),
        params.bin_minutes
    );

    Ok(FleetData {
        tracks,
        from: params.from,
        to: params.to,
        sog: params.min_sog,
        mins: params.bin_minutes,
        org: params.org.map(|o| o.code().to_string()),
        limit: params.limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn report(mmsi: i64, dt: i64, lat: f64, lon: f64, sog: Option<f64>) -> PositionReport {
        PositionReport {
            mmsi: Mmsi::new(mmsi),
            time: DateTime::from_timestamp(dt, 0).unwrap(),
            dt,
            pos: GeoPoint::new(lat, lon),
            cog: Some(90.0),
            sog,
            name: Some(format!("vessel-{}", mmsi)),
            tag: Some("api".to_string()),
        }
    }

    fn all_time() -> FleetParams {
        FleetParams {
            to: DateTime::from_timestamp(10_000_000, 0).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_one_sample_per_bin() {
        let reports = vec![
            report(503_000_001, 10, -27.1, 153.1, Some(3.0)),
            report(503_000_001, 20, -27.2, 153.2, Some(8.0)),
            report(503_000_001, 50, -27.3, 153.3, Some(5.0)),
        ];
        let samples = bin_positions(&reports, &all_time());

        assert_eq!(samples.len(), 1);
        let sample = &samples[0];
        assert_eq!(sample.bin_start, 0);
        // Position comes from the record with the greatest raw timestamp.
        assert_eq!(sample.lat, -27.3);
        assert_eq!(sample.lon, 153.3);
        // Speed is the group maximum; course is the group mean.
        assert_eq!(sample.sog, Some(8.0));
        assert_eq!(sample.cog, Some(90.0));
    }

    #[test]
    fn test_bins_split_on_boundaries() {
        let reports = vec![
            report(503_000_001, 59, -27.1, 153.1, Some(3.0)),
            report(503_000_001, 60, -27.2, 153.2, Some(3.0)),
            report(503_000_001, 119, -27.3, 153.3, Some(3.0)),
        ];
        let samples = bin_positions(&reports, &all_time());

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].bin_start, 0);
        assert_eq!(samples[1].bin_start, 60);
        // Records at 60 and 119 share the second bin; 119 wins the position.
        assert_eq!(samples[1].lat, -27.3);
    }

    #[test]
    fn test_equal_timestamps_break_to_later_insertion() {
        let reports = vec![
            report(503_000_001, 30, -27.1, 153.1, Some(3.0)),
            report(503_000_001, 30, -27.2, 153.2, Some(3.0)),
        ];
        let samples = bin_positions(&reports, &all_time());

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].lat, -27.2);
    }

    #[test]
    fn test_speed_floor_drops_slow_and_unknown() {
        let params = FleetParams {
            min_sog: 2.0,
            ..all_time()
        };
        let reports = vec![
            report(503_000_001, 10, -27.1, 153.1, Some(1.0)),
            report(503_000_001, 20, -27.2, 153.2, Some(2.0)),
            report(503_000_001, 30, -27.3, 153.3, None),
        ];
        let samples = bin_positions(&reports, &params);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].lat, -27.2);
        assert_eq!(samples[0].sog, Some(2.0));
    }

    #[test]
    fn test_no_floor_keeps_unknown_speed() {
        let reports = vec![report(503_000_001, 10, -27.1, 153.1, None)];
        let samples = bin_positions(&reports, &all_time());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sog, None);
    }

    #[test]
    fn test_coordinates_rounded_to_six_decimals() {
        let reports = vec![report(
            503_000_001,
            10,
            -27.330_000_449,
            153.270_000_551,
            Some(1.0),
        )];
        let samples = bin_positions(&reports, &all_time());
        assert_eq!(samples[0].lat, -27.33);
        assert_eq!(samples[0].lon, 153.270_001);
    }

    #[test]
    fn test_rebinning_is_idempotent() {
        let reports = vec![
            report(503_000_001, 10, -27.1, 153.1, Some(3.0)),
            report(503_000_001, 75, -27.2, 153.2, Some(8.0)),
            report(503_000_002, 130, -27.3, 153.3, Some(5.0)),
        ];
        let params = all_time();
        let samples = bin_positions(&reports, &params);

        // Feed the binned samples back through at the same width.
        let as_reports: Vec<PositionReport> = samples
            .iter()
            .map(|s| PositionReport {
                mmsi: s.mmsi,
                time: DateTime::from_timestamp(s.bin_start, 0).unwrap(),
                dt: s.bin_start,
                pos: GeoPoint::new(s.lat, s.lon),
                cog: s.cog,
                sog: s.sog,
                name: s.name.clone(),
                tag: None,
            })
            .collect();
        let rebinned = bin_positions(&as_reports, &params);

        assert_eq!(rebinned, samples);
    }

    #[test]
    fn test_group_tracks_most_recent_first() {
        let reports = vec![
            report(503_000_001, 10, -27.1, 153.1, Some(3.0)),
            report(503_000_001, 130, -27.2, 153.2, Some(3.0)),
            report(503_000_002, 70, -27.3, 153.3, Some(3.0)),
        ];
        let samples = bin_positions(&reports, &all_time());
        let tracks = group_tracks(samples);

        assert_eq!(tracks.len(), 2);
        let (mmsi, points) = &tracks[0];
        assert_eq!(mmsi.value(), 503_000_001);
        assert_eq!(points[0].dt, 120);
        assert_eq!(points[1].dt, 0);
    }

    #[test]
    fn test_track_point_course_is_integer() {
        let mut reports = vec![
            report(503_000_001, 10, -27.1, 153.1, Some(3.4)),
            report(503_000_001, 20, -27.1, 153.1, Some(3.4)),
        ];
        reports[0].cog = Some(10.0);
        reports[1].cog = Some(15.0);

        let samples = bin_positions(&reports, &all_time());
        let tracks = group_tracks(samples);
        let point = &tracks[0].1[0];
        // Mean course 12.5 rounds to 13; speed 3.4 rounds to 3.
        assert_eq!(point.cog, Some(13.0));
        assert_eq!(point.sog, Some(3.0));
    }
}
