//! Track segmentation.
//!
//! A reconstructed track is drawn as one or more polylines. Whenever the
//! gap between consecutive samples exceeds the outage threshold the track
//! is split, so a vessel that went out of reception range is not joined by
//! a long straight line across the gap. Segments carry no data semantics:
//! the track's current position is its most recent sample regardless of
//! how the segments fall.

use crate::services::fleet::TrackPoint;

/// Gap threshold in seconds: `multiplier` bin widths.
pub fn outage_threshold_secs(bin_minutes: u32, multiplier: u32) -> i64 {
    i64::from(bin_minutes.max(1)) * 60 * i64::from(multiplier)
}

/// Split a track into maximal runs of points whose consecutive gaps are
/// at most `max_gap_secs`. Points are walked in the order given (the
/// aggregator produces most-recent-first); every input point lands in
/// exactly one run, so concatenating the runs reproduces the input.
pub fn split_segments(points: &[TrackPoint], max_gap_secs: i64) -> Vec<Vec<TrackPoint>> {
    let mut segments: Vec<Vec<TrackPoint>> = Vec::new();
    let mut current: Vec<TrackPoint> = Vec::new();

    for point in points {
        if let Some(prev) = current.last() {
            if (prev.dt - point.dt).abs() > max_gap_secs {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(point.clone());
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Map segments to drawable `[lat, lon]` polylines. Runs with fewer than
/// two points cannot be drawn as a line and are dropped here, not in the
/// splitter.
pub fn renderable_lines(segments: &[Vec<TrackPoint>]) -> Vec<Vec<[f64; 2]>> {
    segments
        .iter()
        .filter(|segment| segment.len() >= 2)
        .map(|segment| segment.iter().map(|p| [p.lat, p.lon]).collect())
        .collect()
}
