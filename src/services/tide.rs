//! Tide series assembly and current-height interpolation.
//!
//! The tide store holds a dense height series in which some rows are
//! marked as local extremes (High/Low). Queries return both series; the
//! "now" view interpolates the current height between the two readings
//! bracketing the query instant and reports the bracketing extremes.

use serde::{Deserialize, Serialize};

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::time::round_to_precision;
use crate::models::ExtremeKind;

/// One tide row as served to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideRow {
    pub height: f64,
    pub dt: i64,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExtremeKind>,
}

/// Resolved tide series query parameters.
#[derive(Debug, Clone, Default)]
pub struct TideSeriesParams {
    pub from: Option<i64>,
    pub to: Option<i64>,
    /// Caller row cap; the server-side hard cap applies on top of it.
    pub limit: Option<usize>,
    /// Height offset added to every reading before rounding, e.g. to move
    /// between datums.
    pub offset: Option<f64>,
}

/// Tide series response: heights with the extreme rows repeated in their
/// own series, plus the resolved parameters.
#[derive(Debug, Clone, Serialize)]
pub struct TideData {
    pub heights: Vec<TideRow>,
    pub extremes: Vec<TideRow>,
    pub station: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

/// Current-tide response.
#[derive(Debug, Clone, Serialize)]
pub struct TideNowData {
    /// Interpolated height at the query instant; absent when the series
    /// does not bracket it.
    pub now: Option<TideRow>,
    /// Last extreme before the query instant.
    pub previous: Option<TideRow>,
    /// First extreme at or after the query instant.
    pub next: Option<TideRow>,
    pub station: String,
}

/// Fetch and shape the tide series: most recent rows first for the caps,
/// then ascending for display. Heights are offset and rounded to 3
/// decimals; rows marked as extremes also land in the extremes series.
pub async fn tide_series(
    repo: &dyn FullRepository,
    params: &TideSeriesParams,
    station: &str,
    cap: usize,
) -> RepositoryResult<TideData> {
    let mut records = repo.fetch_tide(params.from, params.to).await?;
    records.sort_by(|a, b| b.time.cmp(&a.time));
    if let Some(limit) = params.limit {
        records.truncate(limit);
    }
    records.truncate(cap);
    records.sort_by(|a, b| a.time.cmp(&b.time));

    let offset = params.offset.unwrap_or(0.0);
    let mut heights = Vec::with_capacity(records.len());
    let mut extremes = Vec::new();
    for record in records {
        let row = TideRow {
            height: round_to_precision(record.height + offset, 3),
            dt: record.dt,
            kind: record.kind,
        };
        if row.kind.is_some() {
            extremes.push(row.clone());
        }
        heights.push(row);
    }

    Ok(TideData {
        heights,
        extremes,
        station: station.to_string(),
        from: params.from,
        to: params.to,
        offset: params.offset,
    })
}

/// Interpolate the height at `now` between the two readings bracketing it.
///
/// The series may arrive in any order; it is ordered by time here. Returns
/// `None` when no bracketing pair exists (empty series, `now` before the
/// first reading or after the last) so the caller keeps its previous value
/// instead of receiving an extrapolation.
pub fn interpolate_height(heights: &[TideRow], now: i64) -> Option<f64> {
    let mut sorted: Vec<&TideRow> = heights.iter().collect();
    sorted.sort_by_key(|r| r.dt);

    let next_idx = sorted.iter().position(|r| r.dt >= now)?;
    if next_idx == 0 {
        return None;
    }
    let prev = sorted[next_idx - 1];
    let next = sorted[next_idx];

    let fraction = (now - prev.dt) as f64 / (next.dt - prev.dt) as f64;
    let height = prev.height + fraction * (next.height - prev.height);
    Some(round_to_precision(height, 2))
}

/// Locate the extremes bracketing `now`: the first at or after it and the
/// one immediately before that. Either side may be absent.
pub fn bracket_extremes(extremes: &[TideRow], now: i64) -> (Option<TideRow>, Option<TideRow>) {
    let mut sorted: Vec<TideRow> = extremes.to_vec();
    sorted.sort_by_key(|r| r.dt);

    match sorted.iter().position(|r| r.dt >= now) {
        Some(idx) => {
            let previous = if idx > 0 {
                Some(sorted[idx - 1].clone())
            } else {
                None
            };
            (previous, Some(sorted[idx].clone()))
        }
        None => (None, None),
    }
}

/// Interpolated current tide and bracketing extremes at instant `at`.
pub async fn tide_now(
    repo: &dyn FullRepository,
    at: i64,
    params: &TideSeriesParams,
    station: &str,
    cap: usize,
) -> RepositoryResult<TideNowData> {
    let series = tide_series(repo, params, station, cap).await?;

    let now = interpolate_height(&series.heights, at).map(|height| TideRow {
        height,
        dt: at,
        kind: None,
    });
    let (previous, next) = bracket_extremes(&series.extremes, at);

    Ok(TideNowData {
        now,
        previous,
        next,
        station: station.to_string(),
    })
}
