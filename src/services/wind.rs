//! Wind rose bucketing.
//!
//! Wind observations are classified into fixed compass sectors for the
//! rose diagram. Sector centers, not raw directions, define the bucket
//! edges, so readings either side of north (e.g. 358 and 2 degrees) land
//! in the same sector instead of splitting across the 0/360 boundary.

use serde::{Deserialize, Serialize};

use crate::db::repository::{FullRepository, RepositoryResult};

/// Default number of compass sectors (10 degrees each).
pub const DEFAULT_BUCKET_COUNT: usize = 36;

/// One wind sample: magnitude plus the direction it blows from.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    pub dt: i64,
    pub direction: f64,
    pub knots: f64,
}

/// One compass sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindBucket {
    pub index: usize,
    /// Angular center of the sector, degrees.
    pub angle: f64,
    pub count: usize,
    /// True for the sector holding the most recent sample.
    pub current: bool,
}

/// The most recent sample and where it landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWind {
    pub dt: i64,
    pub direction: f64,
    pub knots: f64,
    pub angle: f64,
    pub bucket: usize,
}

/// Rose summary: always exactly N buckets, zero-count ones included.
#[derive(Debug, Clone, Serialize)]
pub struct WindRoseData {
    pub buckets: Vec<WindBucket>,
    /// Number of samples counted into the rose.
    pub samples: usize,
    pub max_knots: f64,
    pub min_knots: f64,
    pub mean_knots: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentWind>,
}

/// Wrap an angle into [0, 360).
pub fn clamp_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Sector index for a direction: shifting by half a sector before the
/// floor division centers each bucket on its angle.
pub fn bucket_index(direction: f64, bucket_count: usize) -> usize {
    let width = 360.0 / bucket_count as f64;
    let index = (clamp_angle(direction + width / 2.0) / width).floor() as usize;
    index % bucket_count
}

/// Build the rose summary from raw readings.
///
/// Calm samples (zero knots) are skipped unless `include_calm` is set.
/// Max/min/mean run over the counted samples; the sample with the
/// greatest timestamp is "current" and its bucket is flagged.
pub fn build_wind_rose(
    readings: &[WindReading],
    bucket_count: usize,
    include_calm: bool,
) -> WindRoseData {
    let n = if bucket_count == 0 {
        DEFAULT_BUCKET_COUNT
    } else {
        bucket_count
    };
    let width = 360.0 / n as f64;

    let mut buckets: Vec<WindBucket> = (0..n)
        .map(|i| WindBucket {
            index: i,
            angle: clamp_angle(i as f64 * width),
            count: 0,
            current: false,
        })
        .collect();

    let mut max_knots = f64::NEG_INFINITY;
    let mut min_knots = f64::INFINITY;
    let mut sum_knots = 0.0;
    let mut samples = 0usize;
    let mut current: Option<CurrentWind> = None;

    for reading in readings {
        if reading.knots == 0.0 && !include_calm {
            continue;
        }

        let bucket = bucket_index(reading.direction, n);
        buckets[bucket].count += 1;
        samples += 1;
        max_knots = max_knots.max(reading.knots);
        min_knots = min_knots.min(reading.knots);
        sum_knots += reading.knots;

        if current.as_ref().is_none_or(|c| reading.dt > c.dt) {
            current = Some(CurrentWind {
                dt: reading.dt,
                direction: reading.direction,
                knots: reading.knots,
                angle: buckets[bucket].angle,
                bucket,
            });
        }
    }

    if let Some(ref c) = current {
        buckets[c.bucket].current = true;
    }

    WindRoseData {
        buckets,
        samples,
        max_knots: if samples > 0 { max_knots } else { 0.0 },
        min_knots: if samples > 0 { min_knots } else { 0.0 },
        mean_knots: if samples > 0 {
            sum_knots / samples as f64
        } else {
            0.0
        },
        current,
    }
}

/// Resolved wind rose query parameters.
#[derive(Debug, Clone)]
pub struct WindRoseParams {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub bucket_count: usize,
    pub include_calm: bool,
}

impl Default for WindRoseParams {
    fn default() -> Self {
        WindRoseParams {
            from: None,
            to: None,
            bucket_count: DEFAULT_BUCKET_COUNT,
            include_calm: false,
        }
    }
}

/// Build the rose from stored wind observations. Observations without a
/// wind field are skipped; the most recent `cap` rows are considered.
pub async fn wind_rose(
    repo: &dyn FullRepository,
    params: &WindRoseParams,
    cap: usize,
) -> RepositoryResult<WindRoseData> {
    let mut observations = repo.fetch_observations(params.from, params.to).await?;
    observations.sort_by(|a, b| b.time.cmp(&a.time));
    observations.truncate(cap);

    let readings: Vec<WindReading> = observations
        .iter()
        .filter_map(|obs| {
            obs.wind.map(|w| WindReading {
                dt: obs.dt,
                direction: w.direction,
                knots: w.knots,
            })
        })
        .collect();

    Ok(build_wind_rose(
        &readings,
        params.bucket_count,
        params.include_calm,
    ))
}
