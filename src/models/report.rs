//! Position report types shared by ingestion, storage, and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nine-digit Maritime Mobile Service Identity used as the vessel key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mmsi(pub i64);

impl Mmsi {
    /// Smallest valid identity (nine digits).
    pub const MIN: i64 = 100_000_000;
    /// Largest valid identity.
    pub const MAX: i64 = 999_999_999;

    pub fn new(value: i64) -> Self {
        Mmsi(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// True when the identity is a nine-digit number.
    pub fn is_valid(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }
}

impl std::fmt::Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    pub fn lat_in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat)
    }

    pub fn lon_in_bounds(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon)
    }
}

/// GeoJSON-style geometry carried by raw reports: `coordinates` is
/// `[lon, lat]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGeometry {
    #[serde(default)]
    pub coordinates: Option<Vec<f64>>,
}

/// A position report exactly as submitted by a feeder, before validation.
///
/// Every field is optional so that a malformed record can be inspected and
/// diverted to the error log instead of failing the whole batch at the
/// deserialization step. Two timestamp fields are required by the feed
/// contract: `unix` (epoch seconds) and `time` (RFC 3339).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReport {
    #[serde(default)]
    pub mmsi: Option<i64>,
    #[serde(default)]
    pub pos: Option<RawGeometry>,
    #[serde(default)]
    pub unix: Option<i64>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub cog: Option<f64>,
    #[serde(default)]
    pub sog: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

/// A validated position report as held in the position store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionReport {
    pub mmsi: Mmsi,
    /// Wall-clock instant of the report.
    pub time: DateTime<Utc>,
    /// Epoch seconds of the report; the binning key.
    pub dt: i64,
    pub pos: GeoPoint,
    pub cog: Option<f64>,
    pub sog: Option<f64>,
    pub name: Option<String>,
    /// Source tag stamped at ingestion.
    pub tag: Option<String>,
}

/// A rejected record captured verbatim for the error log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    pub time: DateTime<Utc>,
    pub tag: String,
    /// Combined failure reasons, comma separated.
    pub message: String,
    /// The offending record, serialized as received.
    pub json: String,
}
