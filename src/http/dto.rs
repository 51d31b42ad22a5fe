//! Data Transfer Objects for the HTTP API.
//!
//! Query parameters arrive as raw strings and are resolved once into the
//! typed service parameters. A parameter that is present but unparseable
//! falls back to its documented default exactly as if it were absent, so
//! `?from=abc` behaves like no `from` at all. Response DTOs live with
//! their services and are re-exported from [`crate::api`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::time::round_to_precision;
use crate::models::OrgFilter;
use crate::services::fleet::FleetParams;
use crate::services::tide::TideSeriesParams;
use crate::services::wind::WindRoseParams;
use crate::settings::Settings;

fn parse_or_default<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
    raw.as_ref().and_then(|s| s.parse().ok())
}

fn parse_epoch(raw: &Option<String>) -> Option<DateTime<Utc>> {
    parse_or_default::<i64>(raw).and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Query parameters for the fleet endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FleetQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sog: Option<String>,
    pub mins: Option<String>,
    pub org: Option<String>,
    pub limit: Option<String>,
}

impl FleetQuery {
    /// Resolve the raw query into service parameters.
    pub fn resolve(&self, settings: &Settings) -> FleetParams {
        FleetParams {
            from: parse_epoch(&self.from).unwrap_or(DateTime::UNIX_EPOCH),
            to: parse_epoch(&self.to).unwrap_or_else(Utc::now),
            min_sog: parse_or_default(&self.sog).unwrap_or(0.0),
            bin_minutes: parse_or_default(&self.mins)
                .unwrap_or(settings.aggregation.bin_minutes),
            org: self.org.as_deref().and_then(OrgFilter::parse),
            limit: parse_or_default(&self.limit),
        }
    }
}

/// Query parameters for the tide endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TideQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl TideQuery {
    pub fn resolve(&self) -> TideSeriesParams {
        TideSeriesParams {
            from: parse_or_default(&self.from),
            to: parse_or_default(&self.to),
            limit: parse_or_default(&self.limit),
            // The offset itself carries at most 3 decimals.
            offset: parse_or_default::<f64>(&self.offset).map(|o| round_to_precision(o, 3)),
        }
    }
}

/// Query parameters for the weather series endpoint. `field` is mandatory
/// and checked in the handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherQuery {
    pub field: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

/// Query parameters for the wind rose endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindRoseQuery {
    /// Number of compass sectors.
    pub n: Option<String>,
    /// Include calm (zero knots) samples.
    pub calm: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl WindRoseQuery {
    pub fn resolve(&self) -> WindRoseParams {
        let defaults = WindRoseParams::default();
        WindRoseParams {
            from: parse_or_default(&self.from),
            to: parse_or_default(&self.to),
            bucket_count: parse_or_default(&self.n).unwrap_or(defaults.bucket_count),
            include_calm: parse_or_default(&self.calm).unwrap_or(false),
        }
    }
}

/// Response for batch position ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub accepted: usize,
    pub rejected: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
