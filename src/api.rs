//! Public API surface for the Rust backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize for JSON serialization.

pub use crate::models::report::{GeoPoint, IngestFailure, Mmsi, PositionReport, RawReport};
pub use crate::models::vessel::{OrgFilter, VesselInfo};
pub use crate::models::observation::{ExtremeKind, TideRecord, WeatherObservation, WindValue};

// Fleet
pub use crate::services::fleet::{BinnedSample, FleetData, FleetParams, TrackPoint, VesselTrack};
// Ingestion
pub use crate::services::ingest::IngestOutcome;
// Observations
pub use crate::services::observations::{
    ObservationField, ObservationRow, ObservationSeries, ScalarRow,
};
// Tide
pub use crate::services::tide::{TideData, TideNowData, TideRow, TideSeriesParams};
// Wind
pub use crate::services::wind::{CurrentWind, WindBucket, WindReading, WindRoseData, WindRoseParams};
