//! Repository trait definitions.
//!
//! The record store is treated as an opaque queryable collection: the
//! aggregation services only ever read range-limited slices and append
//! validated records, so the traits below are the whole storage contract.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust. Reads
//! never mutate the store, so concurrent queries over the same data must
//! produce identical output.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    IngestFailure, Mmsi, PositionReport, TideRecord, VesselInfo, WeatherObservation,
};

/// Repository trait for the append-only position store.
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Append a batch of validated position reports.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of reports stored
    /// * `Err(RepositoryError)` - If the write fails
    async fn store_positions(&self, reports: &[PositionReport]) -> RepositoryResult<usize>;

    /// Fetch position reports with `from <= time <= to`, in insertion order.
    async fn fetch_positions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<PositionReport>>;
}

/// Repository trait for the read-only vessel registry.
#[async_trait]
pub trait VesselRegistry: Send + Sync {
    /// Look up reference data for one vessel.
    ///
    /// # Returns
    /// * `Ok(Some(VesselInfo))` - Registry entry
    /// * `Ok(None)` - No entry; callers synthesize a default
    /// * `Err(RepositoryError)` - If the read fails
    async fn fetch_vessel(&self, mmsi: Mmsi) -> RepositoryResult<Option<VesselInfo>>;
}

/// Repository trait for the tide series.
#[async_trait]
pub trait TideRepository: Send + Sync {
    /// Fetch tide records with `from <= dt <= to`; either bound may be open.
    async fn fetch_tide(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> RepositoryResult<Vec<TideRecord>>;
}

/// Repository trait for weather observations.
#[async_trait]
pub trait WeatherRepository: Send + Sync {
    /// Fetch observations with `from <= dt <= to`; either bound may be open.
    async fn fetch_observations(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> RepositoryResult<Vec<WeatherObservation>>;
}

/// Repository trait for the ingestion error log.
///
/// Rejected records land here verbatim so a bad feeder can be diagnosed
/// without ever blocking the accepted part of a batch.
#[async_trait]
pub trait ErrorLogRepository: Send + Sync {
    /// Append one rejected record.
    async fn log_failure(&self, failure: &IngestFailure) -> RepositoryResult<()>;

    /// Fetch the rejected records, oldest first.
    async fn fetch_failures(&self) -> RepositoryResult<Vec<IngestFailure>>;
}

/// Combined repository interface implemented by storage backends.
#[async_trait]
pub trait FullRepository:
    PositionRepository + VesselRegistry + TideRepository + WeatherRepository + ErrorLogRepository
{
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
