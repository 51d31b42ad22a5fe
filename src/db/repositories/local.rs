//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using Vec and HashMap structures, providing fast, deterministic,
//! and isolated execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::db::repository::*;
use crate::models::{
    IngestFailure, Mmsi, PositionReport, TideRecord, VesselInfo, WeatherObservation,
};

/// In-memory local repository.
///
/// Positions, tide records, observations, and the error log are append-only
/// Vecs; the vessel registry is a HashMap keyed by MMSI. A health flag lets
/// tests exercise the upstream-failure path.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    positions: Vec<PositionReport>,
    vessels: HashMap<Mmsi, VesselInfo>,
    tide: Vec<TideRecord>,
    observations: Vec<WeatherObservation>,
    failures: Vec<IngestFailure>,

    // Connection health
    is_unhealthy: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Add a vessel to the registry. Helper for seeding test data.
    pub fn insert_vessel_impl(&self, info: VesselInfo) {
        let mut data = self.data.write().unwrap();
        data.vessels.insert(info.mmsi, info);
    }

    /// Append a tide record. Helper for seeding test data.
    pub fn insert_tide_impl(&self, record: TideRecord) {
        let mut data = self.data.write().unwrap();
        data.tide.push(record);
    }

    /// Append a weather observation. Helper for seeding test data.
    pub fn insert_observation_impl(&self, observation: WeatherObservation) {
        let mut data = self.data.write().unwrap();
        data.observations.push(observation);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_unhealthy = !healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let is_unhealthy = data.is_unhealthy;
        *data = LocalData {
            is_unhealthy,
            ..Default::default()
        };
    }

    /// Get the number of stored position reports.
    pub fn position_count(&self) -> usize {
        self.data.read().unwrap().positions.len()
    }

    /// Get the number of logged ingestion failures.
    pub fn failure_count(&self) -> usize {
        self.data.read().unwrap().failures.len()
    }

    fn check_health(data: &LocalData) -> RepositoryResult<()> {
        if data.is_unhealthy {
            Err(RepositoryError::connection("local repository offline"))
        } else {
            Ok(())
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PositionRepository for LocalRepository {
    async fn store_positions(&self, reports: &[PositionReport]) -> RepositoryResult<usize> {
        let mut data = self.data.write().unwrap();
        Self::check_health(&data).map_err(|e| e.with_operation("store_positions"))?;
        data.positions.extend_from_slice(reports);
        Ok(reports.len())
    }

    async fn fetch_positions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<PositionReport>> {
        let data = self.data.read().unwrap();
        Self::check_health(&data).map_err(|e| e.with_operation("fetch_positions"))?;
        Ok(data
            .positions
            .iter()
            .filter(|r| r.time >= from && r.time <= to)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VesselRegistry for LocalRepository {
    async fn fetch_vessel(&self, mmsi: Mmsi) -> RepositoryResult<Option<VesselInfo>> {
        let data = self.data.read().unwrap();
        Self::check_health(&data).map_err(|e| e.with_operation("fetch_vessel"))?;
        Ok(data.vessels.get(&mmsi).cloned())
    }
}

#[async_trait]
impl TideRepository for LocalRepository {
    async fn fetch_tide(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> RepositoryResult<Vec<TideRecord>> {
        let data = self.data.read().unwrap();
        Self::check_health(&data).map_err(|e| e.with_operation("fetch_tide"))?;
        Ok(data
            .tide
            .iter()
            .filter(|r| from.is_none_or(|f| r.dt >= f) && to.is_none_or(|t| r.dt <= t))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WeatherRepository for LocalRepository {
    async fn fetch_observations(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> RepositoryResult<Vec<WeatherObservation>> {
        let data = self.data.read().unwrap();
        Self::check_health(&data).map_err(|e| e.with_operation("fetch_observations"))?;
        Ok(data
            .observations
            .iter()
            .filter(|r| from.is_none_or(|f| r.dt >= f) && to.is_none_or(|t| r.dt <= t))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ErrorLogRepository for LocalRepository {
    async fn log_failure(&self, failure: &IngestFailure) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        Self::check_health(&data).map_err(|e| e.with_operation("log_failure"))?;
        data.failures.push(failure.clone());
        Ok(())
    }

    async fn fetch_failures(&self) -> RepositoryResult<Vec<IngestFailure>> {
        let data = self.data.read().unwrap();
        Self::check_health(&data).map_err(|e| e.with_operation("fetch_failures"))?;
        Ok(data.failures.clone())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(!data.is_unhealthy)
    }
}
