//! # Coastwatch Rust Backend
//!
//! Temporal-spatial aggregation engine for vessel tracking dashboards.
//!
//! This crate ingests high-rate vessel position reports and sparse
//! environmental series (tide heights and extremes, wind observations) and
//! turns them into compact, time-ordered, visualization-ready structures:
//! per-vessel tracks, gap-free polyline segments, interpolated "current"
//! scalar values, and compass-bucketed wind summaries. The backend exposes
//! a REST API via Axum for map and chart frontends.
//!
//! ## Features
//!
//! - **Ingestion**: Validate raw position reports, diverting malformed
//!   records to an error log without aborting the batch
//! - **Aggregation**: Reduce raw reports into fixed-width time bins with
//!   deterministic tie-break rules
//! - **Track Reconstruction**: Rebuild per-vessel tracks and split them
//!   into renderable line segments at reception outages
//! - **Tide Interpolation**: Estimate the current tide height from a sparse
//!   height series and locate the bracketing extremes
//! - **Wind Rose**: Bucket wind observations into fixed compass sectors
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`db`]: Repository pattern and storage abstractions
//! - [`models`]: Domain types (reports, vessels, observations)
//! - [`services`]: Aggregation, reconstruction, and interpolation stages
//! - [`settings`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

pub mod settings;

#[cfg(feature = "http-server")]
pub mod http;
