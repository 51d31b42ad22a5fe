//! Service layer for aggregation and reconstruction logic.
//!
//! Each service is an independently testable pure stage over data read
//! from the repository: validate and store (ingest), bin and join
//! (fleet), segment (track), interpolate (tide), bucket (wind), select
//! (observations). No service holds state across requests.

pub mod fleet;

pub mod ingest;

pub mod observations;

pub mod tide;

pub mod track;

pub mod wind;

pub use fleet::fleet_tracks;
pub use ingest::ingest_batch;
pub use observations::observation_series;
pub use tide::{tide_now, tide_series};
pub use wind::wind_rose;
