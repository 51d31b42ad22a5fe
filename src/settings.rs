//! Service configuration file support.
//!
//! This module provides utilities for reading configuration from TOML
//! files with environment overrides. The empirically chosen aggregation
//! constants (default bin width, outage multiplier, series caps) live
//! here rather than in code.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::repository::RepositoryError;

/// Service configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub aggregation: AggregationSettings,
    #[serde(default)]
    pub series: SeriesSettings,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Aggregation constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationSettings {
    /// Default bin width in minutes for fleet queries.
    #[serde(default = "default_bin_minutes")]
    pub bin_minutes: u32,
    /// Track segments split at gaps wider than this many bin widths.
    #[serde(default = "default_outage_multiplier")]
    pub outage_multiplier: u32,
}

/// Series query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSettings {
    /// Hard cap on tide rows per response.
    #[serde(default = "default_series_cap")]
    pub tide_cap: usize,
    /// Hard cap on observation rows per response.
    #[serde(default = "default_series_cap")]
    pub observation_cap: usize,
    /// Label of the (single) tide station served.
    #[serde(default = "default_station")]
    pub station: String,
    /// Datum offset added to stored tide heights.
    #[serde(default)]
    pub height_offset: f64,
    /// Half-width of the window used by the current-tide view, hours.
    #[serde(default = "default_tide_window_hours")]
    pub tide_window_hours: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_bin_minutes() -> u32 {
    1
}

fn default_outage_multiplier() -> u32 {
    3
}

fn default_series_cap() -> usize {
    1000
}

fn default_station() -> String {
    "Brisbane Bar".to_string()
}

fn default_tide_window_hours() -> i64 {
    12
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AggregationSettings {
    fn default() -> Self {
        AggregationSettings {
            bin_minutes: default_bin_minutes(),
            outage_multiplier: default_outage_multiplier(),
        }
    }
}

impl Default for SeriesSettings {
    fn default() -> Self {
        SeriesSettings {
            tide_cap: default_series_cap(),
            observation_cap: default_series_cap(),
            station: default_station(),
            height_offset: 0.0,
            tide_window_hours: default_tide_window_hours(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Load settings from the default locations, falling back to the
    /// built-in defaults when no file exists.
    ///
    /// Searches for `coastwatch.toml` in:
    /// 1. Current directory
    /// 2. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("coastwatch.toml"),
            PathBuf::from("../coastwatch.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Settings::default())
    }

    /// Apply `HOST` and `PORT` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        self
    }

    /// Load settings: file (if any), then environment overrides.
    pub fn load() -> Result<Self, RepositoryError> {
        Ok(Self::from_default_location()?.with_env_overrides())
    }
}
