//! Environmental observation records: tide heights/extremes and weather.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a tide extreme.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtremeKind {
    High,
    Low,
}

/// A stored tide reading. Rows carrying a `kind` mark local extremes and
/// appear in both the heights and extremes series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TideRecord {
    pub dt: i64,
    pub time: DateTime<Utc>,
    /// Height in metres above the datum.
    pub height: f64,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExtremeKind>,
}

/// Wind speed and direction at one instant.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindValue {
    pub knots: f64,
    /// Direction the wind blows from, degrees true.
    pub direction: f64,
}

/// A stored weather observation. Scalar fields are optional; a record
/// missing a field is skipped by field-selecting queries rather than
/// zero-filled. `weather` and `stats` are carried opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub dt: i64,
    pub time: DateTime<Utc>,
    pub place: String,
    #[serde(default)]
    pub wind: Option<WindValue>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub weather: Option<serde_json::Value>,
    #[serde(default)]
    pub stats: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tide_record_kind_round_trips_as_type() {
        let json = r#"{"dt": 1665181233, "time": "2022-10-07T22:20:33Z",
                       "height": 2.103, "type": "High"}"#;
        let record: TideRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, Some(ExtremeKind::High));

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["type"], "High");
    }

    #[test]
    fn test_tide_record_without_kind_omits_type() {
        let record = TideRecord {
            dt: 1_665_165_600,
            time: DateTime::from_timestamp(1_665_165_600, 0).unwrap(),
            height: 0.544,
            kind: None,
        };
        let out = serde_json::to_value(&record).unwrap();
        assert!(out.get("type").is_none());
    }

    #[test]
    fn test_observation_optional_fields() {
        let json = r#"{"dt": 1665277680, "time": "2022-10-09T01:08:00Z",
                       "place": "Brisbane", "wind": {"knots": 9.99, "direction": 10.0}}"#;
        let obs: WeatherObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.wind.unwrap().direction, 10.0);
        assert!(obs.pressure.is_none());
        assert!(obs.stats.is_none());
    }
}
