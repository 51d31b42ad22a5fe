//! Weather observation series with explicit field selection.
//!
//! A series query must name the field it wants. The accepted selectors
//! are a closed set rather than free-form record probing: either one
//! scalar field (one `{value, dt}` row per record carrying it) or `obs`
//! for the full per-timestamp rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::WindValue;

/// The closed set of selectable observation fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservationField {
    /// All relevant fields of each observation.
    Obs,
    Wind,
    Pressure,
    Temperature,
}

impl FromStr for ObservationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "obs" => Ok(Self::Obs),
            "wind" => Ok(Self::Wind),
            "pressure" => Ok(Self::Pressure),
            "temperature" => Ok(Self::Temperature),
            _ => Err(format!("unknown observation field: {}", s)),
        }
    }
}

impl fmt::Display for ObservationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Obs => "obs",
            Self::Wind => "wind",
            Self::Pressure => "pressure",
            Self::Temperature => "temperature",
        };
        write!(f, "{}", name)
    }
}

/// One scalar row of a field-selected series.
#[derive(Debug, Clone, Serialize)]
pub struct ScalarRow {
    pub value: Value,
    pub dt: i64,
}

/// One full observation row for `field=obs`.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationRow {
    pub place: String,
    pub dt: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<WindValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
}

/// Series response; the shape depends on the selector.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ObservationSeries {
    Scalar(Vec<ScalarRow>),
    Full(Vec<ObservationRow>),
}

impl ObservationSeries {
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(rows) => rows.len(),
            Self::Full(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetch the observation series for one field.
///
/// The most recent `limit` rows (then the server cap) are kept, and the
/// response ascends by time. Records lacking the selected field are
/// skipped, not zero-filled.
pub async fn observation_series(
    repo: &dyn FullRepository,
    field: ObservationField,
    from: Option<i64>,
    to: Option<i64>,
    limit: Option<usize>,
    cap: usize,
) -> RepositoryResult<ObservationSeries> {
    let mut records = repo.fetch_observations(from, to).await?;
    records.sort_by(|a, b| b.time.cmp(&a.time));
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records.truncate(cap);
    records.sort_by(|a, b| a.time.cmp(&b.time));

    let series = match field {
        ObservationField::Obs => ObservationSeries::Full(
            records
                .into_iter()
                .map(|r| ObservationRow {
                    place: r.place,
                    dt: r.dt,
                    wind: r.wind,
                    weather: r.weather,
                    stats: r.stats,
                })
                .collect(),
        ),
        ObservationField::Wind => ObservationSeries::Scalar(
            records
                .into_iter()
                .filter_map(|r| {
                    r.wind.map(|w| ScalarRow {
                        value: serde_json::json!({
                            "knots": w.knots,
                            "direction": w.direction,
                        }),
                        dt: r.dt,
                    })
                })
                .collect(),
        ),
        ObservationField::Pressure => ObservationSeries::Scalar(
            records
                .into_iter()
                .filter_map(|r| {
                    r.pressure.map(|p| ScalarRow {
                        value: Value::from(p),
                        dt: r.dt,
                    })
                })
                .collect(),
        ),
        ObservationField::Temperature => ObservationSeries::Scalar(
            records
                .into_iter()
                .filter_map(|r| {
                    r.temperature.map(|t| ScalarRow {
                        value: Value::from(t),
                        dt: r.dt,
                    })
                })
                .collect(),
        ),
    };

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str() {
        assert_eq!("wind".parse::<ObservationField>(), Ok(ObservationField::Wind));
        assert_eq!("obs".parse::<ObservationField>(), Ok(ObservationField::Obs));
        assert!("humidity".parse::<ObservationField>().is_err());
        assert!("Wind".parse::<ObservationField>().is_err());
    }

    #[test]
    fn test_field_display_round_trips() {
        for field in [
            ObservationField::Obs,
            ObservationField::Wind,
            ObservationField::Pressure,
            ObservationField::Temperature,
        ] {
            assert_eq!(field.to_string().parse::<ObservationField>(), Ok(field));
        }
    }
}
