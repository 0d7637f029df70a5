use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coordinates and a printable name for a geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResolution {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl PlaceResolution {
    /// Join the non-empty name parts with `", "`.
    pub fn join_name_parts<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
        parts
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One granularity of a forecast: field values plus their units.
///
/// In the `current` block each field is a scalar. In `daily`/`hourly` each field is an
/// array indexed in parallel with `time`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBlock {
    values: Map<String, Value>,
    units: HashMap<String, String>,
}

impl ForecastBlock {
    pub fn new(values: Map<String, Value>, units: HashMap<String, String>) -> Self {
        Self { values, units }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scalar field of a `current` block. Null is reported as absent.
    pub fn scalar(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    /// Entries of the `time` series, or an empty slice if there is none.
    pub fn times(&self) -> &[Value] {
        match self.values.get("time") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Value of series `key` at `index`.
    ///
    /// An absent field is missing everywhere and is not worth a warning. A series that is
    /// shorter than `time` or not an array at all is logged and treated as missing.
    pub fn at(&self, key: &str, index: usize) -> Option<&Value> {
        match self.values.get(key)? {
            Value::Array(items) => match items.get(index) {
                Some(v) if !v.is_null() => Some(v),
                Some(_) => None,
                None => {
                    tracing::warn!(
                        field = key,
                        index,
                        len = items.len(),
                        "Incomplete data: series is shorter than the time axis"
                    );
                    None
                }
            },
            Value::Null => None,
            other => {
                tracing::warn!(field = key, index, value = %other, "Expected a series, found a scalar");
                None
            }
        }
    }

    /// Unit reported for `key`, or `default` when the payload does not name one.
    pub fn unit<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.units.get(key).map(String::as_str).unwrap_or(default)
    }
}

/// The three blocks of a forecast response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawPayload")]
pub struct ForecastPayload {
    pub current: ForecastBlock,
    pub daily: ForecastBlock,
    pub hourly: ForecastBlock,
    /// Offset of the forecast's local times from UTC.
    pub utc_offset_seconds: Option<i32>,
}

impl ForecastPayload {
    /// Reference "now" for hourly filtering, taken from the current block.
    pub fn current_time(&self) -> Option<&str> {
        self.current.scalar("time").and_then(Value::as_str)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    #[serde(default)]
    current: Option<Map<String, Value>>,
    #[serde(default)]
    current_units: Option<HashMap<String, String>>,
    #[serde(default)]
    daily: Option<Map<String, Value>>,
    #[serde(default)]
    daily_units: Option<HashMap<String, String>>,
    #[serde(default)]
    hourly: Option<Map<String, Value>>,
    #[serde(default)]
    hourly_units: Option<HashMap<String, String>>,
    #[serde(default)]
    utc_offset_seconds: Option<i32>,
}

impl From<RawPayload> for ForecastPayload {
    fn from(raw: RawPayload) -> Self {
        let block = |values: Option<Map<String, Value>>, units: Option<HashMap<String, String>>| {
            ForecastBlock::new(values.unwrap_or_default(), units.unwrap_or_default())
        };

        Self {
            current: block(raw.current, raw.current_units),
            daily: block(raw.daily, raw.daily_units),
            hourly: block(raw.hourly, raw.hourly_units),
            utc_offset_seconds: raw.utc_offset_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use serde_json::json;

    fn payload() -> ForecastPayload {
        serde_json::from_value(json!({
            "latitude": 52.52,
            "utc_offset_seconds": 3600,
            "current": { "time": "2024-01-01T10:00", "temperature_2m": 3.4, "rain": null },
            "current_units": { "temperature_2m": "°C" },
            "hourly": {
                "time": ["2024-01-01T10:00", "2024-01-01T11:00", "2024-01-01T12:00"],
                "temperature_2m": [3.4, 3.9],
                "cloud_cover": [10, null, 30],
                "uv_index": 5
            },
            "hourly_units": { "temperature_2m": "°C" }
        }))
        .expect("payload should deserialize")
    }

    #[test]
    fn missing_blocks_are_empty() {
        let p = payload();
        assert!(p.daily.is_empty());
        assert!(p.daily.times().is_empty());
        assert!(!p.current.is_empty());
    }

    #[test]
    fn current_time_comes_from_current_block() {
        assert_eq!(payload().current_time(), Some("2024-01-01T10:00"));
        assert_eq!(ForecastPayload::default().current_time(), None);
    }

    #[test]
    fn utc_offset_is_optional() {
        assert_eq!(payload().utc_offset_seconds, Some(3600));
        assert_eq!(ForecastPayload::default().utc_offset_seconds, None);
    }

    #[test]
    fn scalar_treats_null_as_absent() {
        let p = payload();
        assert_eq!(p.current.scalar("temperature_2m"), Some(&json!(3.4)));
        assert_eq!(p.current.scalar("rain"), None);
        assert_eq!(p.current.scalar("snowfall"), None);
    }

    #[test]
    fn series_access_is_bounds_checked() {
        let p = payload();
        assert_eq!(p.hourly.at("temperature_2m", 1), Some(&json!(3.9)));
        assert_eq!(p.hourly.at("temperature_2m", 2), None);
        assert_eq!(p.hourly.at("cloud_cover", 1), None);
        assert_eq!(p.hourly.at("missing", 0), None);
        assert_eq!(p.hourly.at("uv_index", 0), None);
    }

    #[test]
    fn short_series_is_logged() {
        let p = payload();
        let (value, logs) = capture_logs(|| p.hourly.at("temperature_2m", 2));

        assert_eq!(value, None);
        assert!(logs.contains("series is shorter than the time axis"), "{logs}");
        assert!(logs.contains("temperature_2m"), "{logs}");
        assert!(logs.contains("index=2"), "{logs}");
    }

    #[test]
    fn absent_field_is_not_logged() {
        let p = payload();
        let (value, logs) = capture_logs(|| p.hourly.at("missing", 0));

        assert_eq!(value, None);
        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn unit_falls_back_to_default() {
        let p = payload();
        assert_eq!(p.hourly.unit("temperature_2m", "K"), "°C");
        assert_eq!(p.hourly.unit("visibility", "m"), "m");
    }

    #[test]
    fn display_name_skips_absent_parts() {
        let name = PlaceResolution::join_name_parts([Some("Springfield"), None, Some("US")]);
        assert_eq!(name, "Springfield, US");

        let name = PlaceResolution::join_name_parts([Some("Paris"), Some(""), Some("FR")]);
        assert_eq!(name, "Paris, FR");
    }
}
