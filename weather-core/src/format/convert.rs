//! Conversions from raw measurements to descriptive text.

use serde_json::Value;

use crate::error::FormatError;
use crate::format::units::{coerce_number, raw_text};

pub const CARDINAL_DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const DEGREES_PER_CARDINAL_STEP: f64 = 360.0 / CARDINAL_DIRECTIONS.len() as f64;

/// WMO weather interpretation codes as reported by Open-Meteo.
static WEATHER_CODES: &[(i64, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snowfall"),
    (73, "Moderate snowfall"),
    (75, "Heavy snowfall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Description of a WMO code, if it is one.
pub fn describe_weather_code(code: i64) -> Option<&'static str> {
    WEATHER_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}

/// Present value and its text, or `None` when the caller should print the placeholder.
fn present<'a>(value: Option<&'a Value>, placeholder: &str) -> Option<(&'a Value, String)> {
    let value = value.filter(|v| !v.is_null())?;
    let text = raw_text(value);
    (text != placeholder).then_some((value, text))
}

pub fn try_cardinal(degrees: Option<&Value>, placeholder: &str) -> Result<String, FormatError> {
    let Some((value, text)) = present(degrees, placeholder) else {
        return Ok(placeholder.to_string());
    };
    let deg = coerce_number(value).ok_or_else(|| FormatError::not_numeric(&text, &text))?;

    let sectors = CARDINAL_DIRECTIONS.len();
    let step = (deg.rem_euclid(360.0) / DEGREES_PER_CARDINAL_STEP).round_ties_even() as usize;
    Ok(CARDINAL_DIRECTIONS[step % sectors].to_string())
}

/// Compass label for a direction in degrees.
pub fn cardinal(degrees: Option<&Value>, placeholder: &str) -> String {
    try_cardinal(degrees, placeholder).unwrap_or_else(FormatError::into_fallback)
}

pub fn try_visibility(
    meters: Option<&Value>,
    unit: &str,
    placeholder: &str,
) -> Result<String, FormatError> {
    let Some((value, text)) = present(meters, placeholder) else {
        return Ok(placeholder.to_string());
    };
    let meters = coerce_number(value)
        .ok_or_else(|| FormatError::not_numeric(&text, format!("{text} {unit}")))?;

    if meters < 0.0 {
        return Ok(placeholder.to_string());
    }

    let km = meters / 1000.0;
    let banded = if km >= 10.0 {
        format!("{km:.0} km")
    } else if km > 0.0 && km < 0.1 {
        "<0.1 km".to_string()
    } else if km == 0.0 {
        "0.0 km (Low)".to_string()
    } else {
        format!("{km:.1} km")
    };
    Ok(banded)
}

/// Visibility in meters, banded into kilometers.
pub fn visibility(meters: Option<&Value>, unit: &str, placeholder: &str) -> String {
    try_visibility(meters, unit, placeholder).unwrap_or_else(FormatError::into_fallback)
}

pub fn try_duration(seconds: Option<&Value>, placeholder: &str) -> Result<String, FormatError> {
    let Some((value, text)) = present(seconds, placeholder) else {
        return Ok(placeholder.to_string());
    };
    let seconds = coerce_number(value)
        .ok_or_else(|| FormatError::not_numeric(&text, &text))?
        .max(0.0);

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;

    if hours == 0 && minutes == 0 && seconds > 0.0 {
        Ok(format!("{seconds:.0} sec"))
    } else {
        Ok(format!("{hours}h {minutes:02}m"))
    }
}

/// A number of seconds as `"{h}h {mm}m"`.
pub fn duration(seconds: Option<&Value>, placeholder: &str) -> String {
    try_duration(seconds, placeholder).unwrap_or_else(FormatError::into_fallback)
}

pub fn try_weather_code(code: Option<&Value>, placeholder: &str) -> Result<String, FormatError> {
    let Some((value, text)) = present(code, placeholder) else {
        return Ok(placeholder.to_string());
    };
    let number = coerce_number(value)
        .ok_or_else(|| FormatError::not_numeric(&text, format!("Code {text} (Unknown)")))?;

    if number.fract() != 0.0 {
        return Ok(format!("Code {text}"));
    }

    let code = number as i64;
    Ok(describe_weather_code(code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Code {code}")))
}

/// Short description of a WMO weather code.
pub fn weather_code(code: Option<&Value>, placeholder: &str) -> String {
    try_weather_code(code, placeholder).unwrap_or_else(FormatError::into_fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DEFAULT_NA;
    use serde_json::json;

    fn dir(deg: Value) -> String {
        cardinal(Some(&deg), DEFAULT_NA)
    }

    #[test]
    fn cardinal_buckets() {
        assert_eq!(dir(json!(0)), "N");
        assert_eq!(dir(json!(360)), "N");
        assert_eq!(dir(json!(349)), "N");
        assert_eq!(dir(json!(22.5)), "NNE");
        assert_eq!(dir(json!(90)), "E");
        assert_eq!(dir(json!(200)), "SSW");
        assert_eq!(dir(json!(-90)), "W");
        assert_eq!(dir(json!(725)), "N");
    }

    #[test]
    fn cardinal_rounds_half_to_even() {
        // 11.25 sits exactly between N and NNE
        assert_eq!(dir(json!(11.25)), "N");
        assert_eq!(dir(json!(33.75)), "NE");
    }

    #[test]
    fn cardinal_passes_through_missing_and_text() {
        assert_eq!(cardinal(None, DEFAULT_NA), "N/A");
        assert_eq!(dir(json!("N/A")), "N/A");
        assert_eq!(dir(json!("variable")), "variable");
        assert_eq!(dir(json!("45")), "NE");
    }

    fn vis(m: Value) -> String {
        visibility(Some(&m), "m", DEFAULT_NA)
    }

    #[test]
    fn visibility_bands() {
        assert_eq!(vis(json!(15000)), "15 km");
        assert_eq!(vis(json!(10000)), "10 km");
        assert_eq!(vis(json!(50)), "<0.1 km");
        assert_eq!(vis(json!(0)), "0.0 km (Low)");
        assert_eq!(vis(json!(-5)), "N/A");
        assert_eq!(vis(json!(2450)), "2.5 km");
        assert_eq!(vis(json!(100)), "0.1 km");
    }

    #[test]
    fn visibility_non_numeric_keeps_unit() {
        assert_eq!(vis(json!("hazy")), "hazy m");
        assert_eq!(visibility(None, "m", DEFAULT_NA), "N/A");
    }

    fn dur(s: Value) -> String {
        duration(Some(&s), DEFAULT_NA)
    }

    #[test]
    fn durations() {
        assert_eq!(dur(json!(0)), "0h 00m");
        assert_eq!(dur(json!(45)), "45 sec");
        assert_eq!(dur(json!(5400)), "1h 30m");
        assert_eq!(dur(json!(43_320.5)), "12h 02m");
        assert_eq!(dur(json!(-30)), "0h 00m");
        assert_eq!(dur(json!("long")), "long");
        assert_eq!(duration(None, DEFAULT_NA), "N/A");
    }

    #[test]
    fn weather_codes() {
        assert_eq!(weather_code(Some(&json!(0)), DEFAULT_NA), "Clear sky");
        assert_eq!(weather_code(Some(&json!(95.0)), DEFAULT_NA), "Thunderstorm");
        assert_eq!(weather_code(Some(&json!(42)), DEFAULT_NA), "Code 42");
        assert_eq!(weather_code(Some(&json!("3")), DEFAULT_NA), "Overcast");
        assert_eq!(weather_code(Some(&json!("sunny")), DEFAULT_NA), "Code sunny (Unknown)");
        assert_eq!(weather_code(None, DEFAULT_NA), "N/A");
    }
}
