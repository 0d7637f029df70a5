use serde_json::Value;

use crate::error::FormatError;

/// Placeholder shown for missing values.
pub const DEFAULT_NA: &str = "N/A";

/// Decimal places used for most measurements.
pub const DEFAULT_PRECISION: usize = 1;

/// Text form of a raw payload value, without JSON quoting.
pub fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// Numeric payload value. Strings are not coerced.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Numeric payload value, also accepting numeric strings such as `"12.5"`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// True when `value` is a number strictly greater than zero.
///
/// Used to decide whether optional detail lines (gusts, precipitation breakdown, ...) are
/// worth printing.
pub fn is_positive(value: Option<&Value>) -> bool {
    value.and_then(as_number).is_some_and(|n| n > 0.0)
}

/// Placeholder that prints a missing or zero amount as `0.0{unit}`.
pub fn zero_sentinel(unit: &str) -> String {
    format!("0.0{unit}")
}

fn is_zero_sentinel(placeholder: &str) -> bool {
    let numeric_len = placeholder
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(placeholder.len(), |(i, _)| i);

    placeholder[..numeric_len].parse::<f64>().is_ok_and(|n| n == 0.0)
}

/// Render `value` followed by `unit`.
///
/// With `precision`, the value is coerced to a number and printed with that many decimal
/// places. A value that cannot be coerced is returned as an error carrying
/// `"{value}{unit}"` as fallback.
pub fn try_format_value(
    value: Option<&Value>,
    unit: &str,
    precision: Option<usize>,
    placeholder: &str,
) -> Result<String, FormatError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(placeholder.to_string());
    };

    if as_number(value) == Some(0.0) && is_zero_sentinel(placeholder) {
        return Ok(placeholder.to_string());
    }

    let text = raw_text(value);
    if text == placeholder {
        return Ok(placeholder.to_string());
    }

    match precision {
        None => Ok(format!("{text}{unit}")),
        Some(precision) => match coerce_number(value) {
            Some(n) => Ok(format!("{:.*}{unit}", precision, n)),
            None => Err(FormatError::not_numeric(&text, format!("{text}{unit}"))),
        },
    }
}

/// Infallible form of [`try_format_value`].
pub fn format_value(
    value: Option<&Value>,
    unit: &str,
    precision: Option<usize>,
    placeholder: &str,
) -> String {
    try_format_value(value, unit, precision, placeholder).unwrap_or_else(FormatError::into_fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_value_renders_placeholder() {
        assert_eq!(format_value(None, "mm", None, DEFAULT_NA), "N/A");
        assert_eq!(format_value(Some(&Value::Null), "mm", Some(1), DEFAULT_NA), "N/A");
    }

    #[test]
    fn missing_value_renders_zero_sentinel() {
        assert_eq!(format_value(None, "mm", Some(1), "0.0mm"), "0.0mm");
    }

    #[test]
    fn numeric_zero_renders_zero_sentinel() {
        assert_eq!(format_value(Some(&json!(0.0)), "mm", Some(1), "0.0mm"), "0.0mm");
        assert_eq!(format_value(Some(&json!(0)), "mm", Some(1), &zero_sentinel("mm")), "0.0mm");
    }

    #[test]
    fn zero_without_sentinel_is_formatted() {
        assert_eq!(format_value(Some(&json!(0)), "°C", Some(1), DEFAULT_NA), "0.0°C");
    }

    #[test]
    fn value_equal_to_placeholder_passes_through() {
        assert_eq!(format_value(Some(&json!("N/A")), "%", Some(1), DEFAULT_NA), "N/A");
    }

    #[test]
    fn precision_rounds_numbers() {
        assert_eq!(format_value(Some(&json!(12.345)), "°C", Some(1), DEFAULT_NA), "12.3°C");
        assert_eq!(format_value(Some(&json!(187)), "°", Some(0), DEFAULT_NA), "187°");
        assert_eq!(format_value(Some(&json!("4.56")), " km/h", Some(1), DEFAULT_NA), "4.6 km/h");
    }

    #[test]
    fn no_precision_keeps_raw_text() {
        assert_eq!(format_value(Some(&json!(65)), "%", None, DEFAULT_NA), "65%");
        assert_eq!(format_value(Some(&json!(65.0)), "%", None, DEFAULT_NA), "65.0%");
    }

    #[test]
    fn non_numeric_with_precision_falls_back_to_raw() {
        let err = try_format_value(Some(&json!("calm")), " km/h", Some(1), DEFAULT_NA).unwrap_err();
        assert!(matches!(err, FormatError::NotNumeric { .. }));
        assert_eq!(format_value(Some(&json!("calm")), " km/h", Some(1), DEFAULT_NA), "calm km/h");
        assert_eq!(format_value(Some(&json!(true)), "mm", Some(1), DEFAULT_NA), "truemm");
    }

    #[test]
    fn sentinel_detection() {
        assert!(is_zero_sentinel("0.0mm"));
        assert!(is_zero_sentinel("0cm"));
        assert!(!is_zero_sentinel("N/A"));
        assert!(!is_zero_sentinel("1.0mm"));
        assert!(!is_zero_sentinel(""));
    }

    #[test]
    fn positivity_requires_a_number() {
        assert!(is_positive(Some(&json!(0.2))));
        assert!(!is_positive(Some(&json!(0))));
        assert!(!is_positive(Some(&json!("3.0"))));
        assert!(!is_positive(None));
    }
}
