use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::FormatError;

pub const FULL_DATETIME_FORMAT: &str = "%A, %d %B %Y %H:%M";
pub const TIME_ONLY_FORMAT: &str = "%H:%M";
pub const DAILY_DATE_FORMAT: &str = "%a, %d %b";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed ISO-8601 timestamp.
///
/// Forecast times come back as local wall-clock times without an offset when the service
/// picks the timezone, so the offset is optional. Two timestamps can only be ordered when
/// both or neither carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    pub fn naive(local: NaiveDateTime) -> Self {
        Self { local, offset: None }
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Midnight at the start of the following day, in the same offset.
    pub fn start_of_next_day(&self) -> Self {
        let midnight = self.local.date().and_time(NaiveTime::MIN);
        let local = midnight
            .checked_add_signed(TimeDelta::days(1))
            .unwrap_or(NaiveDateTime::MAX);

        Self { local, offset: self.offset }
    }

    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, FormatError> {
        match (self.offset, other.offset) {
            (Some(a), Some(b)) => {
                let lhs = self.local - TimeDelta::seconds(a.local_minus_utc().into());
                let rhs = other.local - TimeDelta::seconds(b.local_minus_utc().into());
                Ok(lhs.cmp(&rhs))
            }
            (None, None) => Ok(self.local.cmp(&other.local)),
            (Some(_), None) => Err(self.mixed_with(other)),
            (None, Some(_)) => Err(other.mixed_with(self)),
        }
    }

    fn mixed_with(&self, naive: &Self) -> FormatError {
        FormatError::MixedOffsets {
            aware: self.to_string(),
            naive: naive.to_string(),
        }
    }

    pub fn format(&self, pattern: &str) -> String {
        self.local.format(pattern).to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.local.format("%Y-%m-%dT%H:%M:%S"))?;
        match self.offset {
            Some(offset) => write!(f, "{offset}"),
            None => Ok(()),
        }
    }
}

fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    if normalized.as_bytes().get(10) == Some(&b' ') {
        normalized.replace_range(10..11, "T");
    }
    normalized
}

/// Parse an ISO-8601 date-time, a date-time with offset or `Z`, or a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, FormatError> {
    let normalized = normalize(raw);

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(Timestamp {
                local: dt.naive_local(),
                offset: Some(*dt.offset()),
            });
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Ok(Timestamp::naive(local));
        }
    }

    NaiveDate::parse_from_str(&normalized, DATE_FORMAT)
        .map(|date| Timestamp::naive(date.and_time(NaiveTime::MIN)))
        .map_err(|_| FormatError::bad_timestamp(raw))
}

fn is_blank(raw: Option<&str>, placeholder: &str) -> bool {
    raw.is_none_or(|s| s.is_empty() || s == placeholder)
}

pub fn try_format_timestamp(
    raw: Option<&str>,
    pattern: &str,
    placeholder: &str,
) -> Result<String, FormatError> {
    match raw {
        _ if is_blank(raw, placeholder) => Ok(placeholder.to_string()),
        Some(raw) => parse_timestamp(raw).map(|ts| ts.format(pattern)),
        None => Ok(placeholder.to_string()),
    }
}

/// Format `raw` with `pattern`. Unparseable input is returned unchanged.
pub fn format_timestamp(raw: Option<&str>, pattern: &str, placeholder: &str) -> String {
    try_format_timestamp(raw, pattern, placeholder).unwrap_or_else(FormatError::into_fallback)
}

/// `HH:MM` of a date-time string.
pub fn format_time(raw: Option<&str>, placeholder: &str) -> String {
    format_timestamp(raw, TIME_ONLY_FORMAT, placeholder)
}

/// Calendar dates are parsed strictly as `YYYY-MM-DD`.
pub fn try_format_daily_date(raw: Option<&str>, placeholder: &str) -> Result<String, FormatError> {
    match raw {
        _ if is_blank(raw, placeholder) => Ok(placeholder.to_string()),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(|date| date.format(DAILY_DATE_FORMAT).to_string())
            .map_err(|_| FormatError::bad_timestamp(raw)),
        None => Ok(placeholder.to_string()),
    }
}

pub fn format_daily_date(raw: Option<&str>, placeholder: &str) -> String {
    try_format_daily_date(raw, placeholder).unwrap_or_else(FormatError::into_fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DEFAULT_NA;

    #[test]
    fn formats_full_date_time() {
        assert_eq!(
            format_timestamp(Some("2024-01-01T10:00"), FULL_DATETIME_FORMAT, DEFAULT_NA),
            "Monday, 01 January 2024 10:00"
        );
    }

    #[test]
    fn accepts_z_suffix_and_offsets() {
        assert_eq!(format_time(Some("2024-06-15T08:30:00Z"), DEFAULT_NA), "08:30");
        assert_eq!(format_time(Some("2024-06-15T08:30:00.250+02:00"), DEFAULT_NA), "08:30");
        assert_eq!(format_time(Some("2024-06-15 21:05"), DEFAULT_NA), "21:05");

        let ts = parse_timestamp("2024-06-15T08:30Z").expect("should parse");
        assert_eq!(ts.offset(), FixedOffset::east_opt(0));
    }

    #[test]
    fn bare_date_parses_as_midnight() {
        let ts = parse_timestamp("2024-03-10").expect("should parse");
        assert_eq!(ts.format(TIME_ONLY_FORMAT), "00:00");
        assert_eq!(ts.offset(), None);
    }

    #[test]
    fn blank_input_renders_placeholder() {
        assert_eq!(format_time(None, DEFAULT_NA), "N/A");
        assert_eq!(format_time(Some(""), DEFAULT_NA), "N/A");
        assert_eq!(format_time(Some("N/A"), DEFAULT_NA), "N/A");
        assert_eq!(format_daily_date(None, "-"), "-");
    }

    #[test]
    fn unparseable_input_is_returned_verbatim() {
        assert_eq!(format_time(Some("sometime soon"), DEFAULT_NA), "sometime soon");
        let err = try_format_timestamp(Some("25:99"), TIME_ONLY_FORMAT, DEFAULT_NA).unwrap_err();
        assert!(matches!(err, FormatError::BadTimestamp { .. }));
    }

    #[test]
    fn daily_date_is_strict() {
        assert_eq!(format_daily_date(Some("2024-01-02"), DEFAULT_NA), "Tue, 02 Jan");
        assert_eq!(
            format_daily_date(Some("2024-01-02T10:00"), DEFAULT_NA),
            "2024-01-02T10:00"
        );
    }

    #[test]
    fn next_day_keeps_offset() {
        let ts = parse_timestamp("2024-01-01T10:00:00+05:30").expect("should parse");
        let end = ts.start_of_next_day();
        assert_eq!(end.to_string(), "2024-01-02T00:00:00+05:30");
    }

    #[test]
    fn ordering_across_offsets() {
        let a = parse_timestamp("2024-01-01T10:00:00+02:00").expect("should parse");
        let b = parse_timestamp("2024-01-01T09:00:00Z").expect("should parse");
        assert_eq!(a.try_cmp(&b), Ok(Ordering::Less));

        let naive = parse_timestamp("2024-01-01T09:00").expect("should parse");
        assert!(matches!(a.try_cmp(&naive), Err(FormatError::MixedOffsets { .. })));
        assert!(matches!(naive.try_cmp(&a), Err(FormatError::MixedOffsets { .. })));
    }
}
