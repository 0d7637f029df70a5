//! Plain-text rendering of a forecast.
//!
//! The report has three sections, always in the same order: current conditions, the daily
//! forecast, and the hourly forecast for the rest of today. A missing block or field never
//! aborts rendering; it shows up as a placeholder and a log line.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::FormatError;
use crate::format::convert::{try_cardinal, try_duration, try_visibility, try_weather_code};
use crate::format::timestamp::{
    FULL_DATETIME_FORMAT, TIME_ONLY_FORMAT, try_format_daily_date, try_format_timestamp,
};
use crate::format::units::{
    DEFAULT_NA, DEFAULT_PRECISION, as_number, is_positive, raw_text, try_format_value,
    zero_sentinel,
};
use crate::format::window::HourlyWindow;
use crate::model::{ForecastBlock, ForecastPayload};

const MEDIUM_WIDTH: usize = 60;
const LONG_WIDTH: usize = 70;
const SHORT_RULE_WIDTH: usize = 40;

const TITLE_FILL: char = '━';
const RULE_CHAR: char = '─';

const INDENT: &str = "  ";

const DAY_MARKER: &str = "Day ☀️";
const NIGHT_MARKER: &str = "Night 🌙";
const DATE_MARKER: &str = "📅";
const HOUR_MARKER: &str = "🕒";
const SUNRISE_MARKER: &str = "🌅";
const SUNSET_MARKER: &str = "🌇";

/// Rain, showers and snowfall breakdown printed under a positive precipitation total.
const PRECIP_PARTS: [(&str, &str, &str); 3] = [
    ("Rain:", "rain", "mm"),
    ("Showers:", "showers", "mm"),
    ("Snowfall:", "snowfall", "cm"),
];

const DAILY_PRECIP_PARTS: [(&str, &str, &str); 3] = [
    ("Rain:", "rain_sum", "mm"),
    ("Showers:", "showers_sum", "mm"),
    ("Snowfall:", "snowfall_sum", "cm"),
];

fn center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    let pad = |n| std::iter::repeat_n(fill, n).collect::<String>();
    format!("{}{text}{}", pad(left), pad(right))
}

fn rule(width: usize) -> String {
    std::iter::repeat_n(RULE_CHAR, width).collect()
}

/// Line buffer for one report section.
struct Section {
    lines: Vec<String>,
    width: usize,
    label_width: usize,
    indent: &'static str,
}

impl Section {
    fn new(title: &str, width: usize, label_width: usize) -> Self {
        let lines = vec![
            String::new(),
            center(&format!(" {title} "), width, TITLE_FILL),
            String::new(),
        ];
        Self { lines, width, label_width, indent: "" }
    }

    fn indented(self) -> Self {
        Self { indent: INDENT, ..self }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn centered(&mut self, text: &str) {
        let line = center(text, self.width, ' ');
        self.push(line.trim_end());
    }

    fn separator(&mut self) {
        self.centered(&rule(SHORT_RULE_WIDTH));
    }

    fn unavailable(&mut self, text: &str) {
        self.centered(text);
        self.push(rule(self.width));
    }

    fn labelled(&mut self, indent: &str, label: &str, value: impl Display) {
        let width = self.label_width.saturating_sub(indent.len());
        self.push(format!("{indent}{label:<width$} {value}"));
    }

    fn field(&mut self, label: &str, value: impl Display) {
        self.labelled(self.indent, label, value);
    }

    fn sub_field(&mut self, label: &str, value: impl Display) {
        let indent = format!("{}{INDENT}", self.indent);
        self.labelled(&indent, label, value);
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Either the single `current` snapshot or one index of a `daily`/`hourly` series.
#[derive(Debug, Clone, Copy)]
enum Row<'a> {
    Snapshot(&'a ForecastBlock),
    Series { block: &'a ForecastBlock, index: usize },
}

impl<'a> Row<'a> {
    fn block(self) -> &'a ForecastBlock {
        match self {
            Row::Snapshot(block) | Row::Series { block, .. } => block,
        }
    }

    fn index(self) -> Option<usize> {
        match self {
            Row::Snapshot(_) => None,
            Row::Series { index, .. } => Some(index),
        }
    }

    fn get(self, key: &str) -> Option<&'a Value> {
        match self {
            Row::Snapshot(block) => block.scalar(key),
            Row::Series { block, index } => block.at(key, index),
        }
    }

    fn unit(self, key: &str, default: &'static str) -> &'a str {
        self.block().unit(key, default)
    }

    fn text(self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.as_str().map_or_else(|| raw_text(v), str::to_string))
    }

    /// Log a formatting failure for this row and return its fallback text.
    fn settle(self, field: &str, result: Result<String, FormatError>) -> String {
        result.unwrap_or_else(|err| {
            match self.index() {
                Some(index) => tracing::warn!(field, index, %err, "Error formatting field"),
                None => tracing::warn!(field, %err, "Error formatting field"),
            }
            err.into_fallback()
        })
    }

    fn measure(self, key: &str, default_unit: &'static str, precision: Option<usize>) -> String {
        let unit = self.unit(key, default_unit);
        self.settle(key, try_format_value(self.get(key), unit, precision, DEFAULT_NA))
    }

    /// Precipitation-like amount: missing or zero prints as `0.0{unit}`.
    fn amount(self, key: &str, default_unit: &'static str) -> String {
        let unit = self.unit(key, default_unit);
        let sentinel = zero_sentinel(unit);
        self.settle(
            key,
            try_format_value(self.get(key), unit, Some(DEFAULT_PRECISION), &sentinel),
        )
    }

    fn direction(self, key: &str) -> String {
        let label = self.settle(key, try_cardinal(self.get(key), DEFAULT_NA));
        format!("{label} ({})", self.measure(key, "°", Some(0)))
    }

    fn condition(self) -> String {
        self.settle("weather_code", try_weather_code(self.get("weather_code"), DEFAULT_NA))
    }

    fn timestamp(self, key: &str, pattern: &str) -> String {
        self.settle(key, try_format_timestamp(self.text(key).as_deref(), pattern, DEFAULT_NA))
    }

    fn duration(self, key: &str) -> String {
        self.settle(key, try_duration(self.get(key), DEFAULT_NA))
    }

    fn visibility(self, key: &str) -> String {
        let unit = self.unit(key, "m");
        self.settle(key, try_visibility(self.get(key), unit, DEFAULT_NA))
    }

    fn day_night(self) -> &'static str {
        match self.get("is_day").and_then(as_number) {
            Some(n) if n == 1.0 => DAY_MARKER,
            Some(n) if n == 0.0 => NIGHT_MARKER,
            _ => DEFAULT_NA,
        }
    }

    /// Snow depth, in centimeters when a sub-meter depth is reported in meters.
    fn snow_depth(self) -> String {
        let key = "snow_depth";
        let unit = self.unit(key, "m");
        match self.get(key).and_then(as_number) {
            Some(depth) if unit == "m" && depth < 1.0 => format!("{:.1}cm", depth * 100.0),
            _ => self.measure(key, "m", Some(2)),
        }
    }
}

fn precipitation(
    out: &mut Section,
    row: Row<'_>,
    total_key: &str,
    parts: &[(&str, &str, &'static str)],
) {
    out.field("Total Precipitation:", row.amount(total_key, "mm"));
    if !is_positive(row.get(total_key)) {
        return;
    }
    for &(label, key, unit) in parts {
        if is_positive(row.get(key)) {
            out.sub_field(label, row.measure(key, unit, Some(DEFAULT_PRECISION)));
        }
    }
}

fn wind(out: &mut Section, row: Row<'_>, speed: &str, direction: &str, gusts: &str) {
    out.field("Wind Speed:", row.measure(speed, "km/h", Some(DEFAULT_PRECISION)));
    out.field("Wind Direction:", row.direction(direction));
    if is_positive(row.get(gusts)) {
        out.field("Wind Gusts:", row.measure(gusts, "km/h", Some(DEFAULT_PRECISION)));
    }
}

fn sky(out: &mut Section, row: Row<'_>) {
    out.field("Cloud Cover:", row.measure("cloud_cover", "%", None));
    out.field("Pressure (MSL):", row.measure("pressure_msl", "hPa", Some(DEFAULT_PRECISION)));
    out.field(
        "Surface Pressure:",
        row.measure("surface_pressure", "hPa", Some(DEFAULT_PRECISION)),
    );
}

/// Renders forecast payloads as console text.
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    now: DateTime<Utc>,
}

impl ReportRenderer {
    /// `now` is consulted only when the payload does not say what the current time is.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// `now` as a wall-clock time at the forecast location, or on this machine when the
    /// payload carries no usable UTC offset.
    fn wall_clock(&self, utc_offset_seconds: Option<i32>) -> NaiveDateTime {
        match utc_offset_seconds.and_then(FixedOffset::east_opt) {
            Some(offset) => self.now.with_timezone(&offset).naive_local(),
            None => self.now.with_timezone(&Local).naive_local(),
        }
    }

    /// All three sections, in order.
    pub fn render(&self, payload: &ForecastPayload, place_name: &str) -> String {
        [
            self.render_current(&payload.current, place_name),
            self.render_daily(&payload.daily),
            self.render_hourly(
                &payload.hourly,
                payload.current_time(),
                payload.utc_offset_seconds,
            ),
        ]
        .concat()
    }

    pub fn render_current(&self, current: &ForecastBlock, place_name: &str) -> String {
        let mut out = Section::new(&format!("Current Weather in {place_name}"), MEDIUM_WIDTH, 23);
        if current.is_empty() {
            out.unavailable("No current weather data available.");
            return out.finish();
        }

        let row = Row::Snapshot(current);
        out.field("Time:", row.timestamp("time", FULL_DATETIME_FORMAT));
        out.field("Condition:", row.condition());
        out.field("Temperature:", row.measure("temperature_2m", "°C", Some(DEFAULT_PRECISION)));
        out.field(
            "Feels Like:",
            row.measure("apparent_temperature", "°C", Some(DEFAULT_PRECISION)),
        );
        out.field("Relative Humidity:", row.measure("relative_humidity_2m", "%", None));
        precipitation(&mut out, row, "precipitation", &PRECIP_PARTS);
        wind(&mut out, row, "wind_speed_10m", "wind_direction_10m", "wind_gusts_10m");
        sky(&mut out, row);
        out.field("Day/Night:", row.day_night());

        out.finish()
    }

    pub fn render_daily(&self, daily: &ForecastBlock) -> String {
        let mut out = Section::new("Daily Forecast", MEDIUM_WIDTH, 25).indented();
        let times = daily.times();
        if times.is_empty() {
            out.unavailable("No daily forecast data available.");
            return out.finish();
        }

        for index in 0..times.len() {
            let row = Row::Series { block: daily, index };
            let date = row.settle("time", try_format_daily_date(row.text("time").as_deref(), DEFAULT_NA));
            out.push(format!("{DATE_MARKER} {date}:"));
            render_day(&mut out, row);

            if index + 1 < times.len() {
                out.separator();
            }
        }

        out.finish()
    }

    /// Hourly records for the rest of the day relative to `now`.
    pub fn render_hourly(
        &self,
        hourly: &ForecastBlock,
        now: Option<&str>,
        utc_offset_seconds: Option<i32>,
    ) -> String {
        let mut out = Section::new("Hourly Forecast (Rest of the day)", LONG_WIDTH, 28).indented();
        let times = hourly.times();
        if times.is_empty() {
            out.unavailable("No hourly forecast data available.");
            return out.finish();
        }

        let window = HourlyWindow::select(now, times, self.wall_clock(utc_offset_seconds));
        if window.is_empty() {
            out.centered("No further hourly data available for today.");
            return out.finish();
        }

        for (position, &index) in window.indices.iter().enumerate() {
            if position > 0 {
                out.separator();
            }
            let row = Row::Series { block: hourly, index };
            out.push(format!("{HOUR_MARKER} {}:", row.timestamp("time", TIME_ONLY_FORMAT)));
            render_hour(&mut out, row);
        }

        out.finish()
    }
}

fn render_day(out: &mut Section, row: Row<'_>) {
    let prec = Some(DEFAULT_PRECISION);

    out.field("Condition:", row.condition());
    out.field("Max Temp:", row.measure("temperature_2m_max", "°C", prec));
    out.field("Min Temp:", row.measure("temperature_2m_min", "°C", prec));
    precipitation(out, row, "precipitation_sum", &DAILY_PRECIP_PARTS);
    out.field("Precip. Probability:", row.measure("precipitation_probability_max", "%", None));
    out.field("Precip. Hours:", row.measure("precipitation_hours", "h", prec));
    out.field(
        "Sunrise:",
        format!("{} {SUNRISE_MARKER}", row.timestamp("sunrise", TIME_ONLY_FORMAT)),
    );
    out.field(
        "Sunset:",
        format!("{} {SUNSET_MARKER}", row.timestamp("sunset", TIME_ONLY_FORMAT)),
    );
    out.field("Daylight:", row.duration("daylight_duration"));
    out.field("Sunshine:", row.duration("sunshine_duration"));
    out.field("Max UV Index:", row.measure("uv_index_max", "", prec));
    wind(out, row, "wind_speed_10m_max", "wind_direction_10m_dominant", "wind_gusts_10m_max");
    out.field("Mean Dew Point:", row.measure("dew_point_2m_mean", "°C", prec));
    out.field("Mean Visibility:", row.visibility("visibility_mean"));
}

fn render_hour(out: &mut Section, row: Row<'_>) {
    let prec = Some(DEFAULT_PRECISION);

    out.field("Condition:", row.condition());
    out.field("Temperature:", row.measure("temperature_2m", "°C", prec));
    out.field("Feels Like:", row.measure("apparent_temperature", "°C", prec));
    out.field("Dew Point:", row.measure("dew_point_2m", "°C", prec));
    out.field("Wet-Bulb Temp:", row.measure("wet_bulb_temperature_2m", "°C", prec));
    out.field("Relative Humidity:", row.measure("relative_humidity_2m", "%", None));
    out.field("Precip. Probability:", row.measure("precipitation_probability", "%", None));
    precipitation(out, row, "precipitation", &PRECIP_PARTS);
    out.field("Snow Depth:", row.snow_depth());
    out.field("Freezing Level:", row.measure("freezing_level_height", "m", Some(0)));
    out.field("Visibility:", row.visibility("visibility"));
    wind(out, row, "wind_speed_10m", "wind_direction_10m", "wind_gusts_10m");
    sky(out, row);
    out.field("UV Index:", row.measure("uv_index", "", prec));
    out.field("Day/Night:", row.day_night());
    if is_positive(row.get("evapotranspiration")) {
        out.field("Evapotranspiration:", row.measure("evapotranspiration", "mm", Some(2)));
    }
    if let Some(seconds) = row.get("sunshine_duration").and_then(as_number).filter(|s| *s > 0.0) {
        out.field("Sunshine (last hr):", format!("{:.2} hours", seconds / 3600.0));
    }
}
