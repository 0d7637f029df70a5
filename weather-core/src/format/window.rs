use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::format::timestamp::{Timestamp, parse_timestamp};
use crate::format::units::raw_text;

/// Records shown when there is no usable reference time.
pub const FALLBACK_MAX_RECORDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Records in `[now, end)`, where `end` is the next midnight after `now`.
    RestOfDay { now: Timestamp, end: Timestamp },
    /// Reference time unavailable: a positional cap of [`FALLBACK_MAX_RECORDS`].
    Capped,
}

/// Indices of the hourly records to display, in payload order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyWindow {
    pub mode: WindowMode,
    pub indices: Vec<usize>,
}

impl HourlyWindow {
    /// Pick the hourly records to show.
    ///
    /// `now` is the `time` of the current-conditions block. `wall_clock` is the current
    /// time at the forecast location, only consulted when `now` is unusable to find where
    /// the capped window starts.
    pub fn select(now: Option<&str>, times: &[Value], wall_clock: NaiveDateTime) -> Self {
        match now.map(parse_timestamp) {
            Some(Ok(now)) => Self::rest_of_day(now, times),
            Some(Err(err)) => {
                tracing::warn!(%err, "Could not parse current time for hourly filtering. Showing limited forecast.");
                Self::capped(times, wall_clock)
            }
            None => {
                tracing::warn!("No current time available for hourly filtering. Showing limited forecast.");
                Self::capped(times, wall_clock)
            }
        }
    }

    /// Records in `[now, end)`. Records at or past `end` are skipped while nothing has been
    /// selected yet, so a day with no hours left yields an empty window.
    fn rest_of_day(now: Timestamp, times: &[Value]) -> Self {
        let end = now.start_of_next_day();
        let mut indices = Vec::new();

        for (index, entry) in times.iter().enumerate() {
            let Some(ts) = parse_entry(index, entry) else {
                continue;
            };

            let (since_now, until_end) = match (ts.try_cmp(&now), ts.try_cmp(&end)) {
                (Ok(a), Ok(b)) => (a, b),
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(index, %err, "Skipping hourly record");
                    continue;
                }
            };

            if since_now == Ordering::Less {
                continue;
            }
            if until_end != Ordering::Less {
                if indices.is_empty() {
                    continue;
                }
                break;
            }
            indices.push(index);
        }

        Self { mode: WindowMode::RestOfDay { now, end }, indices }
    }

    fn capped(times: &[Value], wall_clock: NaiveDateTime) -> Self {
        let parsed: Vec<(usize, Timestamp)> = times
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| parse_entry(index, entry).map(|ts| (index, ts)))
            .collect();

        let start = parsed
            .iter()
            .position(|(_, ts)| ts.local() >= wall_clock)
            .unwrap_or(0);

        let indices = parsed[start..]
            .iter()
            .take(FALLBACK_MAX_RECORDS)
            .map(|(index, _)| *index)
            .collect();

        Self { mode: WindowMode::Capped, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn parse_entry(index: usize, entry: &Value) -> Option<Timestamp> {
    let parsed = match entry.as_str() {
        Some(raw) => parse_timestamp(raw),
        None => parse_timestamp(&raw_text(entry)),
    };

    parsed
        .map_err(|err| tracing::warn!(index, %err, "Error processing data for hourly index"))
        .ok()
}
