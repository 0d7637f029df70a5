//! Normalization of raw forecast values into display text.
//!
//! Every public formatter comes in two flavours: a `try_` form returning
//! `Result<String, FormatError>` and an infallible form that substitutes the fallback text
//! carried by the error.

pub mod convert;
pub mod timestamp;
pub mod units;
pub mod window;

pub use convert::{cardinal, duration, visibility, weather_code};
pub use timestamp::{Timestamp, format_daily_date, format_time, format_timestamp, parse_timestamp};
pub use units::{DEFAULT_NA, DEFAULT_PRECISION, format_value};
pub use window::{HourlyWindow, WindowMode};
