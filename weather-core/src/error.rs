use thiserror::Error;

/// A field that could not be normalized.
///
/// Every variant carries the text that should be shown in its place, so callers can log
/// the error and still print something sensible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("value `{raw}` is not numeric")]
    NotNumeric { raw: String, fallback: String },

    #[error("timestamp `{raw}` could not be parsed")]
    BadTimestamp { raw: String, fallback: String },

    #[error("cannot compare offset-aware `{aware}` with naive `{naive}`")]
    MixedOffsets { aware: String, naive: String },
}

impl FormatError {
    pub(crate) fn not_numeric(raw: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self::NotNumeric { raw: raw.into(), fallback: fallback.into() }
    }

    pub(crate) fn bad_timestamp(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::BadTimestamp { fallback: raw.clone(), raw }
    }

    /// Text to display instead of the value that failed.
    pub fn into_fallback(self) -> String {
        match self {
            Self::NotNumeric { fallback, .. } | Self::BadTimestamp { fallback, .. } => fallback,
            Self::MixedOffsets { aware, .. } => aware,
        }
    }
}

/// Failures detected before or while resolving a place name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("City name cannot be empty.")]
    EmptyCity,

    #[error(
        "No API key configured for the geocoding service.\n\
         Hint: set OPENWEATHERMAP_API_KEY or run `weather configure`."
    )]
    MissingApiKey,

    #[error("City '{0}' not found or no data returned by geocoding API.")]
    PlaceNotFound(String),

    #[error("Invalid response from geocoding API for '{0}' (missing lat/lon).")]
    MissingCoordinates(String),
}
