//! Unified error handling for the road-matcher library.
//!
//! Core operations (network building, nearest-road lookup, aggregation) only
//! produce the first three variants. The rest wrap failures from the loading
//! layer so callers can use a single `Result` type end to end.

use thiserror::Error;

/// Unified error type for road-matcher operations.
#[derive(Debug, Error)]
pub enum RoadMatchError {
    /// Road network has no usable roads after sanitization
    #[error("Invalid road network: {message}")]
    InvalidNetwork { message: String },

    /// Nearest-road lookup was asked to search an empty network
    #[error("No roads available for nearest-road lookup")]
    NoRoadsAvailable,

    /// Track is empty, lacks a timestamp, or goes backwards in time
    #[error("Malformed track at point {index}: {message}")]
    MalformedTrack { index: usize, message: String },

    /// Map file extension is not one we can read
    #[error("Unsupported map format '{extension}', expected .geojson or .osm")]
    UnsupportedMapFormat { extension: String },

    /// Configuration error (road-type map, options)
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPX parse error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OSM XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Result type alias for road-matcher operations.
pub type Result<T> = std::result::Result<T, RoadMatchError>;

/// Extension trait for converting Option to RoadMatchError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a malformed track error at `index`.
    fn ok_or_malformed_track(self, index: usize, message: &str) -> Result<T>;

    /// Convert Option to Result with a no-roads error.
    fn ok_or_no_roads(self) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_malformed_track(self, index: usize, message: &str) -> Result<T> {
        self.ok_or_else(|| RoadMatchError::MalformedTrack {
            index,
            message: message.to_string(),
        })
    }

    fn ok_or_no_roads(self) -> Result<T> {
        self.ok_or(RoadMatchError::NoRoadsAvailable)
    }
}
