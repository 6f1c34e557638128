//! # Road Matcher
//!
//! Match a recorded GPS track against a road network and total the distance
//! and time spent on each type of road.
//!
//! This library provides:
//! - Road network sanitization from GeoJSON features (or OSM XML)
//! - Nearest-road lookup using point-to-segment distance
//! - Road name classification through a substring → label table
//! - Per-label distance/time aggregation over a track
//!
//! ## Features
//!
//! - **`parallel`** - Aggregate batches of tracks in parallel with rayon
//! - **`cli`** - Build the `road-matcher` command-line binary (default)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use road_matcher::{
//!     aggregate, build_road_network, AnalysisConfig, GpsPoint, RoadTypeMap, TrackPoint,
//! };
//!
//! let features = road_matcher::loading::parse_geojson(r#"{
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "id": "way/1",
//!         "properties": { "name": "Main Street" },
//!         "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 2.0]] }
//!     }]
//! }"#)
//! .unwrap();
//!
//! let network = build_road_network(&features);
//! let road_types: RoadTypeMap = [("Street", "residential")].into_iter().collect();
//!
//! let track = vec![
//!     TrackPoint::new(GpsPoint::new(0.0, 0.0), 0),
//!     TrackPoint::new(GpsPoint::new(1.0, 0.0), 1_000),
//! ];
//!
//! let stats = aggregate(&track, &network, &road_types, &AnalysisConfig::default()).unwrap();
//! assert_eq!(stats["residential"].distance, 1000);
//! assert_eq!(stats["residential"].time, 1000);
//! ```

use geo::Coord;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, RoadMatchError};

// Planar distance primitives
pub mod geometry;
pub use geometry::{distance_to_segment, planar_distance};

// Road network built from map features
pub mod network;
pub use network::{build_road_network, Road, RoadNetwork};

// Nearest-road lookup
pub mod matching;
pub use matching::find_nearest_road;

// Road name → road type classification
pub mod classify;
pub use classify::{classify, RoadTypeMap};

// Per-road-type distance/time totals
pub mod aggregate;
pub use aggregate::{
    aggregate, aggregate_many, AnalysisConfig, RoadStats, RouteStats, TimestampPolicy,
};

// File loaders (GPX tracks, GeoJSON/OSM maps, road-type maps)
pub mod loading;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude in decimal degrees.
///
/// Converts into a [`geo::Coord`] with `x = longitude` and `y = latitude`.
///
/// # Example
/// ```
/// use road_matcher::GpsPoint;
/// let on_road = GpsPoint::new(0.001, 0.0);
/// let coord: geo::Coord<f64> = on_road.into();
/// assert_eq!((coord.x, coord.y), (0.0, 0.001));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl From<GpsPoint> for Coord<f64> {
    fn from(p: GpsPoint) -> Self {
        Coord {
            x: p.longitude,
            y: p.latitude,
        }
    }
}

impl From<Coord<f64>> for GpsPoint {
    fn from(c: Coord<f64>) -> Self {
        GpsPoint::new(c.y, c.x)
    }
}

/// One recorded position of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub position: GpsPoint,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

impl TrackPoint {
    /// Create a track point from a position and a millisecond timestamp.
    pub fn new(position: GpsPoint, timestamp_ms: i64) -> Self {
        Self {
            position,
            timestamp_ms,
        }
    }

    /// Create a track point from a position and an instant, truncated to milliseconds.
    pub fn at(position: GpsPoint, time: time::OffsetDateTime) -> Self {
        let millis = time.unix_timestamp_nanos().div_euclid(1_000_000);
        Self::new(position, millis as i64)
    }
}

/// Bounding box in degrees, as covered by a road network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Grow these bounds to also cover `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lng: self.min_lng.min(other.min_lng),
            max_lng: self.max_lng.max(other.max_lng),
        }
    }

    /// Whether `point` lies inside (or on the edge of) the bounds.
    pub fn contains(&self, point: &GpsPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
    }
}

impl From<geo::Rect<f64>> for Bounds {
    fn from(rect: geo::Rect<f64>) -> Self {
        Bounds {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lng: rect.min().x,
            max_lng: rect.max().x,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(52.52, 13.40).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_coord_conversion_keeps_axis_order() {
        let coord: Coord<f64> = GpsPoint::new(52.52, 13.40).into();
        assert_eq!(coord.x, 13.40);
        assert_eq!(coord.y, 52.52);
        assert_eq!(GpsPoint::from(coord), GpsPoint::new(52.52, 13.40));
    }

    #[test]
    fn test_track_point_from_datetime() {
        // 2021-05-01T10:00:01.250Z
        let time = time::OffsetDateTime::from_unix_timestamp(1_619_863_201).unwrap()
            + time::Duration::milliseconds(250);
        let tp = TrackPoint::at(GpsPoint::new(0.0, 0.0), time);
        assert_eq!(tp.timestamp_ms, 1_619_863_201_250);
    }

    #[test]
    fn test_bounds_from_rect_and_union() {
        let rect = geo::Rect::new(
            geo::coord! { x: -0.13, y: 51.49 },
            geo::coord! { x: -0.10, y: 51.52 },
        );
        let bounds = Bounds::from(rect);
        assert_eq!(bounds.min_lat, 51.49);
        assert_eq!(bounds.max_lng, -0.10);
        assert!(bounds.contains(&GpsPoint::new(51.50, -0.11)));
        assert!(!bounds.contains(&GpsPoint::new(51.60, -0.11)));

        let other = Bounds {
            min_lat: 52.0,
            max_lat: 52.0,
            min_lng: 0.5,
            max_lng: 0.5,
        };
        let merged = bounds.union(&other);
        assert_eq!(merged.max_lat, 52.0);
        assert_eq!(merged.min_lng, -0.13);
        assert_eq!(merged.max_lng, 0.5);
    }
}
