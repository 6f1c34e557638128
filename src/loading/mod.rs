//! File loaders.
//!
//! These turn files on disk into the inputs the core works on: a track
//! (`Vec<TrackPoint>`), a feature collection for [`crate::build_road_network`],
//! and an optional [`RoadTypeMap`]. No other module touches the filesystem.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use log::info;

use crate::error::{RoadMatchError, Result};
use crate::{aggregate, AnalysisConfig, RoadTypeMap, RouteStats};

pub mod gpx;
pub mod map;
pub mod osm;

pub use self::gpx::{load_track, load_track_file};
pub use self::map::{load_map_file, load_road_network_file, MapFormat};
pub use self::osm::osm_to_features;

/// Parse GeoJSON text into a feature collection.
///
/// A lone `Feature` is wrapped into a one-element collection. A bare geometry
/// carries no id or name, so it cannot describe roads and is rejected.
pub fn parse_geojson(text: &str) -> Result<FeatureCollection> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(feature) => Ok(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        GeoJson::Geometry(_) => Err(RoadMatchError::InvalidNetwork {
            message: "GeoJSON map must be a FeatureCollection or a Feature".to_string(),
        }),
    }
}

/// Read a road-type map from a flat JSON object of string values.
pub fn load_road_type_map<R: Read>(reader: R) -> Result<RoadTypeMap> {
    serde_json::from_reader(reader).map_err(|e| RoadMatchError::Config {
        message: format!("invalid road type map: {}", e),
    })
}

/// Read a road-type map from a JSON file.
pub fn load_road_type_map_file(path: impl AsRef<Path>) -> Result<RoadTypeMap> {
    let file = File::open(path.as_ref())?;
    let map = load_road_type_map(BufReader::new(file))?;
    info!(
        "[Loading] Road type map {} with {} entries",
        path.as_ref().display(),
        map.len()
    );
    Ok(map)
}

/// Load a GPX track, a map file and an optional road-type map, then aggregate.
pub fn analyze_files(
    track_path: impl AsRef<Path>,
    map_path: impl AsRef<Path>,
    road_type_map_path: Option<&Path>,
    config: &AnalysisConfig,
) -> Result<RouteStats> {
    let network = load_road_network_file(map_path)?;
    let track = load_track_file(track_path)?;
    let road_type_map = match road_type_map_path {
        Some(path) => load_road_type_map_file(path)?,
        None => RoadTypeMap::default(),
    };

    aggregate(&track, &network, &road_type_map, config)
}
