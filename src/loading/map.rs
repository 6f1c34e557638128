//! Map file loading with format detection by extension.

use std::fs;
use std::path::Path;

use geojson::FeatureCollection;
use log::info;

use super::{osm_to_features, parse_geojson};
use crate::error::{RoadMatchError, Result};
use crate::{build_road_network, RoadNetwork};

/// Supported map file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// GeoJSON feature collection (`.geojson`, `.json`)
    GeoJson,
    /// OpenStreetMap XML (`.osm`)
    Osm,
}

impl MapFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "geojson" | "json" => Ok(MapFormat::GeoJson),
            "osm" => Ok(MapFormat::Osm),
            _ => Err(RoadMatchError::UnsupportedMapFormat { extension }),
        }
    }
}

/// Read a map file into a feature collection.
pub fn load_map_file(path: impl AsRef<Path>) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let format = MapFormat::from_path(path)?;
    let text = fs::read_to_string(path)?;

    let collection = match format {
        MapFormat::GeoJson => parse_geojson(&text)?,
        MapFormat::Osm => osm_to_features(&text)?,
    };
    info!(
        "[Loading] Map {} ({:?}) with {} features",
        path.display(),
        format,
        collection.features.len()
    );
    Ok(collection)
}

/// Read a map file and sanitize it into a road network.
pub fn load_road_network_file(path: impl AsRef<Path>) -> Result<RoadNetwork> {
    load_map_file(path).map(|collection| build_road_network(&collection))
}
