//! Road network built from raw map features.
//!
//! Map data arrives as an untyped GeoJSON feature collection (either a native
//! GeoJSON export or the output of [`crate::loading::osm_to_features`]). This
//! module validates it once and projects it into named [`Road`] polylines.
//! Nothing downstream looks at raw features again.

use geo::{BoundingRect, Coord, Line, LineString};
use geojson::{feature::Id, Feature, FeatureCollection, Value};
use log::{debug, info};

use crate::Bounds;

/// Identifier prefix that marks a feature as an OSM way.
const WAY_ID_PREFIX: &str = "way/";

/// A named road polyline with at least two points.
///
/// Coordinates are stored with `x = longitude` and `y = latitude`, in the
/// order they appeared in the source feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    name: String,
    line: LineString<f64>,
}

impl Road {
    /// Create a road from a name and its polyline.
    ///
    /// Returns `None` if the name is empty or the polyline has fewer than 2 points.
    pub fn new(name: impl Into<String>, line: LineString<f64>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() || line.0.len() < 2 {
            return None;
        }
        Some(Self { name, line })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    /// Straight segments between consecutive points, in polyline order.
    pub fn segments(&self) -> impl Iterator<Item = Line<f64>> + '_ {
        self.line.lines()
    }

    /// Bounding box of the polyline.
    pub fn bounds(&self) -> Option<Bounds> {
        self.line.bounding_rect().map(Bounds::from)
    }
}

/// Immutable collection of roads, kept in input order.
///
/// Input order is the traversal order used to break ties in
/// [`crate::find_nearest_road`].
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    roads: Vec<Road>,
    bounds: Option<Bounds>,
}

impl RoadNetwork {
    /// Build a network from already-validated roads.
    pub fn from_roads(roads: Vec<Road>) -> Self {
        let bounds = roads
            .iter()
            .filter_map(Road::bounds)
            .reduce(|acc, b| acc.union(&b));
        Self { roads, bounds }
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// Total number of segments across all roads.
    pub fn segment_count(&self) -> usize {
        self.roads.iter().map(|r| r.line.0.len() - 1).sum()
    }

    /// Bounding box covering every road, `None` for an empty network.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

/// Sanitize a feature collection into a [`RoadNetwork`].
///
/// A feature becomes a road only if its id is a string starting with `way/`,
/// its geometry is a `LineString` with at least two positions, and it has a
/// non-empty string `name` property. Everything else (nodes, relations,
/// polygons, unnamed ways) is dropped without error.
///
/// Positions are read as `[longitude, latitude, ...]`; extra dimensions such as
/// elevation are ignored.
pub fn build_road_network(collection: &FeatureCollection) -> RoadNetwork {
    let roads: Vec<Road> = collection.features.iter().filter_map(road_from_feature).collect();

    let dropped = collection.features.len() - roads.len();
    let network = RoadNetwork::from_roads(roads);
    info!(
        "[RoadNetwork] Built {} roads ({} segments) from {} features, {} dropped",
        network.len(),
        network.segment_count(),
        collection.features.len(),
        dropped
    );
    network
}

fn road_from_feature(feature: &Feature) -> Option<Road> {
    let is_way = matches!(&feature.id, Some(Id::String(id)) if id.starts_with(WAY_ID_PREFIX));
    if !is_way {
        return None;
    }

    let positions = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::LineString(positions)) => positions,
        _ => return None,
    };

    let name = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("name"))
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())?;

    let coords: Vec<Coord<f64>> = positions
        .iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| Coord {
            x: pos[0],
            y: pos[1],
        })
        .collect();

    let road = Road::new(name, LineString::new(coords));
    if road.is_none() {
        debug!(
            "[RoadNetwork] Skipping '{}': fewer than 2 usable positions",
            name
        );
    }
    road
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn parse(json: &str) -> FeatureCollection {
        crate::loading::parse_geojson(json).unwrap()
    }

    #[test]
    fn test_filters_non_road_features() {
        let collection = parse(
            r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature", "id": "way/1",
                    "properties": { "name": "Main Street", "highway": "primary" },
                    "geometry": { "type": "LineString", "coordinates": [[13.40, 52.52], [13.41, 52.53]] }
                },
                {
                    "type": "Feature", "id": "way/2",
                    "properties": { "highway": "service" },
                    "geometry": { "type": "LineString", "coordinates": [[13.40, 52.52], [13.42, 52.52]] }
                },
                {
                    "type": "Feature", "id": "node/3",
                    "properties": { "name": "Bus Stop" },
                    "geometry": { "type": "Point", "coordinates": [13.40, 52.52] }
                },
                {
                    "type": "Feature", "id": "way/4",
                    "properties": { "name": "City Park" },
                    "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }
                }
            ]
        }"#,
        );

        let network = build_road_network(&collection);
        assert_eq!(network.len(), 1);
        assert_eq!(network.roads()[0].name(), "Main Street");
    }

    #[test]
    fn test_keeps_coordinate_order() {
        let collection = parse(
            r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature", "id": "way/10",
                "properties": { "name": "High Road" },
                "geometry": { "type": "LineString", "coordinates": [[1.0, 2.0, 35.0], [3.0, 4.0], [5.0, 6.0]] }
            }]
        }"#,
        );

        let network = build_road_network(&collection);
        let road = &network.roads()[0];
        assert_eq!(road.line(), &line_string![(x: 1.0, y: 2.0), (x: 3.0, y: 4.0), (x: 5.0, y: 6.0)]);
        assert_eq!(road.segments().count(), 2);
        assert_eq!(network.segment_count(), 2);
    }

    #[test]
    fn test_rejects_ids_that_are_not_ways() {
        let collection = parse(
            r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature", "id": "relation/5",
                    "properties": { "name": "Ring Road" },
                    "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
                },
                {
                    "type": "Feature", "id": 6,
                    "properties": { "name": "Numbered Road" },
                    "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Anonymous Road" },
                    "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
                }
            ]
        }"#,
        );

        assert!(build_road_network(&collection).is_empty());
    }

    #[test]
    fn test_rejects_empty_name_and_short_lines() {
        let collection = parse(
            r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature", "id": "way/7",
                    "properties": { "name": "" },
                    "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
                },
                {
                    "type": "Feature", "id": "way/8",
                    "properties": { "name": 42 },
                    "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
                },
                {
                    "type": "Feature", "id": "way/9",
                    "properties": { "name": "Stub" },
                    "geometry": { "type": "LineString", "coordinates": [[0, 0]] }
                }
            ]
        }"#,
        );

        assert!(build_road_network(&collection).is_empty());
    }

    #[test]
    fn test_road_invariants() {
        assert!(Road::new("", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]).is_none());
        assert!(Road::new("Lonely Lane", line_string![(x: 0.0, y: 0.0)]).is_none());
        assert!(Road::new("Lane", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]).is_some());
    }

    #[test]
    fn test_network_bounds() {
        let network = RoadNetwork::from_roads(vec![
            Road::new("A", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 2.0)]).unwrap(),
            Road::new("B", line_string![(x: -1.0, y: 0.5), (x: 0.5, y: 3.0)]).unwrap(),
        ]);
        let bounds = network.bounds().unwrap();
        assert_eq!(bounds.min_lng, -1.0);
        assert_eq!(bounds.max_lng, 1.0);
        assert_eq!(bounds.min_lat, 0.0);
        assert_eq!(bounds.max_lat, 3.0);

        assert!(RoadNetwork::default().bounds().is_none());
    }
}
