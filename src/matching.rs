//! Nearest-road lookup.
//!
//! Every segment of every road is scanned, so a query costs O(total segments).
//! That is fine for one recorded route against a regional extract. A spatial
//! index would only have to reproduce the tie-break below to be a drop-in
//! replacement.

use geo::Coord;

use crate::error::{OptionExt, Result};
use crate::geometry::distance_to_segment;
use crate::{GpsPoint, Road, RoadNetwork};

/// Closest road to a point, together with the winning segment.
#[derive(Debug, Clone, Copy)]
pub struct NearestRoad<'a> {
    pub road: &'a Road,
    /// Index of the closest segment within the road's polyline
    pub segment_index: usize,
    /// Planar distance to that segment, in degrees
    pub distance: f64,
}

/// Find the road whose closest segment is nearest to `point`.
///
/// Roads are visited in network order and segments in polyline order. Only a
/// strictly smaller distance replaces the current best, so on ties the first
/// pair visited wins.
///
/// Returns [`crate::RoadMatchError::NoRoadsAvailable`] for an empty network.
pub fn nearest_road(point: GpsPoint, network: &RoadNetwork) -> Result<NearestRoad<'_>> {
    let p: Coord<f64> = point.into();
    let mut best: Option<NearestRoad<'_>> = None;

    for road in network.roads() {
        for (segment_index, segment) in road.segments().enumerate() {
            let distance = distance_to_segment(p, segment.start, segment.end);
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(NearestRoad {
                    road,
                    segment_index,
                    distance,
                });
            }
        }
    }

    best.ok_or_no_roads()
}

/// Name of the road nearest to `point`.
///
/// # Example
/// ```
/// use geo::line_string;
/// use road_matcher::{find_nearest_road, GpsPoint, Road, RoadNetwork};
///
/// let network = RoadNetwork::from_roads(vec![
///     Road::new("High Street", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]).unwrap(),
///     Road::new("Low Street", line_string![(x: 0.0, y: 5.0), (x: 1.0, y: 5.0)]).unwrap(),
/// ]);
///
/// let name = find_nearest_road(GpsPoint::new(0.5, 0.5), &network).unwrap();
/// assert_eq!(name, "High Street");
/// ```
pub fn find_nearest_road(point: GpsPoint, network: &RoadNetwork) -> Result<&str> {
    nearest_road(point, network).map(|n| n.road.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoadMatchError;
    use geo::line_string;

    fn road(name: &str, line: geo::LineString<f64>) -> Road {
        Road::new(name, line).unwrap()
    }

    #[test]
    fn test_parallel_roads_pick_closer_regardless_of_order() {
        let far = road("Far Road", line_string![(x: -5.0, y: 10.0), (x: 5.0, y: 10.0)]);
        let near = road("Near Road", line_string![(x: -5.0, y: 1.0), (x: 5.0, y: 1.0)]);
        let point = GpsPoint::new(0.0, 0.0);

        let network = RoadNetwork::from_roads(vec![far.clone(), near.clone()]);
        assert_eq!(find_nearest_road(point, &network).unwrap(), "Near Road");

        let network = RoadNetwork::from_roads(vec![near, far]);
        assert_eq!(find_nearest_road(point, &network).unwrap(), "Near Road");
    }

    #[test]
    fn test_considers_every_segment() {
        // The second segment of the zigzag passes right by the point
        let zigzag = road(
            "Zigzag",
            line_string![(x: 0.0, y: 5.0), (x: 2.0, y: 0.1), (x: 4.0, y: 5.0)],
        );
        let straight = road("Straight", line_string![(x: 0.0, y: 1.0), (x: 1.0, y: 1.0)]);
        let network = RoadNetwork::from_roads(vec![straight, zigzag]);

        let nearest = nearest_road(GpsPoint::new(1.0, 2.5), &network).unwrap();
        assert_eq!(nearest.road.name(), "Zigzag");
        assert_eq!(nearest.segment_index, 1);
    }

    #[test]
    fn test_tie_goes_to_first_road() {
        let west = road("West", line_string![(x: -1.0, y: -1.0), (x: -1.0, y: 1.0)]);
        let east = road("East", line_string![(x: 1.0, y: -1.0), (x: 1.0, y: 1.0)]);
        let point = GpsPoint::new(0.0, 0.0);

        let network = RoadNetwork::from_roads(vec![west.clone(), east.clone()]);
        assert_eq!(find_nearest_road(point, &network).unwrap(), "West");

        let network = RoadNetwork::from_roads(vec![east, west]);
        assert_eq!(find_nearest_road(point, &network).unwrap(), "East");
    }

    #[test]
    fn test_tie_within_road_keeps_first_segment() {
        // Point sits at the shared vertex: both segments are at distance 0
        let bend = road("Bend", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)]);
        let network = RoadNetwork::from_roads(vec![bend]);

        let nearest = nearest_road(GpsPoint::new(0.0, 1.0), &network).unwrap();
        assert_eq!(nearest.segment_index, 0);
        assert_eq!(nearest.distance, 0.0);
    }

    #[test]
    fn test_empty_network() {
        let network = RoadNetwork::default();
        let result = find_nearest_road(GpsPoint::new(0.0, 0.0), &network);
        assert!(matches!(result, Err(RoadMatchError::NoRoadsAvailable)));
    }
}
