//! Per-road-type distance and time totals for a track.
//!
//! Each pair of consecutive track points forms one segment. The segment is
//! attributed to the road nearest its end point, that road's name is
//! classified into a label, and the segment's distance and duration are added
//! to the label's totals.
//!
//! ## Units
//! Distances are planar distances in degrees scaled by
//! [`AnalysisConfig::meters_per_unit`] (1000 by default). This is the same
//! coarse approximation the output format has always used; it is not a
//! geodesic distance. Scaling and rounding happen once per label, after all
//! segments are summed.
//!
//! ## Example
//! ```rust
//! use geo::line_string;
//! use road_matcher::{aggregate, AnalysisConfig, GpsPoint, Road, RoadNetwork, RoadTypeMap, TrackPoint};
//!
//! let network = RoadNetwork::from_roads(vec![
//!     Road::new("A", line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 2.0)]).unwrap(),
//! ]);
//! let track = vec![
//!     TrackPoint::new(GpsPoint::new(0.0, 0.0), 0),
//!     TrackPoint::new(GpsPoint::new(1.0, 0.0), 1_000),
//!     TrackPoint::new(GpsPoint::new(2.0, 0.0), 3_000),
//! ];
//!
//! let stats = aggregate(&track, &network, &RoadTypeMap::default(), &AnalysisConfig::default()).unwrap();
//! assert_eq!(stats["A"].distance, 2000);
//! assert_eq!(stats["A"].time, 3000);
//! ```

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{RoadMatchError, Result};
use crate::geometry::planar_distance;
use crate::{classify, find_nearest_road, RoadNetwork, RoadTypeMap, TrackPoint};

/// What to do with a segment whose end timestamp is before its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Log a warning and leave the segment out of the totals entirely
    #[default]
    SkipSegment,
    /// Fail with [`RoadMatchError::MalformedTrack`]
    Strict,
}

/// Configuration for route aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Factor applied to summed planar distances (degrees) to get meters.
    /// Default: 1000.0
    pub meters_per_unit: f64,

    /// Handling of segments that go backwards in time.
    /// Default: skip the segment
    pub timestamp_policy: TimestampPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            meters_per_unit: 1000.0,
            timestamp_policy: TimestampPolicy::SkipSegment,
        }
    }
}

/// Totals for one road-type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoadStats {
    /// Distance in meters
    pub distance: u64,
    /// Elapsed time in milliseconds
    pub time: u64,
}

/// Road-type label → totals. Serializes as a JSON object ordered by label.
pub type RouteStats = BTreeMap<String, RoadStats>;

/// Unrounded running totals for one label.
#[derive(Debug, Default)]
struct Accumulator {
    /// Sum of planar segment lengths, in degrees
    distance: f64,
    time: u64,
}

/// Fold a track into per-label distance and time totals.
///
/// # Errors
/// - [`RoadMatchError::MalformedTrack`] if the track has no points, if a point
///   has a non-finite or out-of-range coordinate, or if a timestamp goes
///   backwards under [`TimestampPolicy::Strict`]
/// - [`RoadMatchError::InvalidNetwork`] if the network has no roads
/// - [`RoadMatchError::Config`] if `meters_per_unit` is not a positive finite number
///
/// Per-label time saturates at `u64::MAX` milliseconds.
///
/// A single-point track has no segments and yields empty stats.
pub fn aggregate(
    track: &[TrackPoint],
    network: &RoadNetwork,
    road_type_map: &RoadTypeMap,
    config: &AnalysisConfig,
) -> Result<RouteStats> {
    if track.is_empty() {
        return Err(RoadMatchError::MalformedTrack {
            index: 0,
            message: "track has no points".to_string(),
        });
    }
    if network.is_empty() {
        return Err(RoadMatchError::InvalidNetwork {
            message: "no named road polylines to match against".to_string(),
        });
    }
    if !config.meters_per_unit.is_finite() || config.meters_per_unit <= 0.0 {
        return Err(RoadMatchError::Config {
            message: format!(
                "meters_per_unit must be a positive number, got {}",
                config.meters_per_unit
            ),
        });
    }
    if let Some(index) = track.iter().position(|p| !p.position.is_valid()) {
        let p = track[index].position;
        return Err(RoadMatchError::MalformedTrack {
            index,
            message: format!("invalid coordinate ({}, {})", p.latitude, p.longitude),
        });
    }

    let bounds = network.bounds();
    let mut totals: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut outside_map = 0usize;

    for (i, pair) in track.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        let index = i + 1;

        let time_delta = curr.timestamp_ms.abs_diff(prev.timestamp_ms);
        if curr.timestamp_ms < prev.timestamp_ms {
            match config.timestamp_policy {
                TimestampPolicy::Strict => {
                    return Err(RoadMatchError::MalformedTrack {
                        index,
                        message: format!("timestamp goes back by {} ms", time_delta),
                    });
                }
                TimestampPolicy::SkipSegment => {
                    warn!(
                        "[Aggregate] Skipping segment ending at point {}: timestamp goes back by {} ms",
                        index, time_delta
                    );
                    skipped += 1;
                    continue;
                }
            }
        }

        if bounds.is_some_and(|b| !b.contains(&curr.position)) {
            outside_map += 1;
        }

        let road = find_nearest_road(curr.position, network)?;
        let label = classify(road, road_type_map);
        let distance_delta = planar_distance(prev.position.into(), curr.position.into());

        let acc = totals.entry(label.to_string()).or_default();
        acc.distance += distance_delta;
        acc.time = acc.time.saturating_add(time_delta);
    }

    if outside_map > 0 {
        warn!(
            "[Aggregate] {} of {} track points lie outside the road network bounds",
            outside_map,
            track.len() - 1
        );
    }
    debug!(
        "[Aggregate] {} segments folded into {} labels ({} skipped)",
        track.len() - 1 - skipped,
        totals.len(),
        skipped
    );

    Ok(totals
        .into_iter()
        .map(|(label, acc)| {
            let stats = RoadStats {
                distance: (acc.distance * config.meters_per_unit).round() as u64,
                time: acc.time,
            };
            (label, stats)
        })
        .collect())
}

/// Aggregate several independent tracks against the same network.
///
/// Results are returned in input order, one per track. With the `parallel`
/// feature the tracks are processed on the rayon thread pool; the network and
/// road-type map are only read, so they are shared without locking.
pub fn aggregate_many<T>(
    tracks: &[T],
    network: &RoadNetwork,
    road_type_map: &RoadTypeMap,
    config: &AnalysisConfig,
) -> Vec<Result<RouteStats>>
where
    T: AsRef<[TrackPoint]> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        info!("[Aggregate] Processing {} tracks in parallel", tracks.len());
        tracks
            .par_iter()
            .map(|track| aggregate(track.as_ref(), network, road_type_map, config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        info!("[Aggregate] Processing {} tracks sequentially", tracks.len());
        tracks
            .iter()
            .map(|track| aggregate(track.as_ref(), network, road_type_map, config))
            .collect()
    }
}
