//! GPX track loading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use time::OffsetDateTime;

use crate::error::{OptionExt, RoadMatchError, Result};
use crate::{GpsPoint, TrackPoint};

/// Read every track point of a GPX document, in document order.
///
/// Points from all tracks and segments are concatenated. Waypoints and routes
/// are ignored. Every track point must carry a `<time>`; the first one that
/// does not is reported as [`RoadMatchError::MalformedTrack`] with its index.
pub fn load_track<R: Read>(reader: R) -> Result<Vec<TrackPoint>> {
    let gpx = ::gpx::read(reader)?;

    let waypoints = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points);

    let mut points = Vec::new();
    for (index, waypoint) in waypoints.enumerate() {
        let time = waypoint
            .time
            .ok_or_malformed_track(index, "track point has no timestamp")?;
        let position = waypoint.point();
        points.push(TrackPoint::at(
            GpsPoint::new(position.y(), position.x()),
            OffsetDateTime::from(time),
        ));
    }

    if points.is_empty() {
        return Err(RoadMatchError::MalformedTrack {
            index: 0,
            message: "GPX document contains no track points".to_string(),
        });
    }

    Ok(points)
}

/// Read a GPX track from a file.
pub fn load_track_file(path: impl AsRef<Path>) -> Result<Vec<TrackPoint>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let points = load_track(BufReader::new(file))?;
    info!(
        "[Loading] Track {} with {} points",
        path.display(),
        points.len()
    );
    Ok(points)
}
