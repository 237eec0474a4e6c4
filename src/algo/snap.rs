//! Snapping a free-form position onto the nearest road path.

use log::trace;

use crate::model::geometry::project_onto_segment;
use crate::model::{Path, SpatialPoint};

/// Projects `point` onto the globally closest path segment, if the minimum
/// squared distance is within `threshold` (degrees) squared; otherwise
/// returns the input unchanged. Pure function; degenerate segments are
/// skipped.
///
/// Intended for live position updates only. First-fix placement must not go
/// through here, so an out-of-range reading is not silently relocated onto
/// a distant road.
pub fn snap_to_paths(point: SpatialPoint, paths: &[Path], threshold: f64) -> SpatialPoint {
    let Some((candidate, distance_sq)) = nearest_on_paths(point, paths) else {
        return point;
    };
    if distance_sq < threshold * threshold {
        trace!(
            "Snapped ({}, {}) to ({}, {})",
            point.lat, point.lon, candidate.lat, candidate.lon
        );
        candidate
    } else {
        point
    }
}

/// Globally closest on-path point across all segments of all paths, with
/// its squared distance. Ties keep the first minimum found.
fn nearest_on_paths(point: SpatialPoint, paths: &[Path]) -> Option<(SpatialPoint, f64)> {
    paths
        .iter()
        .flat_map(Path::segments)
        .filter_map(|(a, b)| project_onto_segment(point, a, b))
        .fold(None, |best, proj| match best {
            Some((_, best_d)) if best_d <= proj.distance_sq => best,
            _ => Some((proj.closest, proj.distance_sq)),
        })
}
