//! Spatial primitives shared by every component, and the segment projection
//! math that both snapping and graph construction rely on.
//!
//! All coordinates are raw WGS84 degrees. Distances are compared in degree
//! space, which is acceptable at the neighborhood scale this engine operates
//! on; meter-denominated tunables are converted with the flat-earth constant
//! below.

use geo::Point;
use serde::{Deserialize, Serialize};

/// Meters covered by one degree of latitude (flat-earth approximation).
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// A plain geographic coordinate in degrees. On the wire it is a
/// `[lat, lon]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct SpatialPoint {
    pub lat: f64,
    pub lon: f64,
}

impl SpatialPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared distance to `other` in degrees².
    pub fn distance_sq(&self, other: SpatialPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    pub fn geometry(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<[f64; 2]> for SpatialPoint {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<SpatialPoint> for [f64; 2] {
    fn from(point: SpatialPoint) -> Self {
        [point.lat, point.lon]
    }
}

/// A road intersection point supplied by the geometry source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Junction {
    pub lat: f64,
    pub lon: f64,
}

impl Junction {
    pub fn point(&self) -> SpatialPoint {
        SpatialPoint::new(self.lat, self.lon)
    }
}

/// A point strung along a road between junctions, with an opaque id the
/// geometry source may reference from paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn point(&self) -> SpatialPoint {
        SpatialPoint::new(self.lat, self.lon)
    }
}

/// The polyline of one road segment between two junctions. `waypoint_ids`,
/// when present, is the authoritative ordered list of waypoints lying on
/// this path; when absent the builder falls back to geometric detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub start: SpatialPoint,
    pub end: SpatialPoint,
    pub path: Vec<SpatialPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoint_ids: Option<Vec<String>>,
}

impl Path {
    /// A path needs at least one segment to contribute anything.
    pub fn is_degenerate(&self) -> bool {
        self.path.len() < 2
    }

    /// Consecutive vertex pairs of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = (SpatialPoint, SpatialPoint)> + '_ {
        self.path.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Great-circle length of the polyline in meters.
    pub fn length_meters(&self) -> f64 {
        self.segments()
            .map(|(a, b)| haversine_distance(a, b))
            .sum()
    }
}

/// Result of projecting a query point onto one path segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentProjection {
    /// Closest point on the segment.
    pub closest: SpatialPoint,
    /// Clamped projection parameter, in `[0, 1]`.
    pub t: f64,
    /// Squared distance from the query point, in degrees².
    pub distance_sq: f64,
}

/// Closest point on segment `a`-`b` to `point`, via scalar projection
/// clamped to the segment (never extrapolating past an endpoint).
/// Returns `None` for a degenerate (zero-length) segment.
pub fn project_onto_segment(
    point: SpatialPoint,
    a: SpatialPoint,
    b: SpatialPoint,
) -> Option<SegmentProjection> {
    let dlat = b.lat - a.lat;
    let dlon = b.lon - a.lon;
    let length_sq = dlat * dlat + dlon * dlon;
    if length_sq == 0.0 {
        return None;
    }

    let t = (((point.lat - a.lat) * dlat + (point.lon - a.lon) * dlon) / length_sq).clamp(0.0, 1.0);
    let closest = SpatialPoint::new(a.lat + t * dlat, a.lon + t * dlon);
    Some(SegmentProjection {
        closest,
        t,
        distance_sq: point.distance_sq(closest),
    })
}

/// Great-circle distance between two points in meters.
pub fn haversine_distance(a: SpatialPoint, b: SpatialPoint) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}
