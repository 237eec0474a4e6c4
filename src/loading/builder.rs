use std::cmp::Ordering;

use hashbrown::HashMap;
use itertools::Itertools;
use log::{info, warn};

use super::{GeometryBundle, NavConfig};
use crate::model::geometry::{SegmentProjection, project_onto_segment};
use crate::model::{NavGraph, Path, SpatialPoint, Waypoint};

/// Builds the connectivity graph from one geometry snapshot.
///
/// Every junction and waypoint maps to exactly one node (deduplicated by
/// the merge epsilon), and every usable path contributes a simple chain of
/// symmetric edges from its start node through its ordered on-path waypoint
/// nodes to its end node. Bad individual records are skipped; they never
/// fail the build.
pub fn build_navigation_graph(bundle: &GeometryBundle, config: &NavConfig) -> NavGraph {
    let mut graph = NavGraph::new(config.merge_epsilon_degrees());

    for junction in &bundle.junctions {
        graph.get_or_create(junction.point());
    }
    for waypoint in &bundle.waypoints {
        graph.get_or_create(waypoint.point());
    }

    let waypoints_by_id: HashMap<&str, SpatialPoint> = bundle
        .waypoints
        .iter()
        .map(|w| (w.id.as_str(), w.point()))
        .collect();

    let mut skipped = 0usize;
    let mut total_length_m = 0.0;
    for path in &bundle.paths {
        if path.is_degenerate() {
            warn!(
                "Skipping degenerate path with {} vertices near ({}, {})",
                path.path.len(),
                path.start.lat,
                path.start.lon
            );
            skipped += 1;
            continue;
        }
        chain_path(&mut graph, path, &bundle.waypoints, &waypoints_by_id, config);
        total_length_m += path.length_meters();
    }

    graph.seal();
    info!(
        "Built navigation graph: {} nodes, {} edges, {:.0} m of paths",
        graph.node_count(),
        graph.edge_count(),
        total_length_m
    );
    if skipped > 0 {
        warn!("Skipped {skipped} degenerate paths");
    }
    graph
}

/// Links one path as the chain `start – w1 – … – wk – end`.
fn chain_path(
    graph: &mut NavGraph,
    path: &Path,
    waypoints: &[Waypoint],
    waypoints_by_id: &HashMap<&str, SpatialPoint>,
    config: &NavConfig,
) {
    let start = graph.get_or_create(path.start);
    let end = graph.get_or_create(path.end);

    let on_path = match &path.waypoint_ids {
        Some(ids) => declared_waypoints(ids, waypoints_by_id),
        None => detect_waypoints(path, waypoints, config.on_path_threshold_degrees()),
    };
    let ordered = order_along_path(path, on_path);

    let mut prev = start;
    for point in ordered {
        let node = graph.get_or_create(point);
        // A waypoint coinciding with an endpoint resolves to the same node;
        // linking it to itself would violate the no-self-loop invariant
        if node != prev {
            graph.link(prev, node);
            prev = node;
        }
    }
    if end != prev {
        graph.link(prev, end);
    }
}

/// Resolves the path's authoritative waypoint-id list into points.
fn declared_waypoints(
    ids: &[String],
    waypoints_by_id: &HashMap<&str, SpatialPoint>,
) -> Vec<SpatialPoint> {
    ids.iter()
        .filter_map(|id| match waypoints_by_id.get(id.as_str()) {
            Some(point) => Some(*point),
            None => {
                warn!("Path references unknown waypoint id {id:?}; ignoring it");
                None
            }
        })
        .collect()
}

/// Geometric fallback: a waypoint lies on the path if its minimum squared
/// distance to any segment is below the on-path threshold.
fn detect_waypoints(path: &Path, waypoints: &[Waypoint], threshold: f64) -> Vec<SpatialPoint> {
    let threshold_sq = threshold * threshold;
    waypoints
        .iter()
        .map(Waypoint::point)
        .filter(|&point| {
            path.segments()
                .filter_map(|(a, b)| project_onto_segment(point, a, b))
                .any(|proj| proj.distance_sq < threshold_sq)
        })
        .collect()
}

/// Orders waypoints by their projected distance along the path's cumulative
/// arc length. Ties break by segment index, then projection parameter.
fn order_along_path(path: &Path, points: Vec<SpatialPoint>) -> Vec<SpatialPoint> {
    // Degree-space length of each segment plus the arc length before it
    let mut cumulative = Vec::with_capacity(path.path.len());
    let mut acc = 0.0;
    for (a, b) in path.segments() {
        cumulative.push(acc);
        acc += a.distance_sq(b).sqrt();
    }

    points
        .into_iter()
        .filter_map(|point| {
            let best = path
                .segments()
                .enumerate()
                .filter_map(|(index, (a, b))| {
                    project_onto_segment(point, a, b).map(|proj| (index, a, b, proj))
                })
                .fold(
                    None::<(usize, SpatialPoint, SpatialPoint, SegmentProjection)>,
                    |best, candidate| match best {
                        Some((_, _, _, proj)) if proj.distance_sq <= candidate.3.distance_sq => {
                            best
                        }
                        _ => Some(candidate),
                    },
                )?;

            let (index, a, b, proj) = best;
            let along = cumulative[index] + proj.t * a.distance_sq(b).sqrt();
            Some((point, along, index, proj.t))
        })
        .sorted_by(|x, y| {
            x.1.partial_cmp(&y.1)
                .unwrap_or(Ordering::Equal)
                .then(x.2.cmp(&y.2))
                .then(x.3.partial_cmp(&y.3).unwrap_or(Ordering::Equal))
        })
        .map(|(point, _, _, _)| point)
        .collect()
}
