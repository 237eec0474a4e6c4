//! Resolving one discrete directional query against the graph.

use log::debug;

use super::Direction;
use crate::model::{NavGraph, NodeId, SpatialPoint};

/// Minimum alignment (dot product with the requested heading) for a
/// neighbor to qualify. 0.5 cuts off anything more than ~60° off-heading.
const MIN_ALIGNMENT: f64 = 0.5;

/// Picks the neighbor of the node nearest `position` that best aligns with
/// `direction`. `None` on an empty graph or when no neighbor survives the
/// alignment filter — a dead end in that direction, not an error.
pub fn resolve(graph: &NavGraph, position: SpatialPoint, direction: Direction) -> Option<NodeId> {
    let (current, _) = graph.nearest_node(&position)?;
    let origin = graph.node(current).point();
    // A degree of longitude shrinks with latitude; correct Δlon so dot
    // products compare physical headings, not degree-space ones
    let aspect = origin.lat.to_radians().cos();
    let (unit_lat, unit_lon) = direction.unit();

    let mut best: Option<(NodeId, f64)> = None;
    for neighbor in graph.neighbors(current) {
        let target = graph.node(neighbor).point();
        let dlat = target.lat - origin.lat;
        let dlon = (target.lon - origin.lon) * aspect;
        let length = (dlat * dlat + dlon * dlon).sqrt();
        if length == 0.0 {
            continue;
        }
        let score = (dlat * unit_lat + dlon * unit_lon) / length;
        if score <= MIN_ALIGNMENT {
            continue;
        }
        match best {
            // Strictly-highest wins; ties keep the first encountered
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((neighbor, score)),
        }
    }

    if best.is_none() {
        debug!(
            "No neighbor qualifies for {direction:?} from ({}, {})",
            origin.lat, origin.lon
        );
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star_graph() -> (NavGraph, NodeId, [NodeId; 3]) {
        let mut graph = NavGraph::new(1e-5);
        let center = graph.get_or_create(SpatialPoint::new(0.0, 0.0));
        let north = graph.get_or_create(SpatialPoint::new(0.001, 0.0));
        let east = graph.get_or_create(SpatialPoint::new(0.0, 0.001));
        let northeast = graph.get_or_create(SpatialPoint::new(0.001, 0.001));
        for node in [north, east, northeast] {
            graph.link(center, node);
        }
        graph.seal();
        (graph, center, [north, east, northeast])
    }

    #[test]
    fn single_northern_neighbor_monotonicity() {
        let mut graph = NavGraph::new(1e-5);
        let center = graph.get_or_create(SpatialPoint::new(0.0, 0.0));
        let north = graph.get_or_create(SpatialPoint::new(0.001, 0.0));
        graph.link(center, north);
        graph.seal();

        let position = SpatialPoint::new(0.0001, 0.0); // nearest node is center
        assert_eq!(resolve(&graph, position, Direction::Up), Some(north));
        assert_eq!(resolve(&graph, position, Direction::Down), None);
    }

    #[test]
    fn picks_best_aligned_neighbor() {
        let (graph, _, [north, east, northeast]) = star_graph();
        let position = SpatialPoint::new(0.0, 0.0);

        assert_eq!(resolve(&graph, position, Direction::Up), Some(north));
        assert_eq!(resolve(&graph, position, Direction::Right), Some(east));
        assert_eq!(
            resolve(&graph, position, Direction::UpRight),
            Some(northeast)
        );
    }

    #[test]
    fn off_heading_neighbors_are_filtered() {
        let (graph, _, _) = star_graph();
        // Nothing lies south or west of the center
        assert_eq!(resolve(&graph, SpatialPoint::new(0.0, 0.0), Direction::Down), None);
        assert_eq!(resolve(&graph, SpatialPoint::new(0.0, 0.0), Direction::Left), None);
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let mut graph = NavGraph::new(1e-5);
        graph.seal();
        assert_eq!(resolve(&graph, SpatialPoint::new(0.0, 0.0), Direction::Up), None);
    }

    #[test]
    fn aspect_correction_applies_at_high_latitude() {
        // At 60°N a degree of longitude is half a degree of latitude. A
        // neighbor offset equally in degrees leans north after correction.
        let mut graph = NavGraph::new(1e-5);
        let center = graph.get_or_create(SpatialPoint::new(60.0, 0.0));
        let skewed = graph.get_or_create(SpatialPoint::new(60.001, 0.001));
        graph.link(center, skewed);
        graph.seal();

        // Corrected heading is atan2(0.5, 1) ≈ 26.6° off north: within the
        // UP cone but outside the RIGHT cone
        assert_eq!(
            resolve(&graph, SpatialPoint::new(60.0, 0.0), Direction::Up),
            Some(skewed)
        );
        assert_eq!(
            resolve(&graph, SpatialPoint::new(60.0, 0.0), Direction::Right),
            None
        );
    }
}
