//! Navigation graph: an owned node registry with epsilon-merge
//! deduplication plus undirected adjacency. Adjacency is the sole
//! connectivity record; there is no separate edge entity.

use geo::Point;
use hashbrown::HashMap;
use log::trace;
use petgraph::graph::{NodeIndex, UnGraph};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::geometry::SpatialPoint;

pub type NodeId = NodeIndex;

/// A node of the navigation graph. Junction nodes and waypoint nodes share
/// this representation; the role distinction only matters to the geometry
/// source.
#[derive(Debug, Clone)]
pub struct NavNode {
    pub geometry: Point<f64>,
}

impl NavNode {
    pub fn point(&self) -> SpatialPoint {
        SpatialPoint::new(self.geometry.y(), self.geometry.x())
    }
}

/// Entry of the nearest-node spatial index.
#[derive(Debug, Clone, Copy)]
struct IndexedNode {
    /// `[lat, lon]`
    position: [f64; 2],
    node: NodeId,
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.position[0] - point[0];
        let dlon = self.position[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// One snapshot of the connectivity graph. Built wholesale by the graph
/// builder and replaced wholesale on every geometry refresh; no incremental
/// edits.
pub struct NavGraph {
    graph: UnGraph<NavNode, ()>,
    /// Rounded-coordinate buckets for the epsilon merge in
    /// [`NavGraph::get_or_create`]. Bucket side equals the merge radius, so
    /// the 3×3 neighborhood of a point's bucket covers every mergeable node.
    buckets: HashMap<(i64, i64), Vec<NodeId>>,
    merge_epsilon: f64,
    index: Option<RTree<IndexedNode>>,
}

impl NavGraph {
    /// `merge_epsilon` is the node dedup radius in degrees.
    pub fn new(merge_epsilon: f64) -> Self {
        Self {
            graph: UnGraph::default(),
            buckets: HashMap::new(),
            merge_epsilon: merge_epsilon.max(f64::MIN_POSITIVE),
            index: None,
        }
    }

    fn bucket_of(&self, point: SpatialPoint) -> (i64, i64) {
        (
            (point.lat / self.merge_epsilon).floor() as i64,
            (point.lon / self.merge_epsilon).floor() as i64,
        )
    }

    /// Returns the existing node within the merge radius of `point`, or
    /// creates a new one. This tolerates floating-point drift between the
    /// coordinates different detectors wrote for the same physical spot.
    pub fn get_or_create(&mut self, point: SpatialPoint) -> NodeId {
        let (bucket_lat, bucket_lon) = self.bucket_of(point);
        let epsilon_sq = self.merge_epsilon * self.merge_epsilon;

        for dlat in -1..=1 {
            for dlon in -1..=1 {
                let Some(ids) = self.buckets.get(&(bucket_lat + dlat, bucket_lon + dlon)) else {
                    continue;
                };
                for &id in ids {
                    if self.graph[id].point().distance_sq(point) <= epsilon_sq {
                        return id;
                    }
                }
            }
        }

        let id = self.graph.add_node(NavNode {
            geometry: point.geometry(),
        });
        self.buckets
            .entry((bucket_lat, bucket_lon))
            .or_default()
            .push(id);
        // A node added after sealing would be invisible to the stale index
        self.index = None;
        trace!("Created node {id:?} at ({}, {})", point.lat, point.lon);
        id
    }

    /// Adds a symmetric neighbor edge. Self-links are refused and duplicate
    /// edges collapse, so the invariants (symmetry, no self-loop) hold by
    /// construction. Returns whether the edge exists after the call.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        self.graph.update_edge(a, b, ());
        true
    }

    /// Builds the nearest-node spatial index. Called once by the builder
    /// after all nodes and links are in place.
    pub fn seal(&mut self) {
        let entries = self
            .graph
            .node_indices()
            .map(|id| IndexedNode {
                position: [self.graph[id].point().lat, self.graph[id].point().lon],
                node: id,
            })
            .collect();
        self.index = Some(RTree::bulk_load(entries));
    }

    /// Node closest to `point` by raw squared degree distance, with that
    /// distance. `None` on an empty graph.
    pub fn nearest_node(&self, point: &SpatialPoint) -> Option<(NodeId, f64)> {
        let query = [point.lat, point.lon];
        if let Some(index) = &self.index {
            let entry = index.nearest_neighbor(&query)?;
            return Some((entry.node, entry.distance_2(&query)));
        }
        // Unsealed graph: linear scan with first-minimum tie-breaking
        self.graph
            .node_indices()
            .map(|id| (id, self.graph[id].point().distance_sq(*point)))
            .fold(None, |best, candidate| match best {
                Some((_, best_d)) if best_d <= candidate.1 => best,
                _ => Some(candidate),
            })
    }

    pub fn node(&self, id: NodeId) -> &NavNode {
        &self.graph[id]
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
