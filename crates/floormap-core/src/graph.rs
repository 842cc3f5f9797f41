//! Arena storage for a floor's navigation graph.
//!
//! Nodes and edges live in an undirected `StableGraph` so indices survive
//! removals, with id → index maps for O(1) lookup by entity id. Beacons are
//! not graph members; they sit in an insertion-ordered map and refer to nodes
//! only by id.
//!
//! `FloorGraph` owns the structural invariants:
//! - every edge's endpoints resolve to live nodes (petgraph removes incident
//!   edges together with a node),
//! - edge distances track endpoint positions,
//! - a beacon never points at a removed node.

use crate::geometry::euclidean;
use crate::id::EntityId;
use crate::model::{MapBeacon, MapEdge, MapNode};
use indexmap::IndexMap;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use smallvec::SmallVec;
use std::collections::HashMap;

/// What `remove_node` took with it.
#[derive(Debug, Clone)]
pub struct RemovedNode {
    pub node: MapNode,
    /// Ids of the edges removed by the cascade.
    pub edges: SmallVec<[EntityId; 4]>,
    /// Beacons whose `location_id` was cleared.
    pub unlinked_beacons: SmallVec<[EntityId; 2]>,
}

#[derive(Debug, Clone, Default)]
pub struct FloorGraph {
    /// Nodes as vertices, walkable connections as edges.
    graph: StableUnGraph<MapNode, MapEdge>,

    /// Index from node id → vertex index.
    node_index: HashMap<EntityId, NodeIndex>,

    /// Index from edge id → edge index.
    edge_index: HashMap<EntityId, EdgeIndex>,

    /// Beacons in insertion order.
    beacons: IndexMap<EntityId, MapBeacon>,
}

impl FloorGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from flat entity lists (backend hydration).
    ///
    /// Edges whose endpoints are not among `nodes` cannot be drawn or routed
    /// and are dropped with a warning.
    pub fn from_parts(nodes: Vec<MapNode>, edges: Vec<MapEdge>, beacons: Vec<MapBeacon>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert_node(node);
        }
        for edge in edges {
            let id = edge.id;
            if graph.insert_edge(edge).is_none() {
                log::warn!("dropping edge {id}: endpoint not on this floor");
            }
        }
        for beacon in beacons {
            graph.insert_beacon(beacon);
        }
        graph
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node(&self, id: EntityId) -> Option<&MapNode> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn edge(&self, id: EntityId) -> Option<&MapEdge> {
        self.edge_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn beacon(&self, id: EntityId) -> Option<&MapBeacon> {
        self.beacons.get(&id)
    }

    /// All nodes, in vertex-index order.
    pub fn nodes(&self) -> impl Iterator<Item = &MapNode> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All edges, in edge-index order.
    pub fn edges(&self) -> impl Iterator<Item = &MapEdge> + '_ {
        self.graph.edge_indices().map(move |idx| &self.graph[idx])
    }

    /// All beacons, in insertion order.
    pub fn beacons(&self) -> impl Iterator<Item = &MapBeacon> + '_ {
        self.beacons.values()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0 && self.beacon_count() == 0
    }

    /// The edge joining `a` and `b`, in either direction.
    pub fn edge_between(&self, a: EntityId, b: EntityId) -> Option<&MapEdge> {
        let ia = self.node_index.get(&a)?;
        let ib = self.node_index.get(&b)?;
        self.graph.find_edge(*ia, *ib).map(|e| &self.graph[e])
    }

    /// Ids of every edge touching `node`.
    pub fn incident_edges(&self, node: EntityId) -> SmallVec<[EntityId; 4]> {
        match self.node_index.get(&node) {
            Some(idx) => self.graph.edges(*idx).map(|e| e.weight().id).collect(),
            None => SmallVec::new(),
        }
    }

    /// Number of edges touching `node` (0 for unknown ids).
    pub fn degree(&self, node: EntityId) -> usize {
        self.node_index
            .get(&node)
            .map_or(0, |idx| self.graph.edges(*idx).count())
    }

    /// Flatten into owned entity lists, the inverse of [`FloorGraph::from_parts`].
    pub fn to_parts(&self) -> (Vec<MapNode>, Vec<MapEdge>, Vec<MapBeacon>) {
        (
            self.nodes().cloned().collect(),
            self.edges().cloned().collect(),
            self.beacons().cloned().collect(),
        )
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Insert a node, replacing any node with the same id in place.
    pub fn insert_node(&mut self, node: MapNode) -> NodeIndex {
        let id = node.id;
        if let Some(&idx) = self.node_index.get(&id) {
            self.graph[idx] = node;
            self.refresh_incident_distances(idx);
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        idx
    }

    pub fn node_mut(&mut self, id: EntityId) -> Option<&mut MapNode> {
        self.node_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Set a node's coordinates and recompute the distance of every edge
    /// touching it. Returns `false` when the node does not exist.
    pub fn move_node(&mut self, id: EntityId, x: f64, y: f64) -> bool {
        let Some(&idx) = self.node_index.get(&id) else {
            return false;
        };
        let node = &mut self.graph[idx];
        node.coordinate_x = x;
        node.coordinate_y = y;
        self.refresh_incident_distances(idx);
        true
    }

    /// Remove a node, every edge touching it, and every beacon link to it.
    pub fn remove_node(&mut self, id: EntityId) -> Option<RemovedNode> {
        let edges = self.incident_edges(id);
        let idx = self.node_index.remove(&id)?;
        for edge_id in &edges {
            self.edge_index.remove(edge_id);
        }
        // petgraph drops the incident edges along with the vertex.
        let node = self.graph.remove_node(idx)?;

        let mut unlinked_beacons = SmallVec::new();
        for beacon in self.beacons.values_mut() {
            if beacon.location_id == Some(id) {
                beacon.location_id = None;
                unlinked_beacons.push(beacon.id);
            }
        }

        Some(RemovedNode {
            node,
            edges,
            unlinked_beacons,
        })
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    /// Insert an edge between two existing nodes. Returns `None` (and leaves
    /// the graph untouched) if either endpoint is missing. An edge with the
    /// same id is replaced.
    ///
    /// Duplicate pairs are not rejected here; that policy belongs to the
    /// path gesture.
    pub fn insert_edge(&mut self, edge: MapEdge) -> Option<EdgeIndex> {
        let source = *self.node_index.get(&edge.source_id)?;
        let target = *self.node_index.get(&edge.target_id)?;
        let id = edge.id;
        if let Some(old) = self.edge_index.remove(&id) {
            self.graph.remove_edge(old);
        }
        let idx = self.graph.add_edge(source, target, edge);
        self.edge_index.insert(id, idx);
        Some(idx)
    }

    pub fn edge_mut(&mut self, id: EntityId) -> Option<&mut MapEdge> {
        self.edge_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn remove_edge(&mut self, id: EntityId) -> Option<MapEdge> {
        let idx = self.edge_index.remove(&id)?;
        self.graph.remove_edge(idx)
    }

    /// Distance between two nodes' current coordinates.
    pub fn distance_between(&self, a: EntityId, b: EntityId) -> Option<f64> {
        Some(euclidean(self.node(a)?, self.node(b)?))
    }

    fn refresh_incident_distances(&mut self, idx: NodeIndex) {
        let incident: SmallVec<[EdgeIndex; 8]> = self.graph.edges(idx).map(|e| e.id()).collect();
        for edge_idx in incident {
            if let Some((a, b)) = self.graph.edge_endpoints(edge_idx) {
                let distance = euclidean(&self.graph[a], &self.graph[b]);
                self.graph[edge_idx].distance = distance;
            }
        }
    }

    // ─── Beacons ─────────────────────────────────────────────────────────

    /// Insert a beacon, replacing any beacon with the same id in place.
    pub fn insert_beacon(&mut self, beacon: MapBeacon) {
        self.beacons.insert(beacon.id, beacon);
    }

    pub fn beacon_mut(&mut self, id: EntityId) -> Option<&mut MapBeacon> {
        self.beacons.get_mut(&id)
    }

    pub fn remove_beacon(&mut self, id: EntityId) -> Option<MapBeacon> {
        self.beacons.shift_remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LocationType;

    fn node(id: &str, x: f64, y: f64) -> MapNode {
        MapNode::new(
            EntityId::intern(id),
            EntityId::intern("floor"),
            x,
            y,
            LocationType::Corridor,
        )
    }

    fn edge(id: &str, a: &str, b: &str) -> MapEdge {
        MapEdge {
            id: EntityId::intern(id),
            source_id: EntityId::intern(a),
            target_id: EntityId::intern(b),
            distance: 1.0,
            is_accessible: true,
        }
    }

    #[test]
    fn edge_between_ignores_direction() {
        let mut g = FloorGraph::new();
        g.insert_node(node("a", 0.0, 0.0));
        g.insert_node(node("b", 3.0, 4.0));
        g.insert_edge(edge("ab", "a", "b")).unwrap();

        let a = EntityId::intern("a");
        let b = EntityId::intern("b");
        assert!(g.edge_between(a, b).is_some());
        assert!(g.edge_between(b, a).is_some());
        assert_eq!(g.distance_between(a, b), Some(5.0));
    }

    #[test]
    fn insert_edge_requires_live_endpoints() {
        let mut g = FloorGraph::new();
        g.insert_node(node("a", 0.0, 0.0));
        assert!(g.insert_edge(edge("ax", "a", "ghost")).is_none());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn move_node_refreshes_incident_distances() {
        let mut g = FloorGraph::new();
        g.insert_node(node("a", 0.0, 0.0));
        g.insert_node(node("b", 10.0, 0.0));
        g.insert_node(node("c", 10.0, 10.0));
        g.insert_edge(edge("ab", "a", "b"));
        g.insert_edge(edge("bc", "b", "c"));

        assert!(g.move_node(EntityId::intern("b"), 0.0, 10.0));
        let ab = g.edge(EntityId::intern("ab")).unwrap().distance;
        let bc = g.edge(EntityId::intern("bc")).unwrap().distance;
        assert!((ab - 10.0).abs() < 1e-9);
        assert!((bc - 10.0).abs() < 1e-9);
        assert!(!g.move_node(EntityId::intern("ghost"), 1.0, 1.0));
    }

    #[test]
    fn remove_node_cascades_and_unlinks() {
        let mut g = FloorGraph::new();
        g.insert_node(node("a", 0.0, 0.0));
        g.insert_node(node("b", 1.0, 0.0));
        g.insert_node(node("c", 2.0, 0.0));
        g.insert_edge(edge("ab", "a", "b"));
        g.insert_edge(edge("bc", "b", "c"));
        let mut beacon = MapBeacon::new(EntityId::intern("bk"), EntityId::intern("floor"), 0.0, 0.0);
        beacon.location_id = Some(EntityId::intern("b"));
        g.insert_beacon(beacon);

        let removed = g.remove_node(EntityId::intern("b")).unwrap();
        assert_eq!(removed.edges.len(), 2);
        assert_eq!(removed.unlinked_beacons.as_slice(), &[EntityId::intern("bk")]);
        assert_eq!(g.edge_count(), 0);
        assert!(g.edge(EntityId::intern("ab")).is_none());
        assert_eq!(g.beacon(EntityId::intern("bk")).unwrap().location_id, None);
        assert!(g.remove_node(EntityId::intern("b")).is_none());
    }

    #[test]
    fn from_parts_drops_dangling_edges() {
        let g = FloorGraph::from_parts(
            vec![node("a", 0.0, 0.0), node("b", 1.0, 1.0)],
            vec![edge("ab", "a", "b"), edge("az", "a", "z")],
            vec![],
        );
        assert_eq!(g.edge_count(), 1);
        assert!(g.edge(EntityId::intern("az")).is_none());
    }

    #[test]
    fn beacons_keep_insertion_order_on_removal() {
        let mut g = FloorGraph::new();
        for id in ["b1", "b2", "b3"] {
            g.insert_beacon(MapBeacon::new(EntityId::intern(id), EntityId::empty(), 0.0, 0.0));
        }
        g.remove_beacon(EntityId::intern("b2"));
        let order: Vec<&str> = g.beacons().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["b1", "b3"]);
    }
}
