//! The editor's single source of truth.
//!
//! `EditorStore` owns the floor's graph together with the UI state that
//! drives the canvas: active tool, selection, viewport, the pending path
//! endpoint, and the dirty/loading flags. Every mutation goes through a
//! method here.
//!
//! Mutators are total: an id that no longer resolves is a silent no-op
//! (logged at `debug`), never an error. Only mutations that actually change
//! data mark the graph dirty.

use crate::tools::Tool;
use floormap_core::{
    BeaconPatch, EdgePatch, EntityId, Floor, FloorGraph, GraphSyncPayload, LocationType,
    MapBeacon, MapEdge, MapNode, NodePatch, Selection, ViewportPatch, ViewportState,
};
use floormap_render::RenderInput;
use serde::Serialize;

/// Counts shown in the editor status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditorStats {
    pub nodes: usize,
    pub edges: usize,
    pub beacons: usize,
    /// Current zoom, rounded to a whole percentage.
    pub zoom_percent: u32,
}

#[derive(Debug, Clone, Default)]
pub struct EditorStore {
    floor: Option<Floor>,
    graph: FloorGraph,
    active_tool: Tool,
    selection: Selection,
    viewport: ViewportState,
    path_source: Option<EntityId>,
    is_dirty: bool,
    is_loading: bool,
    /// Bumped by every data mutation.
    revision: u64,
}

impl EditorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn floor(&self) -> Option<&Floor> {
        self.floor.as_ref()
    }

    /// Id stamped on new entities; empty when no floor is loaded.
    pub fn floor_id(&self) -> EntityId {
        self.floor.as_ref().map_or_else(EntityId::empty, |f| f.id)
    }

    pub fn graph(&self) -> &FloorGraph {
        &self.graph
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn path_source(&self) -> Option<EntityId> {
        self.path_source
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn stats(&self) -> EditorStats {
        EditorStats {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            beacons: self.graph.beacon_count(),
            zoom_percent: (self.viewport.scale * 100.0).round().max(0.0) as u32,
        }
    }

    /// Everything the renderer needs for one frame.
    pub fn render_input(&self) -> RenderInput<'_> {
        RenderInput {
            graph: &self.graph,
            selection: self.selection,
            path_source: self.path_source,
            shapes_draggable: self.active_tool.shapes_draggable(),
            background_url: self
                .floor
                .as_ref()
                .and_then(|f| f.floor_plan_image_url.as_deref()),
        }
    }

    /// Flatten the graph into the sync payload for `floor_id`.
    pub fn flatten(&self, floor_id: EntityId) -> GraphSyncPayload {
        GraphSyncPayload::from_graph(floor_id, &self.graph)
    }

    fn touch(&mut self) {
        self.is_dirty = true;
        self.revision += 1;
    }

    fn clear_selection_of(&mut self, id: EntityId) {
        if self.selection.id() == Some(id) {
            self.selection = Selection::None;
        }
    }

    // ─── Session ─────────────────────────────────────────────────────────

    /// Replace the floor context. Graph data is untouched.
    pub fn set_floor(&mut self, floor: Option<Floor>) {
        self.floor = floor;
    }

    /// Switching tools abandons any half-finished path.
    pub fn set_active_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
        self.path_source = None;
    }

    /// Select an entity. The id is not checked against the graph.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    /// Merge a partial viewport. Clamping is the caller's concern.
    pub fn set_viewport(&mut self, patch: ViewportPatch) {
        patch.apply(&mut self.viewport);
    }

    pub fn begin_loading(&mut self) {
        self.is_loading = true;
    }

    /// Replace the whole graph, typically with data fetched from the backend.
    /// Leaves the store clean.
    pub fn load_graph(&mut self, nodes: Vec<MapNode>, edges: Vec<MapEdge>, beacons: Vec<MapBeacon>) {
        self.graph = FloorGraph::from_parts(nodes, edges, beacons);
        self.is_dirty = false;
        self.is_loading = false;
        self.revision += 1;
        log::info!(
            "loaded graph: {} nodes, {} edges, {} beacons",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.graph.beacon_count()
        );
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Back to a freshly constructed store, data and UI state alike.
    /// The revision keeps counting up so a save begun before the reset
    /// cannot mark later edits clean.
    pub fn reset(&mut self) {
        let revision = self.revision + 1;
        *self = Self::default();
        self.revision = revision;
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Add an unnamed navigable node and select it.
    pub fn add_node(&mut self, x: f64, y: f64, kind: LocationType) -> EntityId {
        let id = EntityId::generate();
        self.graph
            .insert_node(MapNode::new(id, self.floor_id(), x, y, kind));
        self.selection = Selection::Node(id);
        self.touch();
        id
    }

    pub fn update_node(&mut self, id: EntityId, patch: NodePatch) {
        let Some(node) = self.graph.node_mut(id) else {
            log::debug!("update_node: no node {id}");
            return;
        };
        patch.apply(node);
        self.touch();
    }

    /// Move a node; every edge touching it gets a fresh distance.
    pub fn move_node(&mut self, id: EntityId, x: f64, y: f64) {
        if self.graph.move_node(id, x, y) {
            self.touch();
        } else {
            log::debug!("move_node: no node {id}");
        }
    }

    /// Remove a node with its edges, and unlink beacons that pointed at it.
    pub fn remove_node(&mut self, id: EntityId) {
        let Some(removed) = self.graph.remove_node(id) else {
            log::debug!("remove_node: no node {id}");
            return;
        };
        log::debug!(
            "removed node {id} with {} edges, unlinked {} beacons",
            removed.edges.len(),
            removed.unlinked_beacons.len()
        );
        if self.path_source == Some(id) {
            self.path_source = None;
        }
        self.clear_selection_of(id);
        self.touch();
    }

    // ─── Path gesture ────────────────────────────────────────────────────

    pub fn start_path(&mut self, source: EntityId) {
        self.path_source = Some(source);
    }

    /// Finish the two-click path gesture at `target`.
    ///
    /// Returns the new edge id, or `None` when the gesture is abandoned: no
    /// pending source, a self-loop, an existing edge between the pair in
    /// either direction, or an endpoint that no longer exists. The pending
    /// source is cleared either way.
    pub fn complete_path(&mut self, target: EntityId) -> Option<EntityId> {
        let source = self.path_source.take()?;
        if source == target {
            log::debug!("path abandoned: self-loop on {source}");
            return None;
        }
        if self.graph.edge_between(source, target).is_some() {
            log::debug!("path abandoned: {source} and {target} already connected");
            return None;
        }
        let Some(distance) = self.graph.distance_between(source, target) else {
            log::debug!("path abandoned: endpoint missing ({source} -> {target})");
            return None;
        };

        let id = EntityId::generate();
        self.graph.insert_edge(MapEdge {
            id,
            source_id: source,
            target_id: target,
            distance,
            is_accessible: true,
        })?;
        self.selection = Selection::Edge(id);
        self.touch();
        Some(id)
    }

    pub fn cancel_path(&mut self) {
        self.path_source = None;
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    pub fn update_edge(&mut self, id: EntityId, patch: EdgePatch) {
        let Some(edge) = self.graph.edge_mut(id) else {
            log::debug!("update_edge: no edge {id}");
            return;
        };
        patch.apply(edge);
        self.touch();
    }

    pub fn remove_edge(&mut self, id: EntityId) {
        if self.graph.remove_edge(id).is_none() {
            log::debug!("remove_edge: no edge {id}");
            return;
        }
        self.clear_selection_of(id);
        self.touch();
    }

    // ─── Beacons ─────────────────────────────────────────────────────────

    /// Add an unlinked beacon and select it.
    pub fn add_beacon(&mut self, x: f64, y: f64) -> EntityId {
        let id = EntityId::generate();
        self.graph
            .insert_beacon(MapBeacon::new(id, self.floor_id(), x, y));
        self.selection = Selection::Beacon(id);
        self.touch();
        id
    }

    pub fn update_beacon(&mut self, id: EntityId, patch: BeaconPatch) {
        let Some(beacon) = self.graph.beacon_mut(id) else {
            log::debug!("update_beacon: no beacon {id}");
            return;
        };
        patch.apply(beacon);
        self.touch();
    }

    pub fn move_beacon(&mut self, id: EntityId, x: f64, y: f64) {
        let Some(beacon) = self.graph.beacon_mut(id) else {
            log::debug!("move_beacon: no beacon {id}");
            return;
        };
        beacon.coordinate_x = x;
        beacon.coordinate_y = y;
        self.touch();
    }

    pub fn remove_beacon(&mut self, id: EntityId) {
        if self.graph.remove_beacon(id).is_none() {
            log::debug!("remove_beacon: no beacon {id}");
            return;
        }
        self.clear_selection_of(id);
        self.touch();
    }

    // ─── Selection-driven ────────────────────────────────────────────────

    /// Delete whatever is selected. No-op without a selection.
    pub fn delete_selection(&mut self) {
        match self.selection {
            Selection::None => {}
            Selection::Node(id) => self.remove_node(id),
            Selection::Edge(id) => self.remove_edge(id),
            Selection::Beacon(id) => self.remove_beacon(id),
        }
    }
}
