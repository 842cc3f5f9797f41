//! View models for the properties panel and the toolbar.
//!
//! Both are rebuilt from the store on demand and hold no state of their own.
//! Edits flow back through [`apply_edit`] and [`dispatch`], which call the
//! store's updaters.

use crate::shortcuts::ShortcutAction;
use crate::stage::StageController;
use crate::store::EditorStore;
use crate::tools::Tool;
use floormap_core::{
    BeaconPatch, EdgePatch, EntityId, LocationType, NodePatch, Selection, SelectionKind,
};
use serde::{Deserialize, Serialize};

// ─── Properties panel ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeFields {
    pub id: EntityId,
    pub name: String,
    pub room_number: String,
    #[serde(rename = "type")]
    pub kind: LocationType,
    pub is_navigable: bool,
    /// Coordinates rounded for display.
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeFields {
    pub id: EntityId,
    /// Rounded to two decimals.
    pub distance: f64,
    pub is_accessible: bool,
    /// First 8 characters of each endpoint id.
    pub source: String,
    pub target: String,
}

/// One entry of the beacon's location picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOption {
    pub id: EntityId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeaconFields {
    pub id: EntityId,
    pub name: String,
    pub uuid: String,
    pub location_id: Option<EntityId>,
    pub location_options: Vec<NodeOption>,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelView {
    NoSelection,
    /// The selected id no longer resolves; nothing is rendered.
    Missing,
    Node(NodeFields),
    Edge(EdgeFields),
    Beacon(BeaconFields),
}

impl PanelView {
    pub fn from_store(store: &EditorStore) -> Self {
        let graph = store.graph();
        match store.selection() {
            Selection::None => PanelView::NoSelection,
            Selection::Node(id) => graph.node(id).map_or(PanelView::Missing, |node| {
                PanelView::Node(NodeFields {
                    id,
                    name: node.name.clone(),
                    room_number: node.room_number.clone(),
                    kind: node.kind,
                    is_navigable: node.is_navigable,
                    x: node.coordinate_x.round() as i64,
                    y: node.coordinate_y.round() as i64,
                })
            }),
            Selection::Edge(id) => graph.edge(id).map_or(PanelView::Missing, |edge| {
                PanelView::Edge(EdgeFields {
                    id,
                    distance: (edge.distance * 100.0).round() / 100.0,
                    is_accessible: edge.is_accessible,
                    source: edge.source_id.short().to_string(),
                    target: edge.target_id.short().to_string(),
                })
            }),
            Selection::Beacon(id) => graph.beacon(id).map_or(PanelView::Missing, |beacon| {
                PanelView::Beacon(BeaconFields {
                    id,
                    name: beacon.name.clone(),
                    uuid: beacon.uuid.clone(),
                    location_id: beacon.location_id,
                    location_options: graph
                        .nodes()
                        .map(|n| NodeOption {
                            id: n.id,
                            label: if n.name.is_empty() {
                                n.id.short().to_string()
                            } else {
                                n.name.clone()
                            },
                        })
                        .collect(),
                    x: beacon.coordinate_x.round() as i64,
                    y: beacon.coordinate_y.round() as i64,
                })
            }),
        }
    }

    pub fn kind(&self) -> Option<SelectionKind> {
        match self {
            PanelView::Node(_) => Some(SelectionKind::Node),
            PanelView::Edge(_) => Some(SelectionKind::Edge),
            PanelView::Beacon(_) => Some(SelectionKind::Beacon),
            PanelView::NoSelection | PanelView::Missing => None,
        }
    }
}

/// A single field change from the panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PanelEdit {
    NodeName(String),
    NodeRoomNumber(String),
    NodeType(LocationType),
    NodeNavigable(bool),
    EdgeDistance(f64),
    EdgeAccessible(bool),
    BeaconName(String),
    BeaconUuid(String),
    /// `None` (or an empty id) unlinks the beacon.
    BeaconLocation(Option<EntityId>),
}

/// Route a panel edit for entity `id` to the matching store updater.
pub fn apply_edit(store: &mut EditorStore, id: EntityId, edit: PanelEdit) {
    match edit {
        PanelEdit::NodeName(name) => store.update_node(
            id,
            NodePatch {
                name: Some(name),
                ..NodePatch::default()
            },
        ),
        PanelEdit::NodeRoomNumber(room_number) => store.update_node(
            id,
            NodePatch {
                room_number: Some(room_number),
                ..NodePatch::default()
            },
        ),
        PanelEdit::NodeType(kind) => store.update_node(
            id,
            NodePatch {
                kind: Some(kind),
                ..NodePatch::default()
            },
        ),
        PanelEdit::NodeNavigable(is_navigable) => store.update_node(
            id,
            NodePatch {
                is_navigable: Some(is_navigable),
                ..NodePatch::default()
            },
        ),
        PanelEdit::EdgeDistance(distance) => store.update_edge(
            id,
            EdgePatch {
                distance: Some(distance),
                ..EdgePatch::default()
            },
        ),
        PanelEdit::EdgeAccessible(is_accessible) => store.update_edge(
            id,
            EdgePatch {
                is_accessible: Some(is_accessible),
                ..EdgePatch::default()
            },
        ),
        PanelEdit::BeaconName(name) => store.update_beacon(
            id,
            BeaconPatch {
                name: Some(name),
                ..BeaconPatch::default()
            },
        ),
        PanelEdit::BeaconUuid(uuid) => store.update_beacon(
            id,
            BeaconPatch {
                uuid: Some(uuid),
                ..BeaconPatch::default()
            },
        ),
        PanelEdit::BeaconLocation(location) => store.update_beacon(
            id,
            BeaconPatch {
                location_id: Some(location.filter(|l| !l.is_empty())),
                ..BeaconPatch::default()
            },
        ),
    }
}

// ─── Toolbar ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub active_tool: Tool,
    /// Something is selected.
    pub can_delete: bool,
    /// Dirty and no save in flight.
    pub can_save: bool,
    pub is_dirty: bool,
    pub is_saving: bool,
}

impl ToolbarState {
    pub fn from_store(store: &EditorStore, is_saving: bool) -> Self {
        Self {
            active_tool: store.active_tool(),
            can_delete: !store.selection().is_none(),
            can_save: store.is_dirty() && !is_saving,
            is_dirty: store.is_dirty(),
            is_saving,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", content = "tool", rename_all = "snake_case")]
pub enum ToolbarAction {
    SetTool(Tool),
    ZoomIn,
    ZoomOut,
    DeleteSelected,
    Reset,
    Save,
}

/// Whether the host has follow-up work after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarOutcome {
    Done,
    /// The store was left alone; the host starts a save session.
    SaveRequested,
}

pub fn dispatch(
    store: &mut EditorStore,
    stage: &StageController,
    action: ToolbarAction,
) -> ToolbarOutcome {
    match action {
        ToolbarAction::SetTool(tool) => store.set_active_tool(tool),
        ToolbarAction::ZoomIn => stage.zoom_in(store),
        ToolbarAction::ZoomOut => stage.zoom_out(store),
        ToolbarAction::DeleteSelected => store.delete_selection(),
        ToolbarAction::Reset => store.reset(),
        ToolbarAction::Save => return ToolbarOutcome::SaveRequested,
    }
    ToolbarOutcome::Done
}

/// Run a keyboard shortcut through the same paths as the toolbar.
pub fn apply_shortcut(
    store: &mut EditorStore,
    stage: &StageController,
    action: ShortcutAction,
) -> ToolbarOutcome {
    match action.toolbar_action() {
        Some(toolbar) => dispatch(store, stage, toolbar),
        None => {
            store.cancel_path();
            store.clear_selection();
            ToolbarOutcome::Done
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_selection_shows_placeholder() {
        let store = EditorStore::new();
        assert_eq!(PanelView::from_store(&store), PanelView::NoSelection);
    }

    #[test]
    fn stale_selection_renders_nothing() {
        let mut store = EditorStore::new();
        store.set_selection(Selection::Edge(EntityId::intern("panel-gone")));
        assert_eq!(PanelView::from_store(&store), PanelView::Missing);
    }

    #[test]
    fn node_fields_round_coordinates() {
        let mut store = EditorStore::new();
        let id = store.add_node(10.4, 19.6, LocationType::Library);
        let PanelView::Node(fields) = PanelView::from_store(&store) else {
            panic!("expected node fields");
        };
        assert_eq!(fields.id, id);
        assert_eq!((fields.x, fields.y), (10, 20));
        assert_eq!(fields.kind, LocationType::Library);
    }

    #[test]
    fn edge_fields_round_distance() {
        let mut store = EditorStore::new();
        let a = store.add_node(0.0, 0.0, LocationType::Corridor);
        let b = store.add_node(10.0, 10.0, LocationType::Corridor);
        store.start_path(a);
        store.complete_path(b).unwrap();
        let PanelView::Edge(fields) = PanelView::from_store(&store) else {
            panic!("expected edge fields");
        };
        assert_eq!(fields.distance, 14.14);
        assert_eq!(fields.source.len(), 8);
    }

    #[test]
    fn beacon_options_fall_back_to_short_id() {
        let mut store = EditorStore::new();
        let named = store.add_node(0.0, 0.0, LocationType::Exit);
        apply_edit(&mut store, named, PanelEdit::NodeName("Exit A".into()));
        let unnamed = store.add_node(5.0, 5.0, LocationType::Exit);
        store.add_beacon(1.0, 1.0);

        let PanelView::Beacon(fields) = PanelView::from_store(&store) else {
            panic!("expected beacon fields");
        };
        let labels: Vec<&str> = fields
            .location_options
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Exit A", unnamed.short()]);
    }

    #[test]
    fn beacon_location_edit_links_and_unlinks() {
        let mut store = EditorStore::new();
        let node = store.add_node(0.0, 0.0, LocationType::Office);
        let beacon = store.add_beacon(1.0, 1.0);
        apply_edit(&mut store, beacon, PanelEdit::BeaconLocation(Some(node)));
        assert_eq!(store.graph().beacon(beacon).unwrap().location_id, Some(node));
        apply_edit(
            &mut store,
            beacon,
            PanelEdit::BeaconLocation(Some(EntityId::empty())),
        );
        assert_eq!(store.graph().beacon(beacon).unwrap().location_id, None);
    }

    #[test]
    fn panel_edit_from_json() {
        let edit: PanelEdit =
            serde_json::from_str(r#"{"field":"node_type","value":"STAIRS"}"#).unwrap();
        assert_eq!(edit, PanelEdit::NodeType(LocationType::Stairs));
        let edit: PanelEdit =
            serde_json::from_str(r#"{"field":"beacon_location","value":null}"#).unwrap();
        assert_eq!(edit, PanelEdit::BeaconLocation(None));
    }

    #[test]
    fn toolbar_enables_delete_and_save() {
        let mut store = EditorStore::new();
        let state = ToolbarState::from_store(&store, false);
        assert!(!state.can_delete);
        assert!(!state.can_save);

        store.add_beacon(0.0, 0.0);
        let state = ToolbarState::from_store(&store, false);
        assert!(state.can_delete);
        assert!(state.can_save);
        assert!(!ToolbarState::from_store(&store, true).can_save);
    }

    #[test]
    fn dispatch_runs_store_actions() {
        let mut store = EditorStore::new();
        let stage = StageController::default();
        store.add_beacon(0.0, 0.0);

        assert_eq!(
            dispatch(&mut store, &stage, ToolbarAction::DeleteSelected),
            ToolbarOutcome::Done
        );
        assert_eq!(store.graph().beacon_count(), 0);

        dispatch(&mut store, &stage, ToolbarAction::ZoomIn);
        assert_eq!(store.viewport().scale, 1.2);

        assert_eq!(
            dispatch(&mut store, &stage, ToolbarAction::Save),
            ToolbarOutcome::SaveRequested
        );
    }

    #[test]
    fn escape_cancels_path_and_selection() {
        let mut store = EditorStore::new();
        let stage = StageController::default();
        let a = store.add_node(0.0, 0.0, LocationType::Corridor);
        store.set_active_tool(Tool::Path);
        store.start_path(a);
        store.set_selection(Selection::Node(a));

        apply_shortcut(&mut store, &stage, ShortcutAction::Cancel);
        assert_eq!(store.path_source(), None);
        assert_eq!(store.selection(), Selection::None);
        assert_eq!(store.active_tool(), Tool::Path);
    }

    #[test]
    fn toolbar_action_from_json() {
        let action: ToolbarAction =
            serde_json::from_str(r#"{"action":"set_tool","tool":"beacon"}"#).unwrap();
        assert_eq!(action, ToolbarAction::SetTool(Tool::Beacon));
        let action: ToolbarAction = serde_json::from_str(r#"{"action":"reset"}"#).unwrap();
        assert_eq!(action, ToolbarAction::Reset);
    }
}
