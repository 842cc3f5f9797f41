//! Editing tools and the per-shape interaction handlers.
//!
//! The active tool decides what a click means. Clicks on empty canvas are
//! routed by the stage controller; clicks and drags that land on a shape
//! come here and call straight into the store.
//!
//! | Tool | Empty canvas | Node click | Edge/beacon click | Drag |
//! |------|--------------|------------|-------------------|------|
//! | Select | clear selection | select | select | move shape |
//! | Node | add node | none | none | none |
//! | Path | cancel path | start / complete path | none | none |
//! | Beacon | add beacon | none | none | none |
//! | Pan | clear selection | none | none | pan stage |

use crate::store::EditorStore;
use floormap_core::{EntityId, Selection};
use floormap_render::ShapeTarget;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The active tool determines how pointer input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Node,
    Path,
    Beacon,
    Pan,
}

impl Tool {
    pub const ALL: [Tool; 5] = [Tool::Select, Tool::Node, Tool::Path, Tool::Beacon, Tool::Pan];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Node => "node",
            Tool::Path => "path",
            Tool::Beacon => "beacon",
            Tool::Pan => "pan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Nodes and beacons can be dragged only with the select tool.
    pub fn shapes_draggable(self) -> bool {
        self == Tool::Select
    }

    /// The stage itself pans only with the pan tool.
    pub fn stage_draggable(self) -> bool {
        self == Tool::Pan
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a shape click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClick {
    Selected(Selection),
    PathStarted(EntityId),
    /// The second click of a path gesture; `None` when it was abandoned.
    PathCompleted(Option<EntityId>),
    Ignored,
}

/// Handle a click on a node, edge or beacon shape.
pub fn handle_shape_click(store: &mut EditorStore, target: ShapeTarget) -> ShapeClick {
    let tool = store.active_tool();
    match (tool, target) {
        (Tool::Select, ShapeTarget::Node(id)) => select(store, Selection::Node(id)),
        (Tool::Select, ShapeTarget::Edge(id)) => select(store, Selection::Edge(id)),
        (Tool::Select, ShapeTarget::Beacon(id)) => select(store, Selection::Beacon(id)),
        (Tool::Path, ShapeTarget::Node(id)) => match store.path_source() {
            None => {
                store.start_path(id);
                ShapeClick::PathStarted(id)
            }
            Some(_) => ShapeClick::PathCompleted(store.complete_path(id)),
        },
        _ => {
            log::trace!("{tool} tool ignores click on {target:?}");
            ShapeClick::Ignored
        }
    }
}

fn select(store: &mut EditorStore, selection: Selection) -> ShapeClick {
    store.set_selection(selection);
    ShapeClick::Selected(selection)
}

/// Whether a press on `target` starts a shape drag under the current tool.
pub fn can_drag(store: &EditorStore, target: ShapeTarget) -> bool {
    store.active_tool().shapes_draggable() && !matches!(target, ShapeTarget::Edge(_))
}

/// Commit a finished drag: the shape's new graph-space position.
pub fn handle_shape_drag_end(store: &mut EditorStore, target: ShapeTarget, x: f64, y: f64) {
    match target {
        ShapeTarget::Node(id) => store.move_node(id, x, y),
        ShapeTarget::Beacon(id) => store.move_beacon(id, x, y),
        ShapeTarget::Edge(id) => log::trace!("edge {id} is not draggable"),
    }
}
