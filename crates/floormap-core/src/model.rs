//! Navigation graph entities for a single building floor.
//!
//! Nodes are rooms and waypoints, edges are walkable connections between two
//! nodes, and beacons are Bluetooth positioning references that may point at
//! a node. Field names mirror the backend DTOs so entities serialize straight
//! into the sync payload.

use crate::geometry::{Point, Positioned};
use crate::id::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Location type ───────────────────────────────────────────────────────

/// Closed set of location kinds. Must match the backend enum exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Classroom,
    #[default]
    Corridor,
    Elevator,
    Stairs,
    Restroom,
    Exit,
    Office,
    Lab,
    Auditorium,
    Library,
    Cafeteria,
    Other,
}

impl LocationType {
    pub const ALL: [LocationType; 12] = [
        LocationType::Classroom,
        LocationType::Corridor,
        LocationType::Elevator,
        LocationType::Stairs,
        LocationType::Restroom,
        LocationType::Exit,
        LocationType::Office,
        LocationType::Lab,
        LocationType::Auditorium,
        LocationType::Library,
        LocationType::Cafeteria,
        LocationType::Other,
    ];

    /// Wire name, e.g. `"CLASSROOM"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Classroom => "CLASSROOM",
            LocationType::Corridor => "CORRIDOR",
            LocationType::Elevator => "ELEVATOR",
            LocationType::Stairs => "STAIRS",
            LocationType::Restroom => "RESTROOM",
            LocationType::Exit => "EXIT",
            LocationType::Office => "OFFICE",
            LocationType::Lab => "LAB",
            LocationType::Auditorium => "AUDITORIUM",
            LocationType::Library => "LIBRARY",
            LocationType::Cafeteria => "CAFETERIA",
            LocationType::Other => "OTHER",
        }
    }

    /// Parse a wire name. Case-sensitive, like the backend.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Floor ───────────────────────────────────────────────────────────────

/// The building level being edited. Supplied by the host, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: EntityId,
    pub building_id: String,
    pub name: String,
    pub level: i32,
    pub floor_plan_image_url: Option<String>,
}

// ─── Entities ────────────────────────────────────────────────────────────

/// A graph vertex ("location"): a room, waypoint or decorative point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: EntityId,
    pub name: String,
    pub room_number: String,
    #[serde(rename = "type")]
    pub kind: LocationType,
    pub floor_id: EntityId,
    pub coordinate_x: f64,
    pub coordinate_y: f64,
    /// `false` keeps decorative points out of pathfinding.
    pub is_navigable: bool,
}

impl MapNode {
    /// A fresh, unnamed, navigable node.
    pub fn new(id: EntityId, floor_id: EntityId, x: f64, y: f64, kind: LocationType) -> Self {
        Self {
            id,
            name: String::new(),
            room_number: String::new(),
            kind,
            floor_id,
            coordinate_x: x,
            coordinate_y: y,
            is_navigable: true,
        }
    }
}

impl Positioned for MapNode {
    fn position(&self) -> Point {
        Point::new(self.coordinate_x, self.coordinate_y)
    }
}

/// A walkable connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEdge {
    pub id: EntityId,
    pub source_id: EntityId,
    pub target_id: EntityId,
    /// Euclidean distance between the endpoints, in canvas pixels.
    pub distance: f64,
    /// `false` marks the connection unusable for accessibility routing.
    pub is_accessible: bool,
}

impl MapEdge {
    pub fn touches(&self, node: EntityId) -> bool {
        self.source_id == node || self.target_id == node
    }
}

/// A Bluetooth positioning beacon placed on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapBeacon {
    pub id: EntityId,
    /// Positioning-system identifier. Free text.
    pub uuid: String,
    pub name: String,
    /// Weak reference to a node; cleared when that node is removed.
    pub location_id: Option<EntityId>,
    pub coordinate_x: f64,
    pub coordinate_y: f64,
    pub floor_id: EntityId,
}

impl MapBeacon {
    pub fn new(id: EntityId, floor_id: EntityId, x: f64, y: f64) -> Self {
        Self {
            id,
            uuid: String::new(),
            name: String::new(),
            location_id: None,
            coordinate_x: x,
            coordinate_y: y,
            floor_id,
        }
    }
}

impl Positioned for MapBeacon {
    fn position(&self) -> Point {
        Point::new(self.coordinate_x, self.coordinate_y)
    }
}

// ─── Partial updates ─────────────────────────────────────────────────────
//
// Coordinates are not patchable. Positions change only through the move
// operations, which refresh incident edge distances.

/// Attribute changes for a node. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub room_number: Option<String>,
    pub kind: Option<LocationType>,
    pub is_navigable: Option<bool>,
}

impl NodePatch {
    pub fn apply(self, node: &mut MapNode) {
        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(room_number) = self.room_number {
            node.room_number = room_number;
        }
        if let Some(kind) = self.kind {
            node.kind = kind;
        }
        if let Some(is_navigable) = self.is_navigable {
            node.is_navigable = is_navigable;
        }
    }
}

/// Attribute changes for an edge. Endpoints are structural and not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    /// Manual override; recomputed the next time an endpoint moves.
    pub distance: Option<f64>,
    pub is_accessible: Option<bool>,
}

impl EdgePatch {
    pub fn apply(self, edge: &mut MapEdge) {
        if let Some(distance) = self.distance {
            edge.distance = distance;
        }
        if let Some(is_accessible) = self.is_accessible {
            edge.is_accessible = is_accessible;
        }
    }
}

/// Attribute changes for a beacon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeaconPatch {
    pub uuid: Option<String>,
    pub name: Option<String>,
    /// `Some(None)` unlinks the beacon.
    pub location_id: Option<Option<EntityId>>,
}

impl BeaconPatch {
    pub fn apply(self, beacon: &mut MapBeacon) {
        if let Some(uuid) = self.uuid {
            beacon.uuid = uuid;
        }
        if let Some(name) = self.name {
            beacon.name = name;
        }
        if let Some(location_id) = self.location_id {
            beacon.location_id = location_id;
        }
    }
}

// ─── Editor UI state shared with the renderer ────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Node,
    Edge,
    Beacon,
}

/// At most one selected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(EntityId),
    Edge(EntityId),
    Beacon(EntityId),
}

impl Selection {
    pub fn of(kind: SelectionKind, id: EntityId) -> Self {
        match kind {
            SelectionKind::Node => Selection::Node(id),
            SelectionKind::Edge => Selection::Edge(id),
            SelectionKind::Beacon => Selection::Beacon(id),
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        match *self {
            Selection::None => None,
            Selection::Node(id) | Selection::Edge(id) | Selection::Beacon(id) => Some(id),
        }
    }

    pub fn kind(&self) -> Option<SelectionKind> {
        match self {
            Selection::None => None,
            Selection::Node(_) => Some(SelectionKind::Node),
            Selection::Edge(_) => Some(SelectionKind::Edge),
            Selection::Beacon(_) => Some(SelectionKind::Beacon),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Whether the selection is exactly `kind`/`id`.
    pub fn is(&self, kind: SelectionKind, id: EntityId) -> bool {
        *self == Selection::of(kind, id)
    }
}

/// Camera transform: pan offset in screen pixels and zoom scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewportState {
    /// Screen → graph space.
    pub fn to_graph(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.x) / self.scale,
            (screen.y - self.y) / self.scale,
        )
    }

    /// Graph → screen space.
    pub fn to_screen(&self, graph: Point) -> Point {
        Point::new(graph.x * self.scale + self.x, graph.y * self.scale + self.y)
    }
}

/// Partial viewport update; merged field by field, never clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
}

impl ViewportPatch {
    pub fn pan(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            scale: None,
        }
    }

    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn apply(self, viewport: &mut ViewportState) {
        if let Some(x) = self.x {
            viewport.x = x;
        }
        if let Some(y) = self.y {
            viewport.y = y;
        }
        if let Some(scale) = self.scale {
            viewport.scale = scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&LocationType::Cafeteria).unwrap(),
            "\"CAFETERIA\""
        );
        for t in LocationType::ALL {
            assert_eq!(LocationType::parse(t.as_str()), Some(t));
        }
        assert_eq!(LocationType::parse("corridor"), None);
    }

    #[test]
    fn unknown_location_type_fails_to_deserialize() {
        let res: Result<LocationType, _> = serde_json::from_str("\"GARAGE\"");
        assert!(res.is_err());
    }

    #[test]
    fn node_serializes_kind_as_type() {
        let node = MapNode::new(
            EntityId::intern("n1"),
            EntityId::intern("f1"),
            1.0,
            2.0,
            LocationType::Lab,
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "LAB");
        assert_eq!(json["is_navigable"], true);
    }

    #[test]
    fn patch_leaves_unset_fields() {
        let mut node = MapNode::new(
            EntityId::intern("n1"),
            EntityId::intern("f1"),
            0.0,
            0.0,
            LocationType::Corridor,
        );
        NodePatch {
            name: Some("Lab 3".into()),
            ..Default::default()
        }
        .apply(&mut node);
        assert_eq!(node.name, "Lab 3");
        assert_eq!(node.kind, LocationType::Corridor);
        assert!(node.is_navigable);
    }

    #[test]
    fn beacon_patch_can_unlink() {
        let mut beacon = MapBeacon::new(EntityId::intern("b1"), EntityId::intern("f1"), 0.0, 0.0);
        beacon.location_id = Some(EntityId::intern("n1"));
        BeaconPatch {
            location_id: Some(None),
            ..Default::default()
        }
        .apply(&mut beacon);
        assert_eq!(beacon.location_id, None);
    }

    #[test]
    fn selection_accessors() {
        let id = EntityId::intern("e1");
        let sel = Selection::of(SelectionKind::Edge, id);
        assert_eq!(sel.id(), Some(id));
        assert_eq!(sel.kind(), Some(SelectionKind::Edge));
        assert!(sel.is(SelectionKind::Edge, id));
        assert!(!sel.is(SelectionKind::Node, id));
        assert!(Selection::None.is_none());
    }

    #[test]
    fn viewport_transform_is_invertible() {
        let vp = ViewportState {
            x: 40.0,
            y: -12.0,
            scale: 2.5,
        };
        let p = Point::new(123.0, 77.0);
        let back = vp.to_screen(vp.to_graph(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn viewport_patch_merges() {
        let mut vp = ViewportState::default();
        ViewportPatch::scale(7.0).apply(&mut vp);
        assert_eq!(vp.scale, 7.0);
        assert_eq!(vp.x, 0.0);
        ViewportPatch::pan(3.0, 4.0).apply(&mut vp);
        assert_eq!((vp.x, vp.y, vp.scale), (3.0, 4.0, 7.0));
    }
}
