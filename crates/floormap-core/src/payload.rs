//! Sync payload: the flattened graph handed to the backend on save.
//!
//! The payload is validated locally before it leaves the editor. The first
//! failing field is reported with its path (`nodes[2].name`) and the save is
//! aborted; a malformed payload is never sent.

use crate::graph::FloorGraph;
use crate::id::EntityId;
use crate::model::{LocationType, MapBeacon, MapEdge, MapNode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSyncPayload {
    pub floor_id: EntityId,
    pub nodes: Vec<NodePayload>,
    pub edges: Vec<EdgePayload>,
    pub beacons: Vec<BeaconPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: EntityId,
    pub name: String,
    pub room_number: String,
    #[serde(rename = "type")]
    pub kind: LocationType,
    pub coordinate_x: f64,
    pub coordinate_y: f64,
    pub is_navigable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePayload {
    pub id: EntityId,
    pub source_id: EntityId,
    pub target_id: EntityId,
    pub distance: f64,
    pub is_accessible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconPayload {
    pub id: EntityId,
    pub uuid: String,
    pub name: String,
    pub location_id: Option<EntityId>,
    pub coordinate_x: f64,
    pub coordinate_y: f64,
}

// ─── Validation errors ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("expected a UUID")]
    NotUuid,
    #[error("must not be empty")]
    Empty,
    #[error("must be a finite number")]
    NotFinite,
    #[error("must be greater than zero")]
    NotPositive,
}

/// The first field of a payload that failed the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sync payload: {field} {reason}")]
pub struct SyncValidationError {
    /// Path of the failing field, e.g. `edges[0].distance`.
    pub field: String,
    pub reason: ValidationReason,
}

impl SyncValidationError {
    fn at(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

fn check_uuid(id: EntityId, field: impl FnOnce() -> String) -> Result<(), SyncValidationError> {
    if id.is_uuid() {
        Ok(())
    } else {
        Err(SyncValidationError::at(field(), ValidationReason::NotUuid))
    }
}

fn check_finite(value: f64, field: impl FnOnce() -> String) -> Result<(), SyncValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SyncValidationError::at(field(), ValidationReason::NotFinite))
    }
}

// ─── Payload ─────────────────────────────────────────────────────────────

impl GraphSyncPayload {
    /// Flatten a floor graph. Nodes and beacons drop their `floor_id`; the
    /// payload carries it once at the top level.
    pub fn from_graph(floor_id: EntityId, graph: &FloorGraph) -> Self {
        Self {
            floor_id,
            nodes: graph.nodes().map(NodePayload::from).collect(),
            edges: graph.edges().map(EdgePayload::from).collect(),
            beacons: graph.beacons().map(BeaconPayload::from).collect(),
        }
    }

    /// Check the payload against the backend schema, stopping at the first
    /// failure: top-level floor id, then nodes, edges and beacons in order.
    pub fn validate(&self) -> Result<(), SyncValidationError> {
        check_uuid(self.floor_id, || "floor_id".to_string())?;

        for (i, node) in self.nodes.iter().enumerate() {
            check_uuid(node.id, || format!("nodes[{i}].id"))?;
            if node.name.is_empty() {
                return Err(SyncValidationError::at(
                    format!("nodes[{i}].name"),
                    ValidationReason::Empty,
                ));
            }
            check_finite(node.coordinate_x, || format!("nodes[{i}].coordinate_x"))?;
            check_finite(node.coordinate_y, || format!("nodes[{i}].coordinate_y"))?;
        }

        for (i, edge) in self.edges.iter().enumerate() {
            check_uuid(edge.id, || format!("edges[{i}].id"))?;
            check_uuid(edge.source_id, || format!("edges[{i}].source_id"))?;
            check_uuid(edge.target_id, || format!("edges[{i}].target_id"))?;
            check_finite(edge.distance, || format!("edges[{i}].distance"))?;
            if edge.distance <= 0.0 {
                return Err(SyncValidationError::at(
                    format!("edges[{i}].distance"),
                    ValidationReason::NotPositive,
                ));
            }
        }

        for (i, beacon) in self.beacons.iter().enumerate() {
            check_uuid(beacon.id, || format!("beacons[{i}].id"))?;
            if let Some(location_id) = beacon.location_id {
                check_uuid(location_id, || format!("beacons[{i}].location_id"))?;
            }
            check_finite(beacon.coordinate_x, || format!("beacons[{i}].coordinate_x"))?;
            check_finite(beacon.coordinate_y, || format!("beacons[{i}].coordinate_y"))?;
        }

        Ok(())
    }

    /// Rebuild full entities, restoring each `floor_id` from the payload.
    pub fn into_parts(self) -> (Vec<MapNode>, Vec<MapEdge>, Vec<MapBeacon>) {
        let floor_id = self.floor_id;
        let nodes = self
            .nodes
            .into_iter()
            .map(|n| MapNode {
                id: n.id,
                name: n.name,
                room_number: n.room_number,
                kind: n.kind,
                floor_id,
                coordinate_x: n.coordinate_x,
                coordinate_y: n.coordinate_y,
                is_navigable: n.is_navigable,
            })
            .collect();
        let edges = self
            .edges
            .into_iter()
            .map(|e| MapEdge {
                id: e.id,
                source_id: e.source_id,
                target_id: e.target_id,
                distance: e.distance,
                is_accessible: e.is_accessible,
            })
            .collect();
        let beacons = self
            .beacons
            .into_iter()
            .map(|b| MapBeacon {
                id: b.id,
                uuid: b.uuid,
                name: b.name,
                location_id: b.location_id,
                coordinate_x: b.coordinate_x,
                coordinate_y: b.coordinate_y,
                floor_id,
            })
            .collect();
        (nodes, edges, beacons)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a payload. Unknown location types are rejected here.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&MapNode> for NodePayload {
    fn from(n: &MapNode) -> Self {
        Self {
            id: n.id,
            name: n.name.clone(),
            room_number: n.room_number.clone(),
            kind: n.kind,
            coordinate_x: n.coordinate_x,
            coordinate_y: n.coordinate_y,
            is_navigable: n.is_navigable,
        }
    }
}

impl From<&MapEdge> for EdgePayload {
    fn from(e: &MapEdge) -> Self {
        Self {
            id: e.id,
            source_id: e.source_id,
            target_id: e.target_id,
            distance: e.distance,
            is_accessible: e.is_accessible,
        }
    }
}

impl From<&MapBeacon> for BeaconPayload {
    fn from(b: &MapBeacon) -> Self {
        Self {
            id: b.id,
            uuid: b.uuid.clone(),
            name: b.name.clone(),
            location_id: b.location_id,
            coordinate_x: b.coordinate_x,
            coordinate_y: b.coordinate_y,
        }
    }
}
