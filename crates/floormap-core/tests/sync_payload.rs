//! Integration tests: backend payloads in and out of `FloorGraph`.
//!
//! Uses a recorded ground-floor payload as the fixture.

use floormap_core::{
    EntityId, FloorGraph, GraphSyncPayload, LintSeverity, LocationType, ValidationReason,
    lint_graph,
};
use pretty_assertions::assert_eq;

const GROUND_FLOOR: &str = include_str!("fixtures/ground_floor.json");

fn fixture() -> GraphSyncPayload {
    GraphSyncPayload::from_json(GROUND_FLOOR).expect("fixture parses")
}

fn fixture_graph() -> FloorGraph {
    let (nodes, edges, beacons) = fixture().into_parts();
    FloorGraph::from_parts(nodes, edges, beacons)
}

// ─── Hydration ──────────────────────────────────────────────────────────

#[test]
fn fixture_hydrates_into_a_graph() {
    let graph = fixture_graph();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.beacon_count(), 2);

    let corridor = EntityId::intern("2b8e4d7f-3c5e-4f9a-b2d4-6e8f0a1c3d52");
    assert_eq!(graph.degree(corridor), 2);
    assert_eq!(graph.node(corridor).unwrap().kind, LocationType::Corridor);

    let floor = EntityId::intern("0b7e4c2a-5d1f-4a8e-9c3b-6f2d8e1a4b70");
    assert!(graph.nodes().all(|n| n.floor_id == floor));
    assert!(graph.beacons().all(|b| b.floor_id == floor));
}

#[test]
fn fixture_is_valid_and_round_trips() {
    let payload = fixture();
    assert_eq!(payload.validate(), Ok(()));

    let graph = fixture_graph();
    let again = GraphSyncPayload::from_graph(payload.floor_id, &graph);
    assert_eq!(again, payload);

    let reparsed = GraphSyncPayload::from_json(&again.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, payload);
}

#[test]
fn null_location_survives_serialization() {
    let json = fixture().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["beacons"][1]["location_id"].is_null());
    assert_eq!(value["edges"][1]["is_accessible"], false);
}

#[test]
fn unknown_location_type_fails_to_parse() {
    let bad = GROUND_FLOOR.replace("\"AUDITORIUM\"", "\"THEATRE\"");
    assert!(GraphSyncPayload::from_json(&bad).is_err());
}

// ─── Validation ─────────────────────────────────────────────────────────

#[test]
fn moving_a_node_keeps_the_payload_valid() {
    let mut graph = fixture_graph();
    let hall = EntityId::intern("3c7d5e8a-4d6f-4a0b-83e5-7f9a1b2d4e63");
    assert!(graph.move_node(hall, 640.0, 700.0));

    let payload = GraphSyncPayload::from_graph(fixture().floor_id, &graph);
    assert_eq!(payload.validate(), Ok(()));
    assert_eq!(payload.edges[1].distance, 500.0);
}

#[test]
fn non_uuid_edge_endpoint_is_reported_by_path() {
    let mut payload = fixture();
    payload.edges[1].target_id = EntityId::intern("lecture-hall-a");
    let err = payload.validate().unwrap_err();
    assert_eq!(err.field, "edges[1].target_id");
    assert_eq!(err.reason, ValidationReason::NotUuid);
}

#[test]
fn infinite_beacon_coordinate_is_rejected() {
    let mut payload = fixture();
    payload.beacons[1].coordinate_y = f64::INFINITY;
    let err = payload.validate().unwrap_err();
    assert_eq!(err.field, "beacons[1].coordinate_y");
    assert_eq!(err.reason, ValidationReason::NotFinite);
}

// ─── Lint ───────────────────────────────────────────────────────────────

#[test]
fn fixture_lints_only_the_placeholder_beacon() {
    let graph = fixture_graph();
    let diags = lint_graph(&graph);
    let rules: Vec<&str> = diags.iter().map(|d| d.rule).collect();
    assert_eq!(rules, vec!["unlinked-beacon", "blank-beacon-uuid"]);
    assert!(diags.iter().all(|d| d.severity == LintSeverity::Info));
    assert!(diags.iter().all(|d| d.entity_id.short() == "8b2cad3f"));
}

#[test]
fn removing_the_corridor_isolates_its_neighbours() {
    let mut graph = fixture_graph();
    let corridor = EntityId::intern("2b8e4d7f-3c5e-4f9a-b2d4-6e8f0a1c3d52");
    let removed = graph.remove_node(corridor).unwrap();
    assert_eq!(removed.edges.len(), 2);

    let isolated: Vec<EntityId> = lint_graph(&graph)
        .into_iter()
        .filter(|d| d.rule == "isolated-node")
        .map(|d| d.entity_id)
        .collect();
    assert_eq!(
        isolated,
        vec![
            EntityId::intern("1a9f3c6e-2b4d-4e8f-a1c3-5d7e9f0b2c41"),
            EntityId::intern("3c7d5e8a-4d6f-4a0b-83e5-7f9a1b2d4e63"),
        ]
    );
}
