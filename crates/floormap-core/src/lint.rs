//! Lint diagnostics for floor graphs.
//!
//! Reports structural issues without modifying the graph. Findings are
//! advisory: only the sync schema in [`crate::payload`] can block a save.

use crate::graph::FloorGraph;
use crate::id::EntityId;
use crate::model::SelectionKind;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Will block the next save or break routing.
    Warning,
    /// Worth a look.
    Info,
}

/// A single lint diagnostic for one entity.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub entity: SelectionKind,
    pub entity_id: EntityId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "unnamed-node").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all lint rules over the graph and return diagnostics.
#[must_use]
pub fn lint_graph(graph: &FloorGraph) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_unnamed_nodes(graph, &mut diags);
    lint_isolated_nodes(graph, &mut diags);
    lint_unlinked_beacons(graph, &mut diags);
    lint_blank_beacon_uuids(graph, &mut diags);
    diags
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// The sync schema requires every node to be named.
fn lint_unnamed_nodes(graph: &FloorGraph, diags: &mut Vec<LintDiagnostic>) {
    for node in graph.nodes().filter(|n| n.name.is_empty()) {
        diags.push(LintDiagnostic {
            entity: SelectionKind::Node,
            entity_id: node.id,
            message: format!(
                "Node {} has no name; the save will be rejected until it is named.",
                node.id.short()
            ),
            severity: LintSeverity::Warning,
            rule: "unnamed-node",
        });
    }
}

/// A navigable node with no connections can never be routed to.
fn lint_isolated_nodes(graph: &FloorGraph, diags: &mut Vec<LintDiagnostic>) {
    for node in graph.nodes() {
        if node.is_navigable && graph.degree(node.id) == 0 {
            let label = if node.name.is_empty() {
                node.id.short()
            } else {
                node.name.as_str()
            };
            diags.push(LintDiagnostic {
                entity: SelectionKind::Node,
                entity_id: node.id,
                message: format!("Navigable node `{label}` is not connected to any path."),
                severity: LintSeverity::Warning,
                rule: "isolated-node",
            });
        }
    }
}

fn lint_unlinked_beacons(graph: &FloorGraph, diags: &mut Vec<LintDiagnostic>) {
    for beacon in graph.beacons().filter(|b| b.location_id.is_none()) {
        diags.push(LintDiagnostic {
            entity: SelectionKind::Beacon,
            entity_id: beacon.id,
            message: format!("Beacon {} is not linked to a location.", beacon.id.short()),
            severity: LintSeverity::Info,
            rule: "unlinked-beacon",
        });
    }
}

fn lint_blank_beacon_uuids(graph: &FloorGraph, diags: &mut Vec<LintDiagnostic>) {
    for beacon in graph.beacons().filter(|b| b.uuid.trim().is_empty()) {
        diags.push(LintDiagnostic {
            entity: SelectionKind::Beacon,
            entity_id: beacon.id,
            message: format!(
                "Beacon {} has no positioning UUID; devices cannot match it.",
                beacon.id.short()
            ),
            severity: LintSeverity::Info,
            rule: "blank-beacon-uuid",
        });
    }
}
