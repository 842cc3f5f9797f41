//! Floormap core: the navigation graph of one building floor.
//!
//! Entities, interned ids, geometry helpers, the `FloorGraph` arena that
//! enforces the graph's structural invariants, the sync payload schema, and
//! advisory lint rules. No editor state lives here.

pub mod geometry;
pub mod graph;
pub mod id;
pub mod lint;
pub mod model;
pub mod payload;

pub use geometry::{Point, Positioned, euclidean};
pub use graph::{FloorGraph, RemovedNode};
pub use id::EntityId;
pub use lint::{LintDiagnostic, LintSeverity, lint_graph};
pub use model::*;
pub use payload::{GraphSyncPayload, SyncValidationError, ValidationReason};
