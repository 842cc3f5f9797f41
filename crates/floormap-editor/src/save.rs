//! Save session: the one asynchronous boundary of the editor.
//!
//! `begin` flattens and validates the graph and returns the payload for the
//! host to send. The host reports the transport result through `finish`.
//! The store is marked clean only if nothing changed while the request was
//! in flight; later edits stay dirty and need another save.

use crate::store::EditorStore;
use floormap_core::{GraphSyncPayload, SyncValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] SyncValidationError),
    #[error("a save is already in progress")]
    InFlight,
    #[error("no save in progress")]
    NotStarted,
    #[error("graph sync failed: {0}")]
    Sync(String),
}

/// The backend collaborator that accepts a validated payload.
pub trait GraphSync {
    fn sync(&mut self, payload: &GraphSyncPayload) -> Result<(), String>;
}

#[derive(Debug, Clone, Default)]
pub struct SaveSession {
    /// Store revision captured by `begin`, while a save is in flight.
    in_flight: Option<u64>,
}

impl SaveSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Snapshot and validate the store's graph for the loaded floor.
    ///
    /// Nothing is marked in flight when validation fails.
    pub fn begin(&mut self, store: &EditorStore) -> Result<GraphSyncPayload, SaveError> {
        if self.in_flight.is_some() {
            return Err(SaveError::InFlight);
        }
        let payload = store.flatten(store.floor_id());
        if let Err(err) = payload.validate() {
            log::warn!("save blocked: {err}");
            return Err(err.into());
        }
        self.in_flight = Some(store.revision());
        log::info!(
            "saving floor {}: {} nodes, {} edges, {} beacons",
            payload.floor_id,
            payload.nodes.len(),
            payload.edges.len(),
            payload.beacons.len()
        );
        Ok(payload)
    }

    /// Close the in-flight save with the transport outcome.
    pub fn finish(
        &mut self,
        store: &mut EditorStore,
        outcome: Result<(), String>,
    ) -> Result<(), SaveError> {
        let revision = self.in_flight.take().ok_or(SaveError::NotStarted)?;
        match outcome {
            Ok(()) if store.revision() == revision => {
                store.mark_clean();
                log::info!("save complete");
                Ok(())
            }
            Ok(()) => {
                log::info!("save complete; edits made during the save remain unsaved");
                Ok(())
            }
            Err(message) => {
                log::warn!("save failed: {message}");
                Err(SaveError::Sync(message))
            }
        }
    }

    /// Run a whole save against a synchronous collaborator.
    pub fn save_with(
        &mut self,
        store: &mut EditorStore,
        client: &mut impl GraphSync,
    ) -> Result<(), SaveError> {
        let payload = self.begin(store)?;
        let outcome = client.sync(&payload);
        self.finish(store, outcome)
    }
}
