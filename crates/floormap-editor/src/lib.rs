//! Floormap editor engine.
//!
//! The editor store, the stage controller that turns pointer input into
//! store mutations, shape tools, keyboard shortcuts, panel/toolbar view
//! models and the save session. Everything here is synchronous and
//! host-agnostic; the wasm bridge and native hosts drive it.

pub mod config;
pub mod input;
pub mod panel;
pub mod save;
pub mod shortcuts;
pub mod stage;
pub mod store;
pub mod tools;

pub use config::EditorConfig;
pub use input::InputEvent;
pub use panel::{
    PanelEdit, PanelView, ToolbarAction, ToolbarOutcome, ToolbarState, apply_edit,
    apply_shortcut, dispatch,
};
pub use save::{GraphSync, SaveError, SaveSession};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use stage::{StageClick, StageController, StageEvent};
pub use store::{EditorStats, EditorStore};
pub use tools::{ShapeClick, Tool};
