//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the wasm bridge and native hosts share one binding table.

use crate::panel::ToolbarAction;
use crate::tools::Tool;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolNode,
    ToolPath,
    ToolBeacon,
    ToolPan,

    // ── Edit ──
    Delete,
    /// Abandon the path gesture and drop the selection.
    Cancel,
    Save,

    // ── View ──
    ZoomIn,
    ZoomOut,
}

impl ShortcutAction {
    /// The toolbar button this shortcut stands in for, if any.
    pub fn toolbar_action(self) -> Option<ToolbarAction> {
        let action = match self {
            ShortcutAction::ToolSelect => ToolbarAction::SetTool(Tool::Select),
            ShortcutAction::ToolNode => ToolbarAction::SetTool(Tool::Node),
            ShortcutAction::ToolPath => ToolbarAction::SetTool(Tool::Path),
            ShortcutAction::ToolBeacon => ToolbarAction::SetTool(Tool::Beacon),
            ShortcutAction::ToolPan => ToolbarAction::SetTool(Tool::Pan),
            ShortcutAction::Delete => ToolbarAction::DeleteSelected,
            ShortcutAction::Save => ToolbarAction::Save,
            ShortcutAction::ZoomIn => ToolbarAction::ZoomIn,
            ShortcutAction::ZoomOut => ToolbarAction::ZoomOut,
            ShortcutAction::Cancel => return None,
        };
        Some(action)
    }
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; elsewhere `ctrl` plays the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"n"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "s" | "S" => Some(ShortcutAction::Save),
                _ => None,
            };
        }

        if shift {
            // Shift+= arrives as "+" on most layouts.
            return match key {
                "+" => Some(ShortcutAction::ZoomIn),
                _ => None,
            };
        }

        match key {
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "n" | "N" => Some(ShortcutAction::ToolNode),
            "p" | "P" => Some(ShortcutAction::ToolPath),
            "b" | "B" => Some(ShortcutAction::ToolBeacon),
            "h" | "H" => Some(ShortcutAction::ToolPan),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
