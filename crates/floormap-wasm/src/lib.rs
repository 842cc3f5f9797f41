//! WASM bridge for Floormap: exposes the editor engine to the web admin UI.
//!
//! Compiled via `wasm-pack build --target web`. Entities cross the boundary
//! as JSON strings; failures come back as `JsValue` error strings.

mod logger;
mod render2d;

use floormap_core::{
    EntityId, Floor, GraphSyncPayload, LintSeverity, MapBeacon, MapEdge, MapNode, Point, lint_graph,
};
use floormap_editor::{
    EditorConfig, EditorStore, InputEvent, PanelEdit, PanelView, SaveSession, ShortcutMap,
    StageController, StageEvent, Tool, ToolbarAction, ToolbarOutcome, ToolbarState, apply_edit,
    apply_shortcut, dispatch,
};
use floormap_render::build_display_list;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Entity arrays handed over at hydration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GraphData {
    nodes: Vec<MapNode>,
    edges: Vec<MapEdge>,
    beacons: Vec<MapBeacon>,
}

fn parse_graph(json: &str) -> Result<GraphData, serde_json::Error> {
    serde_json::from_str(json)
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The main WASM-facing editor controller.
///
/// Holds the store, stage controller and save session. All interaction from
/// the page goes through this struct.
#[wasm_bindgen]
pub struct MapCanvas {
    store: EditorStore,
    stage: StageController,
    session: SaveSession,
    /// Floor-plan image, decoded by the page.
    background: Option<HtmlImageElement>,
}

#[wasm_bindgen]
impl MapCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();

        let mut stage = StageController::new(EditorConfig::default());
        stage.resize(width, height);
        Self {
            store: EditorStore::new(),
            stage,
            session: SaveSession::new(),
            background: None,
        }
    }

    // ─── Hydration ───────────────────────────────────────────────────────

    /// Set the floor descriptor (JSON object, or `null` to clear).
    pub fn set_floor(&mut self, json: &str) -> Result<(), JsValue> {
        let floor: Option<Floor> = serde_json::from_str(json).map_err(js_error)?;
        self.store.set_floor(floor);
        Ok(())
    }

    pub fn set_background_image(&mut self, image: Option<HtmlImageElement>) {
        self.background = image;
    }

    pub fn begin_loading(&mut self) {
        self.store.begin_loading();
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Replace the graph with `{"nodes":[...],"edges":[...],"beacons":[...]}`.
    pub fn load_graph(&mut self, json: &str) -> Result<(), JsValue> {
        let data = parse_graph(json).map_err(js_error)?;
        self.store.load_graph(data.nodes, data.edges, data.beacons);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.stage.cancel_gesture();
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let mut list = build_display_list(&self.store.render_input());
        if let Some((target, dx, dy)) = self.stage.drag_preview(&self.store) {
            list.displace(target, dx, dy);
        }
        let (width, height) = self.stage.size();
        render2d::render_display_list(
            ctx,
            &list,
            &self.stage.preview_viewport(&self.store),
            width,
            height,
            self.background.as_ref(),
        );
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.stage.resize(width, height);
    }

    // ─── Pointer input ───────────────────────────────────────────────────
    //
    // Each handler returns `true` when the canvas should be redrawn.

    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(InputEvent::PointerDown { x, y })
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(InputEvent::PointerMove { x, y })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(InputEvent::PointerUp { x, y })
    }

    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> bool {
        self.handle_input(InputEvent::Wheel { x, y, delta_y })
    }

    /// Graph-space coordinates of a screen point, as `[x, y]`.
    pub fn screen_to_graph(&self, x: f64, y: f64) -> Vec<f64> {
        let p = self.stage.screen_to_graph(&self.store, Point::new(x, y));
        vec![p.x, p.y]
    }

    fn handle_input(&mut self, event: InputEvent) -> bool {
        !matches!(
            self.stage.handle(&mut self.store, &event),
            StageEvent::None | StageEvent::Resized
        )
    }

    // ─── Tools & toolbar ─────────────────────────────────────────────────

    /// Switch tool by name. Returns `false` for an unknown name.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match Tool::parse(name) {
            Some(tool) => {
                self.store.set_active_tool(tool);
                true
            }
            None => {
                log::warn!("unknown tool `{name}`");
                false
            }
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.store.active_tool().as_str().to_string()
    }

    /// Toolbar state as JSON.
    pub fn get_toolbar_json(&self) -> String {
        let state = ToolbarState::from_store(&self.store, self.session.is_saving());
        serde_json::to_string(&state).unwrap_or_default()
    }

    /// Run a toolbar action given as JSON, e.g. `{"action":"zoom_in"}`.
    /// Returns `true` when the host should start a save.
    pub fn toolbar_action(&mut self, json: &str) -> Result<bool, JsValue> {
        let action: ToolbarAction = serde_json::from_str(json).map_err(js_error)?;
        Ok(dispatch(&mut self.store, &self.stage, action) == ToolbarOutcome::SaveRequested)
    }

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"handled":bool,"save":bool,"tool":"<tool_name>"}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let (handled, save) = match ShortcutMap::resolve(key, ctrl, shift, alt, meta) {
            Some(action) => (
                true,
                apply_shortcut(&mut self.store, &self.stage, action)
                    == ToolbarOutcome::SaveRequested,
            ),
            None => (false, false),
        };
        serde_json::json!({
            "handled": handled,
            "save": save,
            "tool": self.store.active_tool().as_str(),
        })
        .to_string()
    }

    // ─── Properties panel ────────────────────────────────────────────────

    pub fn get_panel_json(&self) -> String {
        serde_json::to_string(&PanelView::from_store(&self.store)).unwrap_or_default()
    }

    /// Apply a panel edit, e.g. `{"field":"node_name","value":"Lobby"}`.
    pub fn apply_panel_edit(&mut self, id: &str, json: &str) -> Result<(), JsValue> {
        let edit: PanelEdit = serde_json::from_str(json).map_err(js_error)?;
        apply_edit(&mut self.store, EntityId::intern(id), edit);
        Ok(())
    }

    // ─── Status ──────────────────────────────────────────────────────────

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn get_stats_json(&self) -> String {
        serde_json::to_string(&self.store.stats()).unwrap_or_default()
    }

    /// Lint findings as a JSON array.
    pub fn get_lint_json(&self) -> String {
        lint_json(&self.store)
    }

    // ─── Save ────────────────────────────────────────────────────────────

    /// Validate and snapshot the graph. Returns the sync payload as JSON for
    /// the page to POST; rejects with the first validation error.
    pub fn begin_save(&mut self) -> Result<String, JsValue> {
        let payload: GraphSyncPayload = self.session.begin(&self.store).map_err(js_error)?;
        match payload.to_json() {
            Ok(json) => Ok(json),
            Err(err) => {
                // Release the session so the user can retry.
                let _ = self.session.finish(&mut self.store, Err(err.to_string()));
                Err(js_error(err))
            }
        }
    }

    /// Report the transport result. `error` is `None` on success.
    pub fn finish_save(&mut self, error: Option<String>) -> Result<(), JsValue> {
        let outcome = error.map_or(Ok(()), Err);
        self.session
            .finish(&mut self.store, outcome)
            .map_err(js_error)
    }

    pub fn is_saving(&self) -> bool {
        self.session.is_saving()
    }
}

fn lint_json(store: &EditorStore) -> String {
    let diags: Vec<serde_json::Value> = lint_graph(store.graph())
        .into_iter()
        .map(|d| {
            serde_json::json!({
                "entity": d.entity,
                "id": d.entity_id,
                "rule": d.rule,
                "severity": match d.severity {
                    LintSeverity::Warning => "warning",
                    LintSeverity::Info => "info",
                },
                "message": d.message,
            })
        })
        .collect();
    serde_json::Value::Array(diags).to_string()
}

/// Install the console logger at `level` (`"error"` .. `"trace"`).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    logger::init(logger::parse_level(level));
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Floormap WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floormap_core::LocationType;
    use pretty_assertions::assert_eq;

    const GRAPH: &str = r#"{
        "nodes": [
            {"id": "n-1", "name": "Lobby", "room_number": "", "type": "CORRIDOR",
             "floor_id": "f", "coordinate_x": 0, "coordinate_y": 0, "is_navigable": true},
            {"id": "n-2", "name": "", "room_number": "101", "type": "CLASSROOM",
             "floor_id": "f", "coordinate_x": 30, "coordinate_y": 40, "is_navigable": true}
        ],
        "edges": [
            {"id": "e-1", "source_id": "n-1", "target_id": "n-2", "distance": 50,
             "is_accessible": true}
        ]
    }"#;

    #[test]
    fn parse_graph_defaults_missing_arrays() {
        let data = parse_graph(GRAPH).unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[1].kind, LocationType::Classroom);
        assert_eq!(data.edges.len(), 1);
        assert!(data.beacons.is_empty());
    }

    #[test]
    fn parse_graph_rejects_unknown_type() {
        let bad = GRAPH.replace("CLASSROOM", "BALLROOM");
        assert!(parse_graph(&bad).is_err());
    }

    #[test]
    fn lint_json_lists_findings() {
        let data = parse_graph(GRAPH).unwrap();
        let mut store = EditorStore::new();
        store.load_graph(data.nodes, data.edges, data.beacons);
        let value: serde_json::Value = serde_json::from_str(&lint_json(&store)).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "entity": "node",
                "id": "n-2",
                "rule": "unnamed-node",
                "severity": "warning",
                "message": "Node n-2 has no name; the save will be rejected until it is named.",
            }])
        );
    }
}
