//! Stage/viewport controller.
//!
//! Owns the screen ↔ graph transform gestures: wheel zoom about the pointer,
//! stage panning, and press/release tracking that tells clicks from drags.
//! Clicks on empty canvas are dispatched by tool here; clicks and drags on
//! shapes go to [`crate::tools`].
//!
//! Drags are previewed, not committed: the store sees one `move_*` or one
//! viewport update when the pointer is released.

use crate::config::EditorConfig;
use crate::input::InputEvent;
use crate::store::EditorStore;
use crate::tools::{self, ShapeClick, Tool};
use floormap_core::{EntityId, LocationType, Point, Positioned, ViewportPatch, ViewportState};
use floormap_render::{ShapeTarget, build_display_list, hit_test};

/// Result of a click on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageClick {
    NodeAdded(EntityId),
    BeaconAdded(EntityId),
    PathCancelled,
    SelectionCleared,
    /// The click landed on a shape and went to the shape handlers.
    Shape(ShapeClick),
}

/// What a handled input event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    Click(StageClick),
    ShapeMoved(ShapeTarget),
    Panned,
    Zoomed,
    /// Gesture in progress; the host should redraw the preview.
    Preview,
    Resized,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureKind {
    /// Press that can only end as a click.
    Click,
    /// Press on a draggable shape; `origin` is its graph position at press.
    Shape { target: ShapeTarget, origin: Point },
    /// Stage drag; `origin` is the pan offset at press.
    Pan { origin: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    kind: GestureKind,
    /// Shape under the pointer at press, for the click fallback.
    hit: Option<ShapeTarget>,
    start: Point,
    last: Point,
    moved: bool,
}

#[derive(Debug, Clone)]
pub struct StageController {
    config: EditorConfig,
    width: f64,
    height: f64,
    gesture: Option<Gesture>,
}

impl Default for StageController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl StageController {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            width: config.default_width,
            height: config.default_height,
            config,
            gesture: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ─── Canvas size ─────────────────────────────────────────────────────

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    // ─── Coordinates ─────────────────────────────────────────────────────

    /// Screen → graph space under the store's current viewport.
    pub fn screen_to_graph(&self, store: &EditorStore, screen: Point) -> Point {
        store.viewport().to_graph(screen)
    }

    /// Topmost shape under a screen point.
    pub fn hit_at(&self, store: &EditorStore, screen: Point) -> Option<ShapeTarget> {
        let list = build_display_list(&store.render_input());
        hit_test(&list, self.screen_to_graph(store, screen))
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    /// One wheel notch, keeping the graph point under `pointer` fixed.
    pub fn handle_wheel(&self, store: &mut EditorStore, pointer: Point, delta_y: f64) {
        let old = store.viewport();
        let anchor = old.to_graph(pointer);
        let direction = if delta_y < 0.0 { 1 } else { -1 };
        let scale = self
            .config
            .clamp_scale(old.scale * self.config.wheel_zoom_factor.powi(direction));
        store.set_viewport(ViewportPatch {
            x: Some(pointer.x - anchor.x * scale),
            y: Some(pointer.y - anchor.y * scale),
            scale: Some(scale),
        });
        log::trace!("wheel zoom {:.3} -> {scale:.3}", old.scale);
    }

    /// Multiply the scale by `factor`, clamped. The pan offset is kept.
    pub fn zoom_by(&self, store: &mut EditorStore, factor: f64) {
        let scale = self.config.clamp_scale(store.viewport().scale * factor);
        store.set_viewport(ViewportPatch::scale(scale));
    }

    pub fn zoom_in(&self, store: &mut EditorStore) {
        self.zoom_by(store, self.config.button_zoom_step);
    }

    pub fn zoom_out(&self, store: &mut EditorStore) {
        self.zoom_by(store, 1.0 / self.config.button_zoom_step);
    }

    // ─── Clicks ──────────────────────────────────────────────────────────

    /// A click at a screen point: shapes first, then the empty-canvas
    /// behavior of the active tool.
    pub fn handle_click(&self, store: &mut EditorStore, screen: Point) -> StageClick {
        let hit = self.hit_at(store, screen);
        self.dispatch_click(store, screen, hit)
    }

    fn dispatch_click(
        &self,
        store: &mut EditorStore,
        screen: Point,
        hit: Option<ShapeTarget>,
    ) -> StageClick {
        if let Some(target) = hit {
            return StageClick::Shape(tools::handle_shape_click(store, target));
        }
        let p = self.screen_to_graph(store, screen);
        match store.active_tool() {
            Tool::Node => StageClick::NodeAdded(store.add_node(p.x, p.y, LocationType::default())),
            Tool::Beacon => StageClick::BeaconAdded(store.add_beacon(p.x, p.y)),
            Tool::Path => {
                store.cancel_path();
                StageClick::PathCancelled
            }
            Tool::Select | Tool::Pan => {
                store.clear_selection();
                StageClick::SelectionCleared
            }
        }
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    pub fn handle(&mut self, store: &mut EditorStore, event: &InputEvent) -> StageEvent {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.pointer_down(store, Point::new(x, y));
                StageEvent::None
            }
            InputEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(store, Point::new(x, y)),
            InputEvent::Wheel { x, y, delta_y } => {
                self.handle_wheel(store, Point::new(x, y), delta_y);
                StageEvent::Zoomed
            }
            InputEvent::Resize { width, height } => {
                self.resize(width, height);
                StageEvent::Resized
            }
        }
    }

    pub fn pointer_down(&mut self, store: &EditorStore, screen: Point) {
        let hit = self.hit_at(store, screen);
        let kind = if store.active_tool().stage_draggable() {
            let vp = store.viewport();
            GestureKind::Pan {
                origin: Point::new(vp.x, vp.y),
            }
        } else {
            match hit.and_then(|t| Some((t, shape_position(store, t)?))) {
                Some((target, origin)) if tools::can_drag(store, target) => {
                    GestureKind::Shape { target, origin }
                }
                _ => GestureKind::Click,
            }
        };
        self.gesture = Some(Gesture {
            kind,
            hit,
            start: screen,
            last: screen,
            moved: false,
        });
    }

    pub fn pointer_move(&mut self, screen: Point) -> StageEvent {
        let tolerance = self.config.click_tolerance;
        let Some(gesture) = self.gesture.as_mut() else {
            return StageEvent::None;
        };
        gesture.last = screen;
        if !gesture.moved && screen.distance_to(gesture.start) > tolerance {
            gesture.moved = true;
        }
        match gesture.kind {
            GestureKind::Click => StageEvent::None,
            GestureKind::Shape { .. } | GestureKind::Pan { .. } if gesture.moved => {
                StageEvent::Preview
            }
            _ => StageEvent::None,
        }
    }

    pub fn pointer_up(&mut self, store: &mut EditorStore, screen: Point) -> StageEvent {
        let Some(mut gesture) = self.gesture.take() else {
            return StageEvent::None;
        };
        gesture.last = screen;
        if !gesture.moved && screen.distance_to(gesture.start) > self.config.click_tolerance {
            gesture.moved = true;
        }
        if !gesture.moved {
            return StageEvent::Click(self.dispatch_click(store, gesture.start, gesture.hit));
        }

        let dx = gesture.last.x - gesture.start.x;
        let dy = gesture.last.y - gesture.start.y;
        match gesture.kind {
            GestureKind::Click => StageEvent::None,
            GestureKind::Shape { target, origin } => {
                let scale = store.viewport().scale;
                tools::handle_shape_drag_end(
                    store,
                    target,
                    origin.x + dx / scale,
                    origin.y + dy / scale,
                );
                StageEvent::ShapeMoved(target)
            }
            GestureKind::Pan { origin } => {
                store.set_viewport(ViewportPatch::pan(origin.x + dx, origin.y + dy));
                StageEvent::Panned
            }
        }
    }

    /// Abandon the current gesture without committing anything.
    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }

    // ─── Previews ────────────────────────────────────────────────────────

    /// The shape being dragged and its graph-space offset so far.
    pub fn drag_preview(&self, store: &EditorStore) -> Option<(ShapeTarget, f64, f64)> {
        let gesture = self.gesture.as_ref().filter(|g| g.moved)?;
        let GestureKind::Shape { target, .. } = gesture.kind else {
            return None;
        };
        let scale = store.viewport().scale;
        Some((
            target,
            (gesture.last.x - gesture.start.x) / scale,
            (gesture.last.y - gesture.start.y) / scale,
        ))
    }

    /// The viewport to draw with: the store's, offset by any pan in progress.
    pub fn preview_viewport(&self, store: &EditorStore) -> ViewportState {
        let mut viewport = store.viewport();
        if let Some(Gesture {
            kind: GestureKind::Pan { origin },
            start,
            last,
            moved: true,
            ..
        }) = self.gesture
        {
            viewport.x = origin.x + last.x - start.x;
            viewport.y = origin.y + last.y - start.y;
        }
        viewport
    }
}

fn shape_position(store: &EditorStore, target: ShapeTarget) -> Option<Point> {
    let graph = store.graph();
    match target {
        ShapeTarget::Node(id) => graph.node(id).map(Positioned::position),
        ShapeTarget::Beacon(id) => graph.beacon(id).map(Positioned::position),
        ShapeTarget::Edge(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floormap_core::Selection;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn wheel_zoom_keeps_pointer_anchor() {
        let stage = StageController::default();
        let mut store = EditorStore::new();
        store.set_viewport(ViewportPatch {
            x: Some(30.0),
            y: Some(-10.0),
            scale: Some(1.5),
        });
        let pointer = Point::new(200.0, 150.0);
        let before = store.viewport().to_graph(pointer);
        stage.handle_wheel(&mut store, pointer, -1.0);
        let after = store.viewport().to_graph(pointer);
        assert!(approx(store.viewport().scale, 1.5 * 1.08));
        assert!(approx(before.x, after.x) && approx(before.y, after.y));
    }

    #[test]
    fn wheel_down_zooms_out_and_clamps() {
        let stage = StageController::default();
        let mut store = EditorStore::new();
        store.set_viewport(ViewportPatch::scale(0.105));
        stage.handle_wheel(&mut store, Point::ORIGIN, 1.0);
        assert_eq!(store.viewport().scale, 0.1);
    }

    #[test]
    fn toolbar_zoom_clamps_at_max() {
        let stage = StageController::default();
        let mut store = EditorStore::new();
        store.set_viewport(ViewportPatch::scale(4.5));
        stage.zoom_in(&mut store);
        assert_eq!(store.viewport().scale, 5.0);
        stage.zoom_out(&mut store);
        assert!(approx(store.viewport().scale, 5.0 / 1.2));
    }

    #[test]
    fn node_tool_click_adds_at_graph_point() {
        let stage = StageController::default();
        let mut store = EditorStore::new();
        store.set_viewport(ViewportPatch {
            x: Some(100.0),
            y: Some(50.0),
            scale: Some(2.0),
        });
        store.set_active_tool(Tool::Node);
        let StageClick::NodeAdded(id) = stage.handle_click(&mut store, Point::new(300.0, 250.0))
        else {
            panic!("expected a new node");
        };
        let node = store.graph().node(id).unwrap();
        assert_eq!((node.coordinate_x, node.coordinate_y), (100.0, 100.0));
        assert_eq!(node.kind, LocationType::Corridor);
    }

    #[test]
    fn node_tool_click_on_existing_node_adds_nothing() {
        let stage = StageController::default();
        let mut store = EditorStore::new();
        store.add_node(50.0, 50.0, LocationType::Office);
        store.set_active_tool(Tool::Node);
        assert_eq!(
            stage.handle_click(&mut store, Point::new(52.0, 50.0)),
            StageClick::Shape(ShapeClick::Ignored)
        );
        assert_eq!(store.graph().node_count(), 1);
    }

    #[test]
    fn path_tool_empty_click_cancels() {
        let stage = StageController::default();
        let mut store = EditorStore::new();
        let a = store.add_node(0.0, 0.0, LocationType::Corridor);
        store.set_active_tool(Tool::Path);
        store.start_path(a);
        assert_eq!(
            stage.handle_click(&mut store, Point::new(400.0, 400.0)),
            StageClick::PathCancelled
        );
        assert_eq!(store.path_source(), None);
    }

    #[test]
    fn select_tool_empty_click_clears_selection() {
        let stage = StageController::default();
        let mut store = EditorStore::new();
        store.add_beacon(0.0, 0.0);
        assert_eq!(
            stage.handle_click(&mut store, Point::new(300.0, 300.0)),
            StageClick::SelectionCleared
        );
        assert_eq!(store.selection(), Selection::None);
    }

    #[test]
    fn dragging_a_node_commits_on_release() {
        let mut stage = StageController::default();
        let mut store = EditorStore::new();
        store.set_viewport(ViewportPatch::scale(2.0));
        let id = store.add_node(10.0, 10.0, LocationType::Lab);

        stage.pointer_down(&store, Point::new(20.0, 20.0));
        assert_eq!(stage.pointer_move(Point::new(40.0, 30.0)), StageEvent::Preview);
        assert_eq!(
            stage.drag_preview(&store),
            Some((ShapeTarget::Node(id), 10.0, 5.0))
        );
        // Nothing committed yet.
        assert_eq!(store.graph().node(id).unwrap().coordinate_x, 10.0);

        assert_eq!(
            stage.pointer_up(&mut store, Point::new(40.0, 30.0)),
            StageEvent::ShapeMoved(ShapeTarget::Node(id))
        );
        let node = store.graph().node(id).unwrap();
        assert_eq!((node.coordinate_x, node.coordinate_y), (20.0, 15.0));
        assert_eq!(stage.drag_preview(&store), None);
    }

    #[test]
    fn small_jitter_is_still_a_click() {
        let mut stage = StageController::default();
        let mut store = EditorStore::new();
        let id = store.add_node(10.0, 10.0, LocationType::Lab);
        store.clear_selection();

        stage.pointer_down(&store, Point::new(10.0, 10.0));
        stage.pointer_move(Point::new(11.0, 11.0));
        assert_eq!(
            stage.pointer_up(&mut store, Point::new(11.0, 11.0)),
            StageEvent::Click(StageClick::Shape(ShapeClick::Selected(Selection::Node(id))))
        );
        assert_eq!(store.graph().node(id).unwrap().coordinate_x, 10.0);
    }

    #[test]
    fn pan_tool_drag_moves_the_viewport() {
        let mut stage = StageController::default();
        let mut store = EditorStore::new();
        store.add_node(10.0, 10.0, LocationType::Lab);
        store.set_active_tool(Tool::Pan);

        stage.pointer_down(&store, Point::new(10.0, 10.0));
        stage.pointer_move(Point::new(60.0, 30.0));
        assert_eq!(stage.preview_viewport(&store).x, 50.0);
        assert_eq!(store.viewport().x, 0.0);
        assert_eq!(
            stage.pointer_up(&mut store, Point::new(60.0, 30.0)),
            StageEvent::Panned
        );
        assert_eq!(store.viewport().x, 50.0);
        assert_eq!(store.viewport().y, 20.0);
        // Shapes never move under the pan tool.
        assert_eq!(store.graph().nodes().next().unwrap().coordinate_x, 10.0);
    }

    #[test]
    fn shapes_do_not_drag_outside_select() {
        let mut stage = StageController::default();
        let mut store = EditorStore::new();
        let id = store.add_node(10.0, 10.0, LocationType::Lab);
        store.set_active_tool(Tool::Beacon);

        stage.pointer_down(&store, Point::new(10.0, 10.0));
        stage.pointer_move(Point::new(80.0, 80.0));
        assert_eq!(stage.drag_preview(&store), None);
        assert_eq!(stage.pointer_up(&mut store, Point::new(80.0, 80.0)), StageEvent::None);
        assert_eq!(store.graph().node(id).unwrap().coordinate_x, 10.0);
    }

    #[test]
    fn resize_event_updates_size() {
        let mut stage = StageController::default();
        let mut store = EditorStore::new();
        assert_eq!(stage.size(), (800.0, 600.0));
        stage.handle(
            &mut store,
            &InputEvent::Resize {
                width: 1024.0,
                height: 768.0,
            },
        );
        assert_eq!(stage.size(), (1024.0, 768.0));
    }
}
