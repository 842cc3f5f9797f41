//! Editor state → display list.
//!
//! A pure projection: the same input always yields the same primitives, in
//! paint order (background, edges, nodes, beacons). Backends (Vello here,
//! Canvas2D in the wasm bridge) only walk the list.

use crate::theme::{self, Rgba};
use floormap_core::{EntityId, FloorGraph, Point, Positioned, Selection, SelectionKind};

/// What a listening shape stands for; reported by hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTarget {
    Node(EntityId),
    Edge(EntityId),
    Beacon(EntityId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub center: Point,
    pub radius: f64,
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: f64,
    pub dash: Option<[f64; 2]>,
    pub opacity: f64,
    pub shadow: bool,
    /// Entity this shape belongs to, decoration included.
    pub owner: Option<ShapeTarget>,
    /// Only listening shapes are reported by hit testing.
    pub listening: bool,
    pub draggable: bool,
}

impl CircleShape {
    /// A non-listening outline ring around `owner`.
    fn ring(owner: ShapeTarget, center: Point, radius: f64, stroke: Rgba, width: f64) -> Self {
        Self {
            center,
            radius,
            fill: None,
            stroke: Some(stroke),
            stroke_width: width,
            dash: None,
            opacity: 1.0,
            shadow: false,
            owner: Some(owner),
            listening: false,
            draggable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub from: Point,
    pub to: Point,
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub hit_width: f64,
    pub target: ShapeTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub owner: Option<ShapeTarget>,
    pub origin: Point,
    pub text: String,
    pub font_size: f64,
    pub fill: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Floor-plan image drawn at the graph origin.
    Image { url: String },
    Line(LineShape),
    Circle(CircleShape),
    Label(Label),
}

/// Primitives in paint order (last = topmost).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub primitives: Vec<Primitive>,
}

impl DisplayList {
    pub fn circles(&self) -> impl Iterator<Item = &CircleShape> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Circle(c) => Some(c),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineShape> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line(l) => Some(l),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label(l) => Some(l),
            _ => None,
        })
    }

    /// Shift every circle and label owned by `owner`. Used to preview a drag
    /// before it is committed; attached edges stay put until then.
    pub fn displace(&mut self, owner: ShapeTarget, dx: f64, dy: f64) {
        for prim in &mut self.primitives {
            match prim {
                Primitive::Circle(c) if c.owner == Some(owner) => {
                    c.center = Point::new(c.center.x + dx, c.center.y + dy);
                }
                Primitive::Label(l) if l.owner == Some(owner) => {
                    l.origin = Point::new(l.origin.x + dx, l.origin.y + dy);
                }
                _ => {}
            }
        }
    }
}

/// Everything the projection reads.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub graph: &'a FloorGraph,
    pub selection: Selection,
    pub path_source: Option<EntityId>,
    /// Shapes can be dragged only while the select tool is active.
    pub shapes_draggable: bool,
    pub background_url: Option<&'a str>,
}

/// Project editor state into a display list.
pub fn build_display_list(input: &RenderInput<'_>) -> DisplayList {
    let mut list = DisplayList::default();
    let graph = input.graph;

    if let Some(url) = input.background_url.filter(|u| !u.is_empty()) {
        list.primitives.push(Primitive::Image {
            url: url.to_string(),
        });
    }

    // ── Edges ──
    for edge in graph.edges() {
        let (Some(src), Some(tgt)) = (graph.node(edge.source_id), graph.node(edge.target_id))
        else {
            log::trace!("skip edge {} with missing endpoint", edge.id);
            continue;
        };
        let selected = input.selection.is(SelectionKind::Edge, edge.id);
        let stroke = if selected {
            theme::SELECTED
        } else if !edge.is_accessible {
            theme::EDGE_INACCESSIBLE
        } else {
            theme::EDGE
        };
        list.primitives.push(Primitive::Line(LineShape {
            from: src.position(),
            to: tgt.position(),
            stroke,
            stroke_width: if selected { 3.0 } else { 2.0 },
            hit_width: theme::EDGE_HIT_WIDTH,
            target: ShapeTarget::Edge(edge.id),
        }));
    }

    // ── Nodes ──
    for node in graph.nodes() {
        let center = node.position();
        let selected = input.selection.is(SelectionKind::Node, node.id);
        let path_source = input.path_source == Some(node.id);
        let owner = ShapeTarget::Node(node.id);

        if path_source || selected {
            let mut ring = CircleShape::ring(
                owner,
                center,
                theme::NODE_RADIUS + theme::RING_GAP,
                if path_source {
                    theme::PATH_SOURCE
                } else {
                    theme::SELECTED
                },
                2.0,
            );
            if path_source {
                ring.dash = Some(theme::PATH_SOURCE_DASH);
            }
            list.primitives.push(Primitive::Circle(ring));
        }

        list.primitives.push(Primitive::Circle(CircleShape {
            center,
            radius: theme::NODE_RADIUS,
            fill: Some(theme::type_color(node.kind)),
            stroke: Some(theme::WHITE),
            stroke_width: 1.5,
            dash: None,
            opacity: 1.0,
            shadow: true,
            owner: Some(owner),
            listening: true,
            draggable: input.shapes_draggable,
        }));

        if !node.name.is_empty() {
            list.primitives.push(Primitive::Label(Label {
                owner: Some(owner),
                origin: Point::new(
                    center.x + theme::NODE_RADIUS + theme::LABEL_OFFSET,
                    center.y - 6.0,
                ),
                text: node.name.clone(),
                font_size: 11.0,
                fill: theme::WHITE,
            }));
        }
    }

    // ── Beacons ──
    for beacon in graph.beacons() {
        let center = beacon.position();
        let owner = ShapeTarget::Beacon(beacon.id);
        if input.selection.is(SelectionKind::Beacon, beacon.id) {
            list.primitives.push(Primitive::Circle(CircleShape::ring(
                owner,
                center,
                theme::BEACON_RADIUS + theme::RING_GAP,
                theme::SELECTED,
                2.0,
            )));
        }

        let mut pulse = CircleShape::ring(
            owner,
            center,
            theme::BEACON_RADIUS + theme::PULSE_GAP,
            theme::BEACON,
            1.0,
        );
        pulse.opacity = 0.4;
        list.primitives.push(Primitive::Circle(pulse));

        list.primitives.push(Primitive::Circle(CircleShape {
            center,
            radius: theme::BEACON_RADIUS,
            fill: Some(theme::BEACON),
            stroke: Some(theme::WHITE),
            stroke_width: 1.5,
            dash: None,
            opacity: 1.0,
            shadow: false,
            owner: Some(owner),
            listening: true,
            draggable: input.shapes_draggable,
        }));

        if !beacon.name.is_empty() {
            list.primitives.push(Primitive::Label(Label {
                owner: Some(owner),
                origin: Point::new(
                    center.x + theme::BEACON_RADIUS + theme::LABEL_OFFSET,
                    center.y - 6.0,
                ),
                text: beacon.name.clone(),
                font_size: 10.0,
                fill: theme::BEACON,
            }));
        }
    }

    list
}
