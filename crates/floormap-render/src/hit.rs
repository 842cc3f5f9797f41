//! Hit testing: graph-space point → shape lookup.
//!
//! Reverse-walks the display list (front-to-back) so the topmost listening
//! shape wins. Decoration (rings, labels, the background) never listens.

use crate::scene::{DisplayList, Primitive, ShapeTarget};
use floormap_core::Point;

/// Find the topmost interactive shape at `p` (graph space).
/// Returns `None` if the point hits empty canvas.
pub fn hit_test(list: &DisplayList, p: Point) -> Option<ShapeTarget> {
    list.primitives.iter().rev().find_map(|prim| match prim {
        Primitive::Circle(c) if c.listening => {
            let reach = c.radius + c.stroke_width / 2.0;
            if p.distance_to(c.center) <= reach {
                c.owner
            } else {
                None
            }
        }
        Primitive::Line(l) => {
            (p.distance_to_segment(l.from, l.to) <= l.hit_width / 2.0).then_some(l.target)
        }
        Primitive::Circle(_) | Primitive::Image { .. } | Primitive::Label(_) => None,
    })
}
