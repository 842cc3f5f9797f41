//! Display list → Vello drawing commands.
//!
//! Call once per frame with a freshly-cleared `Scene`; the caller presents
//! the scene via wgpu. The viewport transform is applied here so the display
//! list stays in graph space.

use crate::scene::{CircleShape, DisplayList, LineShape, Primitive};
use floormap_core::ViewportState;
use kurbo::{Affine, Circle, Line, Stroke};
use peniko::Fill;
use vello::Scene;

/// Graph → screen transform for a viewport.
pub fn viewport_affine(viewport: &ViewportState) -> Affine {
    Affine::translate((viewport.x, viewport.y)) * Affine::scale(viewport.scale)
}

/// Paint the display list to a Vello scene under the viewport transform.
pub fn paint_display_list(scene: &mut Scene, list: &DisplayList, viewport: &ViewportState) {
    let transform = viewport_affine(viewport);
    for prim in &list.primitives {
        match prim {
            Primitive::Image { url } => {
                // Decoding is the host's job; the image arrives as a separate layer.
                log::trace!("floor plan {url} left to host");
            }
            Primitive::Line(line) => paint_line(scene, line, transform),
            Primitive::Circle(circle) => paint_circle(scene, circle, transform),
            Primitive::Label(label) => {
                // No font context on the native path yet; labels are traced only.
                log::trace!(
                    "label {:?} at ({}, {}) skipped",
                    label.text,
                    label.origin.x,
                    label.origin.y
                );
            }
        }
    }
}

// ─── Shape painters ──────────────────────────────────────────────────────

fn paint_line(scene: &mut Scene, line: &LineShape, transform: Affine) {
    let shape = Line::new((line.from.x, line.from.y), (line.to.x, line.to.y));
    scene.stroke(
        &Stroke::new(line.stroke_width),
        transform,
        line.stroke.to_peniko(),
        None,
        &shape,
    );
}

fn paint_circle(scene: &mut Scene, circle: &CircleShape, transform: Affine) {
    let shape = Circle::new((circle.center.x, circle.center.y), circle.radius);
    let alpha = circle.opacity.clamp(0.0, 1.0) as f32;

    if let Some(fill) = circle.fill {
        let color = fill.to_peniko().multiply_alpha(alpha);
        scene.fill(Fill::NonZero, transform, color, None, &shape);
    }

    if let Some(stroke) = circle.stroke {
        let mut style = Stroke::new(circle.stroke_width);
        if let Some(dash) = circle.dash {
            style = style.with_dashes(0.0, dash);
        }
        let color = stroke.to_peniko().multiply_alpha(alpha);
        scene.stroke(&style, transform, color, None, &shape);
    }
}
