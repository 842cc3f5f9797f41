//! Canvas2D renderer.
//!
//! Draws a display list to an HTML `<canvas>` via `CanvasRenderingContext2d`
//! under the viewport transform. The web editor uses this instead of the
//! Vello painter.

use floormap_core::ViewportState;
use floormap_render::{DisplayList, Primitive};
use floormap_render::scene::{CircleShape, Label, LineShape};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

const FONT_FAMILY: &str = "Inter, system-ui, sans-serif";
const SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.25)";

/// Clear the canvas and draw `list` under `viewport`.
pub fn render_display_list(
    ctx: &CanvasRenderingContext2d,
    list: &DisplayList,
    viewport: &ViewportState,
    canvas_width: f64,
    canvas_height: f64,
    background: Option<&HtmlImageElement>,
) {
    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.clear_rect(0.0, 0.0, canvas_width, canvas_height);
    let _ = ctx.set_transform(
        viewport.scale,
        0.0,
        0.0,
        viewport.scale,
        viewport.x,
        viewport.y,
    );

    for prim in &list.primitives {
        match prim {
            Primitive::Image { url } => match background {
                Some(img) if img.complete() => {
                    let _ = ctx.draw_image_with_html_image_element(img, 0.0, 0.0);
                }
                _ => log::trace!("floor plan {url} not loaded yet"),
            },
            Primitive::Line(line) => draw_line(ctx, line),
            Primitive::Circle(circle) => draw_circle(ctx, circle),
            Primitive::Label(label) => draw_label(ctx, label),
        }
    }
}

fn draw_line(ctx: &CanvasRenderingContext2d, line: &LineShape) {
    ctx.begin_path();
    ctx.move_to(line.from.x, line.from.y);
    ctx.line_to(line.to.x, line.to.y);
    ctx.set_stroke_style_str(&line.stroke.to_css());
    ctx.set_line_width(line.stroke_width);
    ctx.set_line_cap("round");
    ctx.stroke();
}

fn draw_circle(ctx: &CanvasRenderingContext2d, circle: &CircleShape) {
    ctx.save();
    ctx.set_global_alpha(circle.opacity.clamp(0.0, 1.0));
    ctx.begin_path();
    let _ = ctx.arc(
        circle.center.x,
        circle.center.y,
        circle.radius,
        0.0,
        std::f64::consts::TAU,
    );

    if let Some(fill) = circle.fill {
        if circle.shadow {
            ctx.set_shadow_blur(4.0);
            ctx.set_shadow_offset_y(1.0);
            ctx.set_shadow_color(SHADOW_COLOR);
        }
        ctx.set_fill_style_str(&fill.to_css());
        ctx.fill();
        clear_shadow(ctx);
    }

    if let Some(stroke) = circle.stroke {
        if let Some([on, off]) = circle.dash {
            let _ = ctx.set_line_dash(&js_sys::Array::of2(
                &JsValue::from_f64(on),
                &JsValue::from_f64(off),
            ));
        }
        ctx.set_stroke_style_str(&stroke.to_css());
        ctx.set_line_width(circle.stroke_width);
        ctx.stroke();
    }
    ctx.restore();
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &Label) {
    ctx.set_font(&format!("{}px {FONT_FAMILY}", label.font_size));
    ctx.set_fill_style_str(&label.fill.to_css());
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    let _ = ctx.fill_text(&label.text, label.origin.x, label.origin.y);
}

/// Clear shadow after fill so the stroke doesn't inherit it.
fn clear_shadow(ctx: &CanvasRenderingContext2d) {
    ctx.set_shadow_blur(0.0);
    ctx.set_shadow_offset_y(0.0);
    ctx.set_shadow_color("transparent");
}
