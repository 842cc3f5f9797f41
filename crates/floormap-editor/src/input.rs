//! Input abstraction layer.
//!
//! Hosts normalize mouse and touch events into `InputEvent`s in screen
//! (canvas-element) pixels; the stage controller maps them to graph space.

/// A normalized input event from the canvas host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f64, y: f64 },

    PointerMove { x: f64, y: f64 },

    PointerUp { x: f64, y: f64 },

    /// Wheel notch at the pointer position. Negative `delta_y` zooms in.
    Wheel { x: f64, y: f64, delta_y: f64 },

    /// Canvas element resized.
    Resize { width: f64, height: f64 },
}
