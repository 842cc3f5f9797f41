//! Floormap rendering: a pure projection of editor state into a display
//! list, hit testing against that list, and a Vello painter for native hosts.

pub mod hit;
pub mod paint;
pub mod scene;
pub mod theme;

pub use hit::hit_test;
pub use scene::{DisplayList, Primitive, RenderInput, ShapeTarget, build_display_list};
