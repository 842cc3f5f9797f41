//! Colors and sizes for the floor-plan canvas.
//!
//! Color carries meaning here: node fill encodes location type, gold marks
//! the selection, red marks inaccessible paths, cyan marks beacons and the
//! pending path source.

use floormap_core::LocationType;

/// 8-bit sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque color from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 255,
        }
    }

    /// `#RRGGBB` for Canvas2D style strings.
    pub fn to_css(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_peniko(self) -> peniko::Color {
        peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

pub const NODE_RADIUS: f64 = 10.0;
pub const BEACON_RADIUS: f64 = 8.0;
/// Gap between a shape and its selection ring.
pub const RING_GAP: f64 = 4.0;
/// Extra radius of the beacon's pulse ring.
pub const PULSE_GAP: f64 = 8.0;
pub const LABEL_OFFSET: f64 = 4.0;
/// Invisible stroke width used when hit-testing edges.
pub const EDGE_HIT_WIDTH: f64 = 12.0;
pub const PATH_SOURCE_DASH: [f64; 2] = [4.0, 3.0];

pub const WHITE: Rgba = Rgba::hex(0xFFFFFF);
pub const SELECTED: Rgba = Rgba::hex(0xFFD700);
pub const EDGE: Rgba = Rgba::hex(0xFCD34D);
pub const EDGE_INACCESSIBLE: Rgba = Rgba::hex(0xEF4444);
pub const PATH_SOURCE: Rgba = Rgba::hex(0x22D3EE);
pub const BEACON: Rgba = Rgba::hex(0x22D3EE);

/// Node fill color by location type.
pub fn type_color(kind: LocationType) -> Rgba {
    match kind {
        LocationType::Classroom => Rgba::hex(0x3B82F6),
        LocationType::Corridor => Rgba::hex(0x9CA3AF),
        LocationType::Elevator => Rgba::hex(0x8B5CF6),
        LocationType::Stairs => Rgba::hex(0xF59E0B),
        LocationType::Restroom => Rgba::hex(0x06B6D4),
        LocationType::Exit => Rgba::hex(0xEF4444),
        LocationType::Office => Rgba::hex(0x10B981),
        LocationType::Lab => Rgba::hex(0xEC4899),
        LocationType::Auditorium => Rgba::hex(0xF97316),
        LocationType::Library => Rgba::hex(0x6366F1),
        LocationType::Cafeteria => Rgba::hex(0x84CC16),
        LocationType::Other => Rgba::hex(0x6B7280),
    }
}
