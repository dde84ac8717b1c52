//! Centralized colours and gradient-stop builders.
//!
//! Every colour the field draws is computed here as plain data, so the
//! stops can be checked without a rendering surface.

use crate::paint::{ColorStop, Rgba};
use crate::particle::ParticleClass;

pub const CYAN: [u8; 3] = [0, 229, 255];
pub const SKY: [u8; 3] = [0, 200, 255];
pub const AZURE: [u8; 3] = [0, 180, 255];
pub const AQUA: [u8; 3] = [0, 255, 255];
pub const WHITE: [u8; 3] = [255, 255, 255];
/// Page background behind the canvas.
pub const BACKGROUND: [u8; 3] = [5, 8, 15];
/// `hsl(185 100% 55%)`, the primary accent.
pub const PRIMARY_GLOW: [u8; 3] = [26, 236, 255];
/// `hsl(200 100% 60%)`, the secondary accent.
pub const ACCENT_GLOW: [u8; 3] = [51, 187, 255];

pub fn background() -> Rgba {
    Rgba::rgb8(BACKGROUND, 1.0)
}

/// Background orb glow; `pulse` is the orb's radius multiplier.
pub fn orb_stops(pulse: f32) -> [ColorStop; 3] {
    [
        ColorStop::new(0.0, Rgba::rgb8(CYAN, 0.15 * pulse)),
        ColorStop::new(0.5, Rgba::rgb8(SKY, 0.08 * pulse)),
        ColorStop::new(1.0, Rgba::rgb8(AZURE, 0.0)),
    ]
}

/// Render opacity for a particle of base `opacity` at `pulse`.
#[inline]
pub fn pulsed_opacity(opacity: f32, pulse: f32) -> f32 {
    opacity * (0.7 + 0.3 * pulse)
}

/// Outer glow drawn beneath bright and large particles; `None` for normal ones.
pub fn glow_stops(class: ParticleClass, pulse: f32, opacity: f32) -> Option<[ColorStop; 3]> {
    if !class.is_connectable() {
        return None;
    }
    let o = pulsed_opacity(opacity, pulse);
    Some([
        ColorStop::new(0.0, Rgba::rgb8(CYAN, o * 0.4)),
        ColorStop::new(0.5, Rgba::rgb8(SKY, o * 0.1)),
        ColorStop::new(1.0, Rgba::rgb8(AZURE, 0.0)),
    ])
}

/// Particle core: white centre fading through cyan to the rim.
pub fn core_stops(_class: ParticleClass, pulse: f32, opacity: f32) -> [ColorStop; 3] {
    let o = pulsed_opacity(opacity, pulse);
    [
        ColorStop::new(0.0, Rgba::rgb8(WHITE, o)),
        ColorStop::new(0.3, Rgba::rgb8(AQUA, o * 0.9)),
        ColorStop::new(1.0, Rgba::rgb8(SKY, o * 0.3)),
    ]
}

/// Connection line tinted by each endpoint's current opacity.
pub fn connection_stops(line_opacity: f32, from_opacity: f32, to_opacity: f32) -> [ColorStop; 3] {
    [
        ColorStop::new(0.0, Rgba::rgb8(CYAN, line_opacity * from_opacity)),
        ColorStop::new(0.5, Rgba::rgb8(AQUA, line_opacity * 0.8)),
        ColorStop::new(1.0, Rgba::rgb8(CYAN, line_opacity * to_opacity)),
    ]
}

pub fn grid_color(opacity: f32) -> Rgba {
    Rgba::rgb8(CYAN, opacity)
}

pub fn wave_color(opacity: f32) -> Rgba {
    Rgba::rgb8(CYAN, opacity)
}
