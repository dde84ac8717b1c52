//! Static glow layers drawn above the particle field.
//!
//! Each layer is baked once into a [`PixelCanvas`]; only its overall opacity
//! changes over time, given by the timing functions here.

use crate::paint::{ColorStop, Point, Rgba, SurfaceSize};
use crate::palette::{ACCENT_GLOW, BACKGROUND, PRIMARY_GLOW};
use crate::raster::PixelCanvas;

/// Side of the square corner glow boxes, in pixels.
pub const CORNER_BOX: u32 = 384;
pub const TOP_GLOW_FADE_SECS: f32 = 2.0;
pub const CORNER_LOW: f32 = 0.3;
pub const CORNER_HIGH: f32 = 0.5;
const SQRT_2: f32 = std::f32::consts::SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayLayer {
    /// Background-coloured fade at the top and bottom edges.
    Vignette,
    /// Wide elliptical glow hanging from the top centre.
    TopGlow,
    TopLeftCorner,
    BottomRightCorner,
}

impl OverlayLayer {
    pub const ALL: [OverlayLayer; 4] = [
        OverlayLayer::Vignette,
        OverlayLayer::TopGlow,
        OverlayLayer::TopLeftCorner,
        OverlayLayer::BottomRightCorner,
    ];

    /// Texture size for this layer on a window of `window` pixels.
    pub fn bake_size(self, window: SurfaceSize) -> SurfaceSize {
        match self {
            Self::Vignette | Self::TopGlow => window,
            Self::TopLeftCorner | Self::BottomRightCorner => SurfaceSize::new(CORNER_BOX, CORNER_BOX),
        }
    }

    /// `(period, delay)` of a breathing layer, in seconds.
    pub fn breathing(self) -> Option<(f32, f32)> {
        match self {
            Self::TopLeftCorner => Some((4.0, 0.0)),
            Self::BottomRightCorner => Some((5.0, 1.0)),
            _ => None,
        }
    }

    /// Layer opacity `secs` after the field appeared.
    pub fn opacity(self, secs: f32, vignette_opacity: f32) -> f32 {
        match self {
            Self::Vignette => vignette_opacity,
            Self::TopGlow => top_glow_opacity(secs),
            Self::TopLeftCorner | Self::BottomRightCorner => {
                let (period, delay) = self.breathing().unwrap_or((4.0, 0.0));
                corner_glow_opacity(secs, period, delay)
            }
        }
    }
}

/// Linear fade-in over two seconds.
pub fn top_glow_opacity(secs: f32) -> f32 {
    (secs.max(0.0) / TOP_GLOW_FADE_SECS).min(1.0)
}

/// Breathes `0.3 -> 0.5 -> 0.3` once per `period`, easing in and out on each
/// half. Holds at the low value during `delay`.
pub fn corner_glow_opacity(secs: f32, period: f32, delay: f32) -> f32 {
    CORNER_LOW + (CORNER_HIGH - CORNER_LOW) * breathe(secs - delay, period)
}

/// Eased `0 -> 1 -> 0` cycle repeating every `period`; 0 for `t <= 0`.
pub fn breathe(t: f32, period: f32) -> f32 {
    if t <= 0.0 || period <= 0.0 {
        return 0.0;
    }
    let half = period * 0.5;
    let phase = t.rem_euclid(period);
    let u = if phase < half { phase / half } else { (period - phase) / half };
    ease_in_out(u)
}

/// Smoothstep easing on `0..=1`.
#[inline]
pub fn ease_in_out(u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    u * u * (3.0 - 2.0 * u)
}

/// Rasterizes `layer` at full strength; the host scales it by [`OverlayLayer::opacity`].
pub fn bake(layer: OverlayLayer, window: SurfaceSize) -> PixelCanvas {
    let size = layer.bake_size(window);
    let mut canvas = PixelCanvas::new(size);
    if size.is_empty() {
        return canvas;
    }
    let (w, h) = (size.w(), size.h());
    match layer {
        OverlayLayer::Vignette => {
            let bg = Rgba::rgb8(BACKGROUND, 1.0);
            canvas.fill_vertical(&[
                ColorStop::new(0.0, bg),
                ColorStop::new(0.5, bg.with_alpha(0.0)),
                ColorStop::new(1.0, bg),
            ]);
        }
        OverlayLayer::TopGlow => {
            let c = Rgba::rgb8(PRIMARY_GLOW, 0.15);
            // Farthest-corner ellipse from the top centre.
            canvas.fill_elliptical(
                Point::new(w * 0.5, 0.0),
                w * 0.5 * SQRT_2,
                h * SQRT_2,
                &[ColorStop::new(0.0, c), ColorStop::new(0.6, c.with_alpha(0.0))],
            );
        }
        OverlayLayer::TopLeftCorner => {
            corner(&mut canvas, Point::new(0.0, 0.0), w, h, PRIMARY_GLOW);
        }
        OverlayLayer::BottomRightCorner => {
            corner(&mut canvas, Point::new(w, h), w, h, ACCENT_GLOW);
        }
    }
    canvas
}

fn corner(canvas: &mut PixelCanvas, origin: Point, w: f32, h: f32, rgb: [u8; 3]) {
    let c = Rgba::rgb8(rgb, 0.12);
    canvas.fill_elliptical(
        origin,
        w * SQRT_2,
        h * SQRT_2,
        &[ColorStop::new(0.0, c), ColorStop::new(0.7, c.with_alpha(0.0))],
    );
}
