//! Baked splash textures.

use hx_field::palette::{ACCENT_GLOW, PRIMARY_GLOW};
use hx_field::scene::{hex_grid_centers, hexagon, HEX_RADIUS};
use hx_field::{ColorStop, Painter, PixelCanvas, Point, Rgba, SurfaceSize};

/// Side of the rotating rings texture.
pub const RINGS_SIZE: u32 = 128;
pub const DOT_TEXTURE: u32 = 64;
pub const DOT_RADIUS: f32 = 8.0;
pub const BAR_WIDTH: u32 = 256;
pub const BAR_HEIGHT: u32 = 4;
pub const SCAN_WIDTH: u32 = 64;
const WHITE: [u8; 3] = [255, 255, 255];

/// Three pointy-top hexagons in a 100-unit box: `(inset, stroke, alpha)`.
const RINGS: [(f32, f32, f32); 3] = [(5.0, 1.0, 0.3), (15.0, 1.0, 0.5), (25.0, 2.0, 1.0)];

/// Pointy-top hexagon inscribed `inset` units inside a 100-unit box.
fn ring(inset: f32, scale: f32) -> [Point; 6] {
    let r = 50.0 - inset;
    let half_w = r - 5.0;
    let pts = [
        (50.0, 50.0 - r),
        (50.0 + half_w, 50.0 - r * 0.5),
        (50.0 + half_w, 50.0 + r * 0.5),
        (50.0, 50.0 + r),
        (50.0 - half_w, 50.0 + r * 0.5),
        (50.0 - half_w, 50.0 - r * 0.5),
    ];
    pts.map(|(x, y)| Point::new(x * scale, y * scale))
}

pub fn bake_rings() -> PixelCanvas {
    let mut canvas = PixelCanvas::new(SurfaceSize::new(RINGS_SIZE, RINGS_SIZE));
    let scale = RINGS_SIZE as f32 / 100.0;
    for (inset, stroke, alpha) in RINGS {
        canvas.stroke_polygon(&ring(inset, scale), stroke * scale, Rgba::rgb8(PRIMARY_GLOW, alpha));
    }
    canvas
}

/// Solid dot with a soft glow around it.
pub fn bake_dot() -> PixelCanvas {
    let mut canvas = PixelCanvas::new(SurfaceSize::new(DOT_TEXTURE, DOT_TEXTURE));
    let half = DOT_TEXTURE as f32 * 0.5;
    let edge = DOT_RADIUS / half;
    let core = Rgba::rgb8(PRIMARY_GLOW, 1.0);
    let glow = Rgba::rgb8(PRIMARY_GLOW, 0.8);
    canvas.fill_radial(
        Point::new(half, half),
        half,
        &[
            ColorStop::new(0.0, core),
            ColorStop::new(edge, core),
            ColorStop::new(edge + 0.01, glow.with_alpha(0.5)),
            ColorStop::new(1.0, glow.with_alpha(0.0)),
        ],
    );
    canvas
}

/// Static hex grid behind the splash content.
pub fn bake_grid(size: SurfaceSize) -> PixelCanvas {
    let mut canvas = PixelCanvas::new(size);
    let color = Rgba::rgb8(PRIMARY_GLOW, 0.2);
    for c in hex_grid_centers(size.w(), size.h()) {
        canvas.stroke_polygon(&hexagon(c, HEX_RADIUS), 1.0, color);
    }
    canvas
}

/// Left-to-right primary -> accent gradient, stretched to the fill width.
pub fn bake_progress_fill() -> PixelCanvas {
    let mut canvas = PixelCanvas::new(SurfaceSize::new(BAR_WIDTH, BAR_HEIGHT));
    let y = BAR_HEIGHT as f32 * 0.5;
    canvas.stroke_line(
        Point::new(0.0, y),
        Point::new(BAR_WIDTH as f32, y),
        BAR_HEIGHT as f32,
        &[
            ColorStop::new(0.0, Rgba::rgb8(PRIMARY_GLOW, 1.0)),
            ColorStop::new(1.0, Rgba::rgb8(ACCENT_GLOW, 1.0)),
        ],
    );
    canvas
}

/// Highlight that sweeps the progress bar: clear at both ends, white/20 in the middle.
pub fn bake_scan() -> PixelCanvas {
    let mut canvas = PixelCanvas::new(SurfaceSize::new(SCAN_WIDTH, BAR_HEIGHT));
    let y = BAR_HEIGHT as f32 * 0.5;
    canvas.stroke_line(
        Point::new(0.0, y),
        Point::new(SCAN_WIDTH as f32, y),
        BAR_HEIGHT as f32,
        &[
            ColorStop::new(0.0, Rgba::rgb8(WHITE, 0.0)),
            ColorStop::new(0.5, Rgba::rgb8(WHITE, 0.2)),
            ColorStop::new(1.0, Rgba::rgb8(WHITE, 0.0)),
        ],
    );
    canvas
}
