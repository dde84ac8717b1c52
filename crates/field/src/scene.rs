//! Frame composition.
//!
//! Draw order, back to front: orb glows, hex grid, particles (glow then
//! core), connection lines, pointer ring.

use hx_config::ConnectionIndex;

use crate::connections::find_connections;
use crate::paint::{Painter, Point};
use crate::palette;
use crate::state::AnimationState;

pub const HEX_RADIUS: f32 = 20.0;
pub const HEX_ROW_STEP: f32 = 60.0;
/// `40 * sqrt(3)`.
pub const HEX_COL_STEP: f32 = 69.282_03;
pub const GLOW_SCALE: f32 = 4.0;
pub const GRID_LINE_WIDTH: f32 = 1.0;
pub const LINK_WIDTH: f32 = 1.0;
pub const WAVE_WIDTH: f32 = 2.0;

/// What one `render_frame` call drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub orbs: usize,
    pub hexagons: usize,
    pub glows: usize,
    pub cores: usize,
    pub connections: usize,
    pub wave: bool,
}

/// Vertices of a flat-sided hexagon, starting at `-pi/6`.
pub fn hexagon(center: Point, radius: f32) -> [Point; 6] {
    let mut out = [Point::default(); 6];
    for (k, v) in out.iter_mut().enumerate() {
        let angle = std::f32::consts::FRAC_PI_3 * k as f32 - std::f32::consts::FRAC_PI_6;
        *v = Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
    }
    out
}

/// Centres of the ambient hex grid covering `width x height`. Rows and
/// columns continue until a full hexagon width past each edge.
pub fn hex_grid_centers(width: f32, height: f32) -> Vec<Point> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let rows = grid_steps(height + 2.0 * HEX_RADIUS, HEX_ROW_STEP);
    let cols = grid_steps(width + 2.0 * HEX_RADIUS, HEX_COL_STEP);
    let mut out = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let offset = if row % 2 == 1 { HEX_COL_STEP * 0.5 } else { 0.0 };
        for col in 0..cols {
            out.push(Point::new(col as f32 * HEX_COL_STEP + offset, row as f32 * HEX_ROW_STEP));
        }
    }
    out
}

/// Number of `k >= 0` with `k * step < limit`.
fn grid_steps(limit: f32, step: f32) -> usize {
    (limit / step).ceil().max(0.0) as usize
}

/// Copies of `center` shifted by the surface extent on every axis where a
/// disc of `radius` spills over an edge. Always includes `center` first.
fn wrapped_copies(center: Point, radius: f32, width: f32, height: f32) -> Vec<Point> {
    let xs = shifts(center.x, radius, width);
    let ys = shifts(center.y, radius, height);
    let mut out = Vec::with_capacity(xs.len() * ys.len());
    for &dy in &ys {
        for &dx in &xs {
            out.push(Point::new(center.x + dx, center.y + dy));
        }
    }
    out
}

fn shifts(v: f32, radius: f32, extent: f32) -> Vec<f32> {
    let mut s = vec![0.0];
    if v - radius < 0.0 {
        s.push(extent);
    }
    if v + radius > extent {
        s.push(-extent);
    }
    s
}

/// Draws the current state. Pure with respect to `state`.
pub fn render_frame<P: Painter + ?Sized>(
    state: &AnimationState,
    pointer: Point,
    painter: &mut P,
    index: ConnectionIndex,
) -> FrameStats {
    let mut stats = FrameStats::default();
    let (w, h) = (state.surface.w(), state.surface.h());
    painter.clear();

    for orb in &state.orbs {
        let pulse = orb.pulse();
        let radius = orb.render_radius();
        let stops = palette::orb_stops(pulse);
        for c in wrapped_copies(orb.position(), radius, w, h) {
            painter.fill_radial(c, radius, &stops);
            stats.orbs += 1;
        }
    }

    let grid = palette::grid_color(state.grid_opacity());
    for c in hex_grid_centers(w, h) {
        painter.stroke_polygon(&hexagon(c, HEX_RADIUS), GRID_LINE_WIDTH, grid);
        stats.hexagons += 1;
    }

    for p in &state.particles {
        let pulse = p.pulse();
        let size = p.render_size();
        if let Some(glow) = palette::glow_stops(p.class, pulse, p.opacity) {
            painter.fill_radial(p.position(), size * GLOW_SCALE, &glow);
            stats.glows += 1;
        }
        painter.fill_radial(p.position(), size, &palette::core_stops(p.class, pulse, p.opacity));
        stats.cores += 1;
    }

    for c in find_connections(&state.particles, index) {
        let (a, b) = (&state.particles[c.a], &state.particles[c.b]);
        let stops = palette::connection_stops(c.opacity, a.opacity, b.opacity);
        painter.stroke_line(a.position(), b.position(), LINK_WIDTH, &stops);
        stats.connections += 1;
    }

    if let Some((radius, opacity)) = state.wave() {
        painter.stroke_circle(pointer, radius, WAVE_WIDTH, palette::wave_color(opacity));
        stats.wave = true;
    }
    stats
}
