//! Per-frame field physics.
//!
//! [`AnimationState`] is the whole mutable state of one mounted field. It is
//! advanced by [`advance`], a pure step that reads the pointer and never
//! touches the drawing surface; drawing happens afterwards in
//! [`render_frame`](crate::render_frame).
//!
//! Rates are per reference frame (60 Hz). `dt = 1.0` is exactly one frame.

use hx_config::FieldConfig;
use rand::Rng;

use crate::paint::{Point, SurfaceSize};
use crate::particle::{Orb, Particle, ParticleClass};

pub const ORB_PHASE_STEP: f32 = 0.008;
/// Pointer influence radius.
pub const POINTER_RADIUS: f32 = 200.0;
pub const ATTRACTION: f32 = 8e-5;
pub const OPACITY_RISE: f32 = 0.02;
pub const OPACITY_DECAY: f32 = 0.008;
pub const DAMPING: f32 = 0.99;
/// Largest accepted step, in reference frames.
pub const MAX_DT: f32 = 4.0;
/// Opacity within this of its target lands on it; absorbs f32 accumulation error.
const OPACITY_SNAP: f32 = 1e-4;

pub const WAVE_PERIOD: u64 = 120;
pub const WAVE_SPEED: f32 = 3.0;
pub const WAVE_MAX_RADIUS: f32 = 360.0;
pub const WAVE_BASE_OPACITY: f32 = 0.15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub large: usize,
    pub bright: usize,
    pub normal: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub particles: Vec<Particle>,
    pub orbs: Vec<Orb>,
    pub surface: SurfaceSize,
    /// Monotonic frame counter; phases the pointer ring and grid pulse.
    pub frame: u64,
}

impl AnimationState {
    /// Allocates the population for `surface`. An empty surface yields an empty field.
    pub fn new<R: Rng + ?Sized>(config: &FieldConfig, surface: SurfaceSize, rng: &mut R) -> Self {
        if surface.is_empty() {
            return Self { particles: Vec::new(), orbs: Vec::new(), surface, frame: 0 };
        }
        let particles = (0..config.population)
            .map(|i| Particle::spawn(i, surface, rng))
            .collect();
        let orbs = (0..config.orbs).map(|_| Orb::spawn(surface, rng)).collect();
        Self { particles, orbs, surface, frame: 0 }
    }

    /// Changes the wrap bounds only; positions outside wrap on the next step.
    pub fn resize(&mut self, surface: SurfaceSize) {
        if !surface.is_empty() {
            self.surface = surface;
        }
    }

    pub fn class_counts(&self) -> ClassCounts {
        self.particles.iter().fold(ClassCounts::default(), |mut c, p| {
            match p.class {
                ParticleClass::Large => c.large += 1,
                ParticleClass::Bright => c.bright += 1,
                ParticleClass::Normal => c.normal += 1,
            }
            c
        })
    }

    /// Stroke opacity of the ambient hex grid for the current frame.
    pub fn grid_opacity(&self) -> f32 {
        0.05 + 0.02 * (self.frame as f64 * 0.02).sin() as f32
    }

    /// Radius and opacity of the expanding pointer ring, `None` when invisible.
    pub fn wave(&self) -> Option<(f32, f32)> {
        let radius = (self.frame % WAVE_PERIOD) as f32 * WAVE_SPEED;
        let opacity = WAVE_BASE_OPACITY - (radius / WAVE_MAX_RADIUS) * WAVE_BASE_OPACITY;
        (opacity > 0.0).then_some((radius, opacity))
    }

    /// Advances one step in place. See [`advance`].
    pub fn step(&mut self, pointer: Point, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 1.0 };
        let (w, h) = (self.surface.w(), self.surface.h());
        self.frame += 1;

        for orb in &mut self.orbs {
            orb.pulse_phase += ORB_PHASE_STEP * dt;
            orb.x = wrap(orb.x + orb.drift_x * dt, w);
            orb.y = wrap(orb.y + orb.drift_y * dt, h);
        }

        let damping = if dt == 1.0 { DAMPING } else { DAMPING.powf(dt) };
        for p in &mut self.particles {
            p.pulse_phase += p.pulse_speed * dt;

            let dx = pointer.x - p.x;
            let dy = pointer.y - p.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < POINTER_RADIUS {
                let force = (POINTER_RADIUS - dist) / POINTER_RADIUS;
                p.vx += dx * ATTRACTION * force * dt;
                p.vy += dy * ATTRACTION * force * dt;
                p.opacity = rise_towards(p.opacity, 1.0, OPACITY_RISE * dt);
            } else {
                p.opacity = fall_towards(p.opacity, p.class.opacity_floor(), OPACITY_DECAY * dt);
            }

            p.vx *= damping;
            p.vy *= damping;
            p.x = wrap(p.x + p.vx * dt, w);
            p.y = wrap(p.y + p.vy * dt, h);
        }
    }
}

/// Pure frame step: consumes the state and returns it advanced by `dt`
/// reference frames toward `pointer`.
pub fn advance(mut state: AnimationState, pointer: Point, dt: f32) -> AnimationState {
    state.step(pointer, dt);
    state
}

/// Teleports a coordinate across the surface so it lands in `[0, extent)`.
#[inline]
pub fn wrap(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return v;
    }
    if (0.0..extent).contains(&v) {
        return v;
    }
    let wrapped = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

fn rise_towards(current: f32, ceiling: f32, rate: f32) -> f32 {
    let next = (current + rate).min(ceiling);
    if ceiling - next < OPACITY_SNAP {
        ceiling
    } else {
        next
    }
}

fn fall_towards(current: f32, floor: f32, rate: f32) -> f32 {
    // A particle already below its floor (never the case after spawn) rises no further.
    if current <= floor {
        return current.max(0.0);
    }
    let next = (current - rate).max(floor);
    if next - floor < OPACITY_SNAP {
        floor
    } else {
        next
    }
}
