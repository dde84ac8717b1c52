//! Particle and orb entities plus their spawn rules.

use rand::Rng;
use std::f32::consts::TAU;
use std::ops::Range;

use crate::paint::{Point, SurfaceSize};

/// Particles with index below this are `Large`.
pub const LARGE_COUNT: usize = 10;
/// Particles with index below this (and not large) are `Bright`.
pub const BRIGHT_END: usize = 30;

const INITIAL_SPEED: f32 = 0.2;
const PULSE_SPEED: Range<f32> = 0.02..0.05;
const ORB_RADIUS: Range<f32> = 50.0..150.0;
const ORB_DRIFT: f32 = 0.15;

/// Rendering weight of a particle, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleClass {
    Normal,
    Bright,
    Large,
}

impl ParticleClass {
    pub fn for_index(i: usize) -> Self {
        if i < LARGE_COUNT {
            Self::Large
        } else if i < BRIGHT_END {
            Self::Bright
        } else {
            Self::Normal
        }
    }

    pub fn size_range(self) -> Range<f32> {
        match self {
            Self::Large => 3.0..7.0,
            Self::Bright => 2.0..4.0,
            Self::Normal => 1.0..3.0,
        }
    }

    pub fn initial_opacity(self) -> f32 {
        match self {
            Self::Large => 0.8,
            Self::Bright => 0.6,
            Self::Normal => 0.4,
        }
    }

    /// Opacity a particle relaxes to while the pointer is far away.
    pub fn opacity_floor(self) -> f32 {
        match self {
            Self::Large => 0.5,
            Self::Bright => 0.4,
            Self::Normal => 0.2,
        }
    }

    /// Only bright and large particles glow and take part in connection lines.
    pub fn is_connectable(self) -> bool {
        self != Self::Normal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub opacity: f32,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    pub class: ParticleClass,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(index: usize, surface: SurfaceSize, rng: &mut R) -> Self {
        let class = ParticleClass::for_index(index);
        Self {
            x: rng.gen_range(0.0..surface.w()),
            y: rng.gen_range(0.0..surface.h()),
            vx: rng.gen_range(-INITIAL_SPEED..=INITIAL_SPEED),
            vy: rng.gen_range(-INITIAL_SPEED..=INITIAL_SPEED),
            size: rng.gen_range(class.size_range()),
            opacity: class.initial_opacity(),
            pulse_phase: rng.gen_range(0.0..TAU),
            pulse_speed: rng.gen_range(PULSE_SPEED),
            class,
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Current pulse value in `0..=1`.
    #[inline]
    pub fn pulse(&self) -> f32 {
        0.5 + 0.5 * self.pulse_phase.sin()
    }

    pub fn render_size(&self) -> f32 {
        self.size * (0.8 + 0.4 * self.pulse())
    }

    pub fn render_opacity(&self) -> f32 {
        self.opacity * (0.7 + 0.3 * self.pulse())
    }
}

/// Large, slow background glow.
#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub pulse_phase: f32,
    pub drift_x: f32,
    pub drift_y: f32,
}

impl Orb {
    pub fn spawn<R: Rng + ?Sized>(surface: SurfaceSize, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..surface.w()),
            y: rng.gen_range(0.0..surface.h()),
            radius: rng.gen_range(ORB_RADIUS),
            pulse_phase: rng.gen_range(0.0..TAU),
            drift_x: rng.gen_range(-ORB_DRIFT..=ORB_DRIFT),
            drift_y: rng.gen_range(-ORB_DRIFT..=ORB_DRIFT),
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Radius multiplier in `0.4..=1.0`.
    #[inline]
    pub fn pulse(&self) -> f32 {
        0.7 + 0.3 * self.pulse_phase.sin()
    }

    pub fn render_radius(&self) -> f32 {
        self.radius * self.pulse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn class_boundaries() {
        assert_eq!(ParticleClass::for_index(0), ParticleClass::Large);
        assert_eq!(ParticleClass::for_index(9), ParticleClass::Large);
        assert_eq!(ParticleClass::for_index(10), ParticleClass::Bright);
        assert_eq!(ParticleClass::for_index(29), ParticleClass::Bright);
        assert_eq!(ParticleClass::for_index(30), ParticleClass::Normal);
    }

    #[test]
    fn spawn_respects_class_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let surface = SurfaceSize::new(640, 480);
        for i in 0..80 {
            let p = Particle::spawn(i, surface, &mut rng);
            assert!(p.class.size_range().contains(&p.size));
            assert_eq!(p.opacity, p.class.initial_opacity());
            assert!((0.0..640.0).contains(&p.x) && (0.0..480.0).contains(&p.y));
            assert!(p.vx.abs() <= 0.2 && p.vy.abs() <= 0.2);
            assert!((0.02..0.05).contains(&p.pulse_speed));
            assert!((0.0..TAU).contains(&p.pulse_phase));
        }
    }

    #[test]
    fn orb_spawn_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let o = Orb::spawn(SurfaceSize::new(300, 200), &mut rng);
            assert!((50.0..150.0).contains(&o.radius));
            assert!(o.drift_x.abs() <= 0.15 && o.drift_y.abs() <= 0.15);
            assert!((0.4..=1.0).contains(&o.pulse()));
        }
    }

    #[test]
    fn render_scaling_tracks_pulse() {
        let mut p = Particle::spawn(0, SurfaceSize::new(10, 10), &mut StdRng::seed_from_u64(1));
        p.size = 5.0;
        p.opacity = 1.0;
        p.pulse_phase = std::f32::consts::FRAC_PI_2; // pulse = 1
        assert!((p.render_size() - 6.0).abs() < 1e-5);
        assert!((p.render_opacity() - 1.0).abs() < 1e-5);
        p.pulse_phase = -std::f32::consts::FRAC_PI_2; // pulse = 0
        assert!((p.render_size() - 4.0).abs() < 1e-5);
        assert!((p.render_opacity() - 0.7).abs() < 1e-5);
    }
}
