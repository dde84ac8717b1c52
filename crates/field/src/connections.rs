//! Connection lines between bright/large particles.
//!
//! Only connectable particles are scanned, so the pairwise cost is O(k^2) in
//! the connectable count `k`, not the population. The grid index buckets
//! connectable particles into link-distance cells and only compares
//! neighbouring buckets; both strategies return the same pairs in the same
//! `(a, b)` order.

use hx_config::ConnectionIndex;
use std::collections::HashMap;

use crate::particle::Particle;

/// Particles closer than this are connected.
pub const CONNECT_DISTANCE: f32 = 180.0;
pub const CONNECT_MAX_OPACITY: f32 = 0.4;
/// `Auto` switches to the grid index above this many connectable particles.
pub const AUTO_GRID_THRESHOLD: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the lower-numbered particle.
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// Line opacity for two particles `distance` apart; `None` when too far.
/// Depends only on distance, so it is symmetric in the two endpoints.
#[inline]
pub fn connection_opacity(distance: f32) -> Option<f32> {
    (distance < CONNECT_DISTANCE).then(|| (1.0 - distance / CONNECT_DISTANCE) * CONNECT_MAX_OPACITY)
}

#[inline]
fn pair_distance(a: &Particle, b: &Particle) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

fn link(particles: &[Particle], a: usize, b: usize) -> Option<Connection> {
    let distance = pair_distance(&particles[a], &particles[b]);
    connection_opacity(distance).map(|opacity| Connection { a, b, distance, opacity })
}

/// Finds every connected pair using the requested index strategy.
pub fn find_connections(particles: &[Particle], index: ConnectionIndex) -> Vec<Connection> {
    let eligible: Vec<usize> = particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.class.is_connectable())
        .map(|(i, _)| i)
        .collect();
    let use_grid = match index {
        ConnectionIndex::Pairwise => false,
        ConnectionIndex::Grid => true,
        ConnectionIndex::Auto => eligible.len() > AUTO_GRID_THRESHOLD,
    };
    if use_grid {
        grid(particles, &eligible)
    } else {
        pairwise(particles, &eligible)
    }
}

fn pairwise(particles: &[Particle], eligible: &[usize]) -> Vec<Connection> {
    let mut out = Vec::new();
    for (n, &a) in eligible.iter().enumerate() {
        for &b in &eligible[n + 1..] {
            if let Some(c) = link(particles, a, b) {
                out.push(c);
            }
        }
    }
    out
}

fn cell_of(p: &Particle) -> (i32, i32) {
    (
        (p.x / CONNECT_DISTANCE).floor() as i32,
        (p.y / CONNECT_DISTANCE).floor() as i32,
    )
}

fn grid(particles: &[Particle], eligible: &[usize]) -> Vec<Connection> {
    let mut buckets: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for &i in eligible {
        buckets.entry(cell_of(&particles[i])).or_default().push(i);
    }
    let mut out = Vec::new();
    for &a in eligible {
        let (cx, cy) = cell_of(&particles[a]);
        for ny in cy - 1..=cy + 1 {
            for nx in cx - 1..=cx + 1 {
                let Some(bucket) = buckets.get(&(nx, ny)) else { continue };
                for &b in bucket {
                    if b <= a {
                        continue;
                    }
                    if let Some(c) = link(particles, a, b) {
                        out.push(c);
                    }
                }
            }
        }
    }
    out.sort_by_key(|c| (c.a, c.b));
    out
}
