// Debug tools crate: frame stats for the particle field, logged on an interval.
// Enabled in the binary with `--features debug`. F1 toggles the periodic log.

use bevy::prelude::*;
use hx_core::{BackdropConfigRes, PresentSet};
use hx_rendering::FieldHost;

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct DebugStats {
    /// Exponential moving average.
    pub fps: f32,
    pub frame_time_ms: f32,
    pub field_frame: u64,
    pub particles: usize,
    pub connections: usize,
    pub glows: usize,
    pub mounted: bool,
}

#[derive(Resource, Debug)]
pub struct DebugState {
    pub logging_enabled: bool,
    pub log_timer: Timer,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            logging_enabled: true,
            log_timer: Timer::from_seconds(2.0, TimerMode::Repeating),
        }
    }
}

/// Blends a new sample into an EMA; the first sample seeds it.
pub fn ema(current: f32, sample: f32) -> f32 {
    if current == 0.0 {
        sample
    } else {
        current * 0.9 + sample * 0.1
    }
}

pub fn debug_stats_collect_system(time: Res<Time>, host: Option<Res<FieldHost>>, mut stats: ResMut<DebugStats>) {
    let dt = time.delta_secs().max(1e-6);
    stats.fps = ema(stats.fps, 1.0 / dt);
    stats.frame_time_ms = ema(stats.frame_time_ms, dt * 1000.0);
    let Some(host) = host else {
        stats.mounted = false;
        return;
    };
    stats.mounted = host.is_mounted();
    stats.field_frame = host.frame().unwrap_or_default();
    stats.particles = host
        .animator()
        .and_then(|a| a.state())
        .map(|s| s.particles.len())
        .unwrap_or_default();
    if let Some(frame) = host.stats() {
        stats.connections = frame.connections;
        stats.glows = frame.glows;
    }
}

pub fn debug_key_input_system(keys: Option<Res<ButtonInput<KeyCode>>>, mut state: ResMut<DebugState>) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::F1) {
        state.logging_enabled = !state.logging_enabled;
        info!(enabled = state.logging_enabled, "DEBUG stats logging toggled");
    }
}

pub fn debug_logging_system(
    time: Res<Time>,
    cfg: Res<BackdropConfigRes>,
    stats: Res<DebugStats>,
    mut state: ResMut<DebugState>,
) {
    let interval = cfg.debug.log_interval_secs.max(0.1);
    if (state.log_timer.duration().as_secs_f32() - interval).abs() > f32::EPSILON {
        state.log_timer.set_duration(std::time::Duration::from_secs_f32(interval));
    }
    if !state.log_timer.tick(time.delta()).just_finished() || !state.logging_enabled {
        return;
    }
    info!(
        fps = format!("{:.1}", stats.fps),
        frame_ms = format!("{:.2}", stats.frame_time_ms),
        field_frame = stats.field_frame,
        particles = stats.particles,
        connections = stats.connections,
        glows = stats.glows,
        mounted = stats.mounted,
        "FIELD STATS"
    );
}

pub struct DebugToolsPlugin;

impl Plugin for DebugToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugStats>()
            .init_resource::<DebugState>()
            .add_systems(
                Update,
                (debug_key_input_system, debug_stats_collect_system, debug_logging_system)
                    .chain()
                    .after(PresentSet),
            );
    }
}
