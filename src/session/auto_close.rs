// Preview exits: close the app once the backdrop has shown enough of itself.
// Three triggers from `WindowConfig`, each 0 = off, first one reached wins:
//   autoClose        seconds of wall time
//   autoCloseFrames  frames drawn by the mounted field
//   autoCloseLoops   completed splash plays in `loop` boot mode

use bevy::prelude::*;
use hx_boot::BootClock;
use hx_config::WindowConfig;
use hx_core::{BackdropConfigRes, PresentSet};
use hx_rendering::FieldHost;
use std::time::Duration;

/// Which trigger ended the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CloseReason {
    Elapsed(f32),
    FieldFrames(u64),
    BootLoops(u32),
}

#[derive(Resource, Debug, Default)]
pub struct AutoClose {
    timer: Option<Timer>,
    field_frames: Option<u64>,
    boot_loops: Option<u32>,
    fired: Option<CloseReason>,
}

impl AutoClose {
    pub fn from_config(window: &WindowConfig) -> Self {
        Self {
            timer: (window.auto_close > 0.0).then(|| Timer::from_seconds(window.auto_close, TimerMode::Once)),
            field_frames: (window.auto_close_frames > 0).then_some(window.auto_close_frames),
            boot_loops: (window.auto_close_loops > 0).then_some(window.auto_close_loops),
            fired: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some() || self.field_frames.is_some() || self.boot_loops.is_some()
    }

    pub fn fired(&self) -> Option<CloseReason> {
        self.fired
    }

    /// Feeds one tick of progress. Returns the reason the first time any
    /// trigger is reached and `None` on every other call.
    pub fn check(&mut self, delta: Duration, field_frame: Option<u64>, boot_plays: Option<u32>) -> Option<CloseReason> {
        if self.fired.is_some() {
            return None;
        }
        let mut elapsed = None;
        if let Some(t) = self.timer.as_mut() {
            if t.tick(delta).just_finished() {
                elapsed = Some(CloseReason::Elapsed(t.duration().as_secs_f32()));
            }
        }
        let frames = self
            .field_frames
            .filter(|&limit| field_frame.is_some_and(|f| f >= limit))
            .map(CloseReason::FieldFrames);
        let loops = self
            .boot_loops
            .filter(|&limit| boot_plays.is_some_and(|p| p >= limit))
            .map(CloseReason::BootLoops);
        self.fired = elapsed.or(frames).or(loops);
        self.fired
    }
}

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_autoclose)
            .add_systems(Update, check_autoclose.after(PresentSet).run_if(resource_exists::<AutoClose>));
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Res<BackdropConfigRes>) {
    let close = AutoClose::from_config(&cfg.window);
    if !close.is_armed() {
        return;
    }
    info!(
        seconds = cfg.window.auto_close,
        field_frames = cfg.window.auto_close_frames,
        boot_loops = cfg.window.auto_close_loops,
        "AutoClose: preview exit armed"
    );
    commands.insert_resource(close);
}

fn check_autoclose(
    time: Res<Time>,
    mut close: ResMut<AutoClose>,
    host: Option<Res<FieldHost>>,
    clock: Option<Res<BootClock>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    let frame = host.and_then(|h| h.frame());
    let plays = clock.map(|c| c.plays);
    if let Some(reason) = close.check(time.delta(), frame, plays) {
        info!(?reason, "AutoClose: requesting app exit");
        ev_exit.write(AppExit::Success);
    }
}
