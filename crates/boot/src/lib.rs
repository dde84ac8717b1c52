// Boot crate: the "system boot" splash that plays over the field on startup.
// Pure timeline (timeline.rs), baked textures (art.rs), Bevy plugin (splash.rs).

use bevy::prelude::*;
use hx_core::{AppState, PresentSet};

pub mod art;
mod splash;
pub mod timeline;

pub use splash::{ActiveTimeline, BootClock, SplashPart, SplashRoot, SPLASH_Z};
pub use timeline::{BootFrame, BootLine, BootTimeline};

pub struct BootPlugin;

impl Plugin for BootPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Boot), splash::start_boot)
            .add_systems(
                Update,
                (splash::tick_boot, splash::apply_frame)
                    .chain()
                    .in_set(PresentSet)
                    .run_if(in_state(AppState::Boot))
                    .run_if(resource_exists::<ActiveTimeline>),
            )
            .add_systems(OnExit(AppState::Boot), splash::finish_boot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use hx_config::{BackdropConfig, BootMode};
    use hx_core::{BackdropConfigRes, CorePlugin};
    use std::time::Duration;

    fn build(mode: BootMode) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default()));
        app.init_asset::<Image>();
        let mut cfg = BackdropConfig::default();
        cfg.boot.mode = mode;
        cfg.window.width = 320.0;
        cfg.window.height = 240.0;
        app.insert_resource(BackdropConfigRes(cfg));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.add_plugins((CorePlugin, BootPlugin));
        app
    }

    fn state(app: &App) -> AppState {
        *app.world().resource::<State<AppState>>().get()
    }

    fn splash_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query::<&SplashRoot>().iter(world).count()
    }

    #[test]
    fn once_plays_then_hands_over_to_field() {
        let mut app = build(BootMode::Once);
        app.update();
        assert_eq!(state(&app), AppState::Boot);
        assert_eq!(splash_count(&mut app), 1);
        {
            let world = app.world_mut();
            let lines = world
                .query::<&SplashPart>()
                .iter(world)
                .filter(|p| matches!(p, SplashPart::Line(_)))
                .count();
            assert_eq!(lines, 5);
        }

        for _ in 0..40 {
            app.update();
        }
        assert_eq!(state(&app), AppState::Field);
        assert_eq!(splash_count(&mut app), 0);
        assert!(!app.world().contains_resource::<BootClock>());
    }

    #[test]
    fn progress_label_tracks_timeline() {
        let mut app = build(BootMode::Once);
        for _ in 0..11 {
            app.update();
        }
        let elapsed = app.world().resource::<BootClock>().elapsed_ms();
        let expected = app.world().resource::<ActiveTimeline>().0.progress(elapsed);
        assert!(expected > 0);
        let world = app.world_mut();
        let label = world
            .query::<(&SplashPart, &Text2d)>()
            .iter(world)
            .find(|(p, _)| **p == SplashPart::Label)
            .map(|(_, t)| t.0.clone());
        assert_eq!(label, Some(format!("{expected}% COMPLETE")));
    }

    #[test]
    fn skip_goes_straight_to_field() {
        let mut app = build(BootMode::Skip);
        app.update();
        app.update();
        assert_eq!(state(&app), AppState::Field);
        assert_eq!(splash_count(&mut app), 0);
    }

    #[test]
    fn loop_restarts_instead_of_leaving() {
        let mut app = build(BootMode::Loop);
        for _ in 0..70 {
            app.update();
        }
        assert_eq!(state(&app), AppState::Boot);
        assert_eq!(splash_count(&mut app), 1);
        let clock = app.world().resource::<BootClock>();
        assert!(clock.plays >= 1);
        assert!(clock.elapsed_ms() < 3000);
    }
}
