// Integration tests crate: black-box checks across the published plugin APIs.
// Builds headless apps (no renderer, no winit) and drives them with a manual clock.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::window::PrimaryWindow;
use hx_config::BackdropConfig;
use hx_core::{BackdropConfigRes, RngSeed};
use std::time::Duration;

pub fn build_minimal_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    // AssetPlugin -> Assets<Image> for the field and splash textures
    // InputPlugin -> ButtonInput<KeyCode> for the key toggles
    app.add_plugins((
        bevy::asset::AssetPlugin::default(),
        bevy::input::InputPlugin,
    ));
    app.init_asset::<Image>();
    app
}

/// Headless app with config, seed and a primary window of the configured size.
pub fn build_backdrop_app(cfg: BackdropConfig, seed: u64) -> App {
    let mut app = build_minimal_app();
    let (w, h) = (cfg.window.width, cfg.window.height);
    app.insert_resource(BackdropConfigRes(cfg))
        .insert_resource(RngSeed(seed));
    app.world_mut().spawn((
        Window { resolution: (w, h).into(), ..default() },
        PrimaryWindow,
    ));
    app
}

/// Advance the app by a fixed dt for `steps` iterations.
pub fn advance_fixed(app: &mut App, dt: f32, steps: u32) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(dt)));
    for _ in 0..steps {
        app.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_boot::{BootPlugin, SplashRoot};
    use hx_config::BootMode;
    use hx_core::{AppState, CorePlugin, FieldMountRequest};
    use hx_rendering::{FieldHost, RenderingPlugin};

    fn small_config() -> BackdropConfig {
        let mut cfg = BackdropConfig::default();
        cfg.window.width = 240.0;
        cfg.window.height = 160.0;
        cfg.field.population = 40;
        cfg
    }

    fn composed(cfg: BackdropConfig, seed: u64) -> App {
        let mut app = build_backdrop_app(cfg, seed);
        app.add_plugins((CorePlugin, RenderingPlugin, BootPlugin));
        app
    }

    fn state(app: &App) -> AppState {
        *app.world().resource::<State<AppState>>().get()
    }

    #[test]
    fn compose_core_plugins() {
        let mut app = composed(small_config(), 1);
        app.update();
        assert_eq!(state(&app), AppState::Boot);
        assert!(app.world().resource::<FieldHost>().is_mounted());
    }

    #[test]
    fn field_animates_under_the_splash_and_after_handoff() {
        let mut app = composed(small_config(), 7);
        advance_fixed(&mut app, 0.1, 5);
        let during_boot = app.world().resource::<FieldHost>().frame().unwrap_or_default();
        assert!(during_boot > 0, "field runs while the splash is up");

        advance_fixed(&mut app, 0.1, 50);
        assert_eq!(state(&app), AppState::Field);
        {
            let world = app.world_mut();
            assert_eq!(world.query::<&SplashRoot>().iter(world).count(), 0);
        }
        let after = app.world().resource::<FieldHost>().frame().unwrap_or_default();
        assert!(after > during_boot);
    }

    #[test]
    fn same_seed_same_pixels() {
        let mut cfg = small_config();
        cfg.boot.mode = BootMode::Skip;
        let mut a = composed(cfg.clone(), 42);
        let mut b = composed(cfg, 42);
        advance_fixed(&mut a, 1.0 / 60.0, 12);
        advance_fixed(&mut b, 1.0 / 30.0, 12);
        let pa = a.world().resource::<FieldHost>().canvas().to_rgba8();
        let pb = b.world().resource::<FieldHost>().canvas().to_rgba8();
        assert_eq!(pa.len(), 240 * 160 * 4);
        assert!(pa == pb, "frame-stepped field ignores wall-clock dt");
    }

    #[test]
    fn unmount_request_stops_the_field() {
        let mut cfg = small_config();
        cfg.boot.mode = BootMode::Skip;
        let mut app = composed(cfg, 3);
        advance_fixed(&mut app, 1.0 / 60.0, 3);
        app.world_mut().send_event(FieldMountRequest::Unmount);
        advance_fixed(&mut app, 1.0 / 60.0, 1);
        let host = app.world().resource::<FieldHost>();
        assert!(!host.is_mounted());
        let frozen = host.frame();
        advance_fixed(&mut app, 1.0 / 60.0, 3);
        assert_eq!(app.world().resource::<FieldHost>().frame(), frozen);

        app.world_mut().send_event(FieldMountRequest::Mount);
        advance_fixed(&mut app, 1.0 / 60.0, 2);
        let host = app.world().resource::<FieldHost>();
        assert!(host.is_mounted());
        assert_eq!(host.mount_count(), 2);
    }

    #[cfg(feature = "hx_debug_tools")]
    #[test]
    fn compose_with_debug() {
        use hx_debug_tools::{DebugStats, DebugToolsPlugin};
        let mut app = composed(small_config(), 5);
        app.add_plugins(DebugToolsPlugin);
        advance_fixed(&mut app, 1.0 / 60.0, 4);
        let stats = app.world().resource::<DebugStats>();
        assert!(stats.mounted);
        assert_eq!(stats.particles, 40);
    }

    #[cfg(feature = "full")]
    #[test]
    fn golden_hash_is_seed_stable() {
        use hx_rendering::{GoldenHashPlugin, GoldenSettings, GoldenState};
        let run = |seed: u64| {
            let mut cfg = small_config();
            cfg.boot.mode = BootMode::Skip;
            let mut app = composed(cfg, seed);
            app.add_plugins(GoldenHashPlugin);
            app.insert_resource(GoldenSettings { capture_frame: 5 });
            advance_fixed(&mut app, 1.0 / 60.0, 10);
            let golden = app.world().resource::<GoldenState>();
            assert!(golden.captured);
            golden.hash.clone()
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }
}
