use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::window::PrimaryWindow;
use hexagix_backdrop::{BackdropConfig, Cli, SessionPlugin};
use hx_boot::BootPlugin;
use hx_core::{AppState, BackdropConfigRes, CorePlugin, RngSeed};
use hx_rendering::{FieldHost, RenderingPlugin};
use std::time::Duration;

fn headless(cfg: BackdropConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default(), bevy::input::InputPlugin));
    app.init_asset::<Image>();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.world_mut().spawn((
        Window { resolution: (cfg.window.width, cfg.window.height).into(), ..default() },
        PrimaryWindow,
    ));
    app.insert_resource(BackdropConfigRes(cfg)).insert_resource(RngSeed(21));
    app.add_plugins((CorePlugin, RenderingPlugin, BootPlugin, SessionPlugin));
    app
}

#[test]
fn cli_skip_boot_and_auto_close_run_to_exit() {
    let cli = Cli { skip_boot: true, auto_close: Some(0.5), population: Some(20), ..Default::default() };
    let mut cfg = BackdropConfig::default();
    cfg.window.width = 200.0;
    cfg.window.height = 150.0;
    cli.apply(&mut cfg);

    let mut app = headless(cfg);
    app.insert_resource(cli);
    app.update();
    app.update();
    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Field);
    assert!(app.world().resource::<FieldHost>().is_mounted());

    for _ in 0..8 {
        if app.should_exit().is_some() {
            break;
        }
        app.update();
    }
    assert_eq!(app.should_exit(), Some(AppExit::Success));
    let frames = app.world().resource::<FieldHost>().frame().unwrap_or_default();
    assert!(frames >= 3);
}
