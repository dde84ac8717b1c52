/*!
Backdrop binary: layered config + CLI overrides, then the field, overlays and
boot splash as Bevy plugins, with feature-gated debug stats and golden hashing.
*/

use anyhow::{bail, Result};
use bevy::prelude::*;
use hexagix_backdrop::session::ConfigReloadSettings;
use hexagix_backdrop::{BackdropConfig, Cli, ConfigReport, SessionPlugin};
use hx_boot::BootPlugin;
use hx_core::{BackdropConfigRes, CorePlugin, RngSeed};
use hx_rendering::RenderingPlugin;

#[cfg(feature = "debug")]
use hx_debug_tools::DebugToolsPlugin;

#[cfg(feature = "golden")]
use hx_rendering::GoldenHashPlugin;

// ---------------- Config Loading ----------------

#[cfg(target_arch = "wasm32")]
fn parse_cli() -> Cli {
    Cli::default()
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_cli() -> Cli {
    use clap::Parser;
    Cli::parse()
}

#[cfg(target_arch = "wasm32")]
fn load_config(_cli: &Cli) -> Result<(BackdropConfig, ConfigReport)> {
    // Embed base config (no layered local override on wasm).
    const RAW: &str = include_str!("../assets/config/backdrop.ron");
    let mut report = ConfigReport::default();
    let cfg = match ron::from_str(RAW) {
        Ok(cfg) => {
            report.used.push("embedded backdrop.ron".into());
            cfg
        }
        Err(e) => {
            report.errors.push(format!("embedded config parse failure: {e}; using defaults"));
            BackdropConfig::default()
        }
    };
    Ok((cfg, report))
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(cli: &Cli) -> Result<(BackdropConfig, ConfigReport)> {
    cli.check_layers()?;
    let (cfg, used, errors) = BackdropConfig::load_layered(cli.layers());
    // A missing local override layer is expected.
    let errors = errors
        .into_iter()
        .filter(|e| !(e.contains("backdrop.local.ron") && e.contains("read error")))
        .collect();
    Ok((cfg, ConfigReport { used, errors, ..Default::default() }))
}

// ---------------- Main ----------------

fn main() -> Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        // Better panic messages on wasm
        console_error_panic_hook::set_once();
    }

    let cli = parse_cli();
    let (mut cfg, mut report) = load_config(&cli)?;
    cli.apply(&mut cfg);
    report.warnings = cfg.validate();
    report.seed = cfg.field.seed.unwrap_or_else(rand::random);

    let window_title = cfg.window.title.clone();
    let resolution = (cfg.window.width.max(1.0), cfg.window.height.max(1.0));

    let mut app = App::new();
    app.insert_resource(BackdropConfigRes(cfg))
        .insert_resource(RngSeed(report.seed))
        .insert_resource(report)
        .insert_resource(ConfigReloadSettings { paths: cli.layers(), ..Default::default() })
        .insert_resource(cli)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window_title,
                resolution: resolution.into(),
                resizable: true,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(CorePlugin)
        .add_plugins(RenderingPlugin)
        .add_plugins(BootPlugin)
        .add_plugins(SessionPlugin);

    // Optional feature plugins
    #[cfg(feature = "debug")]
    {
        app.add_plugins(DebugToolsPlugin);
    }
    #[cfg(feature = "golden")]
    {
        app.add_plugins(GoldenHashPlugin);
    }

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("app exited with code {code}"),
    }
}
