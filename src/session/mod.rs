// Session plugins for the desktop/web binary: preview exits, config hot reload,
// field toggle key and the startup config report.

use bevy::prelude::*;

pub mod auto_close;
pub mod config_hot_reload;
pub mod field_keys;

pub use auto_close::{AutoClose, AutoClosePlugin, CloseReason};
pub use config_hot_reload::{ConfigHotReloadPlugin, ConfigReloadSettings};
pub use field_keys::{FieldKeysPlugin, TOGGLE_FIELD_KEY};

/// What config loading found before the app (and its logger) existed.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConfigReport {
    pub used: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub seed: u64,
}

fn log_config_report(report: Res<ConfigReport>, cfg: Res<hx_core::BackdropConfigRes>) {
    for e in &report.errors {
        warn!("CONFIG LOAD ISSUE: {e}");
    }
    if report.used.is_empty() {
        info!("No config layers found; using defaults");
    } else {
        info!(used = ?report.used, "Config layers loaded");
    }
    for w in &report.warnings {
        warn!("CONFIG WARNING: {w}");
    }
    info!(window = ?cfg.window, "Window config");
    info!(
        population = cfg.field.population,
        orbs = cfg.field.orbs,
        seed = report.seed,
        index = ?cfg.field.connection_index,
        boot = ?cfg.boot.mode,
        overlays = cfg.overlay.enabled,
        "Runtime feature summary"
    );
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfigReport>()
            .add_systems(Startup, log_config_report)
            .add_plugins((AutoClosePlugin, ConfigHotReloadPlugin, FieldKeysPlugin));
    }
}
