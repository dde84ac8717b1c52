// Runtime config hot-reload (desktop only).
// Polls the config layers for modification timestamp changes and, when detected,
// re-loads the layered config with CLI overrides re-applied. On success updates
// `BackdropConfigRes` and applies immediate side-effects (window size/title,
// field canvas opacity, remount when field parameters changed).
// Errors during parsing are logged and the prior config retained.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use hx_config::BackdropConfig;
use hx_core::{BackdropConfigRes, FieldMountRequest, InputSet};
use hx_rendering::FieldSprite;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::cli::Cli;

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    /// Polling interval seconds.
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: hx_config::DEFAULT_LAYERS.iter().map(PathBuf::from).collect(),
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl Default for ConfigReloadState {
    fn default() -> Self {
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        // Only meaningful on native (std::fs) targets.
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Startup, prime_modification_times)
                .add_systems(Update, poll_and_reload_config.before(InputSet));
        }
    }
}

fn modified(path: &PathBuf) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// The startup config already reflects the files as they are now.
fn prime_modification_times(settings: Res<ConfigReloadSettings>, mut state: ResMut<ConfigReloadState>) {
    for path in &settings.paths {
        if let Some(t) = modified(path) {
            state.last_mod.insert(path.clone(), t);
        }
    }
}

/// Loads the layers that exist, then re-applies any command-line overrides.
/// Any returned error means a present layer failed to parse.
pub fn reload(paths: &[PathBuf], overrides: Option<&Cli>) -> (BackdropConfig, Vec<String>) {
    let (mut cfg, _used, errors) = BackdropConfig::load_layered(paths.iter().filter(|p| p.is_file()));
    if let Some(cli) = overrides {
        cli.apply(&mut cfg);
    }
    (cfg, errors)
}

#[allow(clippy::too_many_arguments)]
fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    overrides: Option<Res<Cli>>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<BackdropConfigRes>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut field_sprites: Query<&mut Sprite, With<FieldSprite>>,
    mut requests: EventWriter<FieldMountRequest>,
) {
    // Allow changing interval at runtime by adjusting timer duration.
    if (state.timer.duration().as_secs_f32() - settings.interval_secs).abs() > f32::EPSILON {
        state
            .timer
            .set_duration(std::time::Duration::from_secs_f32(settings.interval_secs.max(0.05)));
    }
    if !state.timer.tick(time.delta()).just_finished() {
        return;
    }

    let mut dirty = false;
    for path in &settings.paths {
        if let Some(mod_time) = modified(path) {
            let entry = state.last_mod.entry(path.clone()).or_insert(SystemTime::UNIX_EPOCH);
            if mod_time > *entry {
                *entry = mod_time;
                dirty = true;
            }
        }
    }
    if !dirty {
        return;
    }

    let (new_cfg, errors) = reload(&settings.paths, overrides.as_deref());
    if !errors.is_empty() {
        for e in errors {
            warn!("CONFIG HOT-RELOAD issue: {e}");
        }
        warn!("Config hot-reload skipped; keeping previous config");
        return;
    }
    for w in new_cfg.validate() {
        warn!("CONFIG WARNING: {w}");
    }
    // Replace resource only if different (avoid spurious change events & work).
    if cfg_res.0 == new_cfg {
        return;
    }
    info!("Config hot-reload applied");
    let field_changed = cfg_res.field != new_cfg.field;
    cfg_res.0 = new_cfg;

    if let Ok(mut window) = windows.single_mut() {
        if window.width() != cfg_res.window.width || window.height() != cfg_res.window.height {
            window.resolution.set(cfg_res.window.width, cfg_res.window.height);
        }
        if window.title != cfg_res.window.title {
            window.title = cfg_res.window.title.clone();
        }
    }
    for mut sprite in &mut field_sprites {
        sprite.color.set_alpha(cfg_res.field.canvas_opacity);
    }
    if field_changed {
        info!(population = cfg_res.field.population, orbs = cfg_res.field.orbs, "Field config changed; remounting");
        requests.write(FieldMountRequest::Unmount);
        requests.write(FieldMountRequest::Mount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use hx_core::CorePlugin;
    use std::time::Duration;

    fn app_watching(path: PathBuf) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.add_plugins((CorePlugin, ConfigHotReloadPlugin));
        app.insert_resource(ConfigReloadSettings { paths: vec![path], interval_secs: 0.05 });
        app
    }

    #[test]
    fn reload_reapplies_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("layer.ron");
        std::fs::write(&path, "(field: (population: 12, orbs: 2))").expect("write");
        let cli = Cli { population: Some(99), ..Default::default() };
        let (cfg, errors) = reload(&[path], Some(&cli));
        assert!(errors.is_empty());
        assert_eq!(cfg.field.population, 99);
        assert_eq!(cfg.field.orbs, 2);
    }

    #[test]
    fn modified_file_updates_config_and_requests_remount() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("layer.ron");
        std::fs::write(&path, "(field: (population: 30))").expect("write");
        let mut app = app_watching(path.clone());
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(app.world().resource::<BackdropConfigRes>().field.population, 80);

        // Forget the primed timestamp so the unchanged mtime resolution of the
        // filesystem cannot hide the rewrite.
        app.world_mut().resource_mut::<ConfigReloadState>().last_mod.clear();
        std::fs::write(&path, "(field: (population: 30), window: (title: \"RELOADED\"))").expect("write");
        for _ in 0..3 {
            app.update();
            if app.world().resource::<BackdropConfigRes>().field.population == 30 {
                break;
            }
        }
        let cfg = app.world().resource::<BackdropConfigRes>();
        assert_eq!(cfg.field.population, 30);
        assert_eq!(cfg.window.title, "RELOADED");

        let events = app.world().resource::<Events<FieldMountRequest>>();
        let mut cursor = events.get_cursor();
        let sent: Vec<_> = cursor.read(events).copied().collect();
        assert_eq!(sent, vec![FieldMountRequest::Unmount, FieldMountRequest::Mount]);
    }

    #[test]
    fn broken_layer_keeps_previous_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("layer.ron");
        std::fs::write(&path, "(field: (population: ").expect("write");
        let mut app = app_watching(path);
        app.update();
        app.world_mut().resource_mut::<BackdropConfigRes>().field.population = 55;
        app.world_mut().resource_mut::<ConfigReloadState>().last_mod.clear();
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(app.world().resource::<BackdropConfigRes>().field.population, 55);
    }
}
