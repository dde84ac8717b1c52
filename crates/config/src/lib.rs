// Backdrop configuration (pure data crate; no Bevy dependency).
// Provides: data structures, layered RON loading, validation producing warnings (non-fatal), and tests.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path, str::FromStr};

/// Default config layers, base first; later layers override earlier ones.
pub const DEFAULT_LAYERS: [&str; 2] = [
    "assets/config/backdrop.ron",
    "assets/config/backdrop.local.ron",
];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
    /// Close once the mounted field has drawn this many frames. 0 = off.
    #[serde(rename = "autoCloseFrames")]
    pub auto_close_frames: u64,
    /// Close after this many completed splash plays in `loop` boot mode. 0 = off.
    #[serde(rename = "autoCloseLoops")]
    pub auto_close_loops: u32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "HEXAGIX".into(),
            auto_close: 0.0,
            auto_close_frames: 0,
            auto_close_loops: 0,
        }
    }
}

/// How candidate particle pairs are found when drawing connection lines.
/// Written as a lowercase string in RON (`connection_index: "grid"`).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum ConnectionIndex {
    /// Scan every pair of connectable particles.
    #[default]
    Pairwise,
    /// Bucket connectable particles into a uniform grid of link-distance cells.
    Grid,
    /// Pairwise for small connectable sets, grid above `AUTO_GRID_THRESHOLD`.
    Auto,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Total particles; the first 10 are large, the next 20 bright.
    pub population: usize,
    pub orbs: usize,
    /// Fixed RNG seed for reproducible layouts. None = seeded from entropy.
    pub seed: Option<u64>,
    pub connection_index: ConnectionIndex,
    /// Scale per-frame rates by elapsed time (60 Hz reference) instead of one step per frame.
    pub time_scaled: bool,
    /// Opacity of the whole canvas layer.
    pub canvas_opacity: f32,
}
impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            population: 80,
            orbs: 5,
            seed: None,
            connection_index: ConnectionIndex::Pairwise,
            time_scaled: false,
            canvas_opacity: 0.85,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    pub vignette_opacity: f32,
}
impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            vignette_opacity: 0.6,
        }
    }
}

/// Written as a lowercase string in RON (`mode: "loop"`).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum BootMode {
    /// Play once per run, then hand over to the field.
    #[default]
    Once,
    /// Restart after every fade-out (splash preview).
    Loop,
    /// Go straight to the field.
    Skip,
}

impl FromStr for ConnectionIndex {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pairwise" => Ok(Self::Pairwise),
            "grid" => Ok(Self::Grid),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown connection index '{other}' (pairwise|grid|auto)")),
        }
    }
}
impl TryFrom<String> for ConnectionIndex {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
impl From<ConnectionIndex> for String {
    fn from(v: ConnectionIndex) -> Self {
        match v {
            ConnectionIndex::Pairwise => "pairwise",
            ConnectionIndex::Grid => "grid",
            ConnectionIndex::Auto => "auto",
        }
        .into()
    }
}

impl FromStr for BootMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "loop" => Ok(Self::Loop),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown boot mode '{other}' (once|loop|skip)")),
        }
    }
}
impl TryFrom<String> for BootMode {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
impl From<BootMode> for String {
    fn from(v: BootMode) -> Self {
        match v {
            BootMode::Once => "once",
            BootMode::Loop => "loop",
            BootMode::Skip => "skip",
        }
        .into()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BootMessage {
    pub text: String,
    pub delay_ms: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BootConfig {
    pub mode: BootMode,
    pub messages: Vec<BootMessage>,
    pub progress_tick_ms: u32,
    pub progress_step: u32,
    pub complete_ms: u32,
    pub fade_ms: u32,
}
impl Default for BootConfig {
    fn default() -> Self {
        let messages = [
            "INITIALIZING SYSTEM...",
            "LOADING CORE MODULES...",
            "PROTOCOL MATRIX ONLINE...",
            "AI SIMULATION READY...",
            "WELCOME TO HEXAGIX",
        ]
        .iter()
        .enumerate()
        .map(|(i, text)| BootMessage {
            text: (*text).into(),
            delay_ms: i as u32 * 400,
        })
        .collect();
        Self {
            mode: BootMode::Once,
            messages,
            progress_tick_ms: 40,
            progress_step: 2,
            complete_ms: 2500,
            fade_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    pub log_interval_secs: f32,
}
impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_interval_secs: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BackdropConfig {
    pub window: WindowConfig,
    pub field: FieldConfig,
    pub overlay: OverlayConfig,
    pub boot: BootConfig,
    pub debug: DebugConfig,
}

impl BackdropConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Deep-merges every readable layer (later layers win) and deserializes the result.
    /// Returns the config, the layers actually used, and per-layer errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (Self::default(), used, errors);
        };
        match val.into_rust::<BackdropConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (Self::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.width * self.window.height > 10_000_000.0 {
            w.push(format!(
                "very large window area: {}x{} (canvas is rasterized on the CPU)",
                self.window.width, self.window.height
            ));
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        } else if self.window.auto_close > 0.0 && self.window.auto_close < 0.01 {
            w.push(format!(
                "window.autoClose {} very small; closes almost immediately",
                self.window.auto_close
            ));
        }
        if self.window.auto_close_loops > 0 && self.boot.mode != BootMode::Loop {
            w.push(format!(
                "window.autoCloseLoops {} only applies in boot mode \"loop\"",
                self.window.auto_close_loops
            ));
        }
        if self.field.population == 0 {
            w.push("field.population is 0; nothing will be drawn but orbs".into());
        } else if self.field.population < 30 {
            w.push(format!(
                "field.population {} below 30; large/bright counts fall short of 10/20",
                self.field.population
            ));
        }
        if self.field.population > 5_000 {
            w.push(format!(
                "field.population {} very high; performance may suffer",
                self.field.population
            ));
        }
        if self.field.orbs > 64 {
            w.push(format!("field.orbs {} very high; orbs are full-size glows", self.field.orbs));
        }
        if !(0.0..=1.0).contains(&self.field.canvas_opacity) {
            w.push(format!(
                "field.canvas_opacity {} outside 0..1 (clamped)",
                self.field.canvas_opacity
            ));
        }
        if !(0.0..=1.0).contains(&self.overlay.vignette_opacity) {
            w.push(format!(
                "overlay.vignette_opacity {} outside 0..1 (clamped)",
                self.overlay.vignette_opacity
            ));
        }
        let boot = &self.boot;
        if boot.mode != BootMode::Skip {
            if boot.messages.is_empty() {
                w.push("boot.messages is empty; splash shows only the progress bar".into());
            }
            if boot.progress_tick_ms == 0 {
                w.push("boot.progress_tick_ms must be > 0 (progress jumps to 100)".into());
            }
            if boot.progress_step == 0 {
                w.push("boot.progress_step is 0; progress bar never moves".into());
            }
            if let Some(last) = boot.messages.iter().map(|m| m.delay_ms).max() {
                if last > boot.complete_ms {
                    w.push(format!(
                        "boot message delay {last}ms after boot.complete_ms {}ms; message never shown",
                        boot.complete_ms
                    ));
                }
            }
            if boot
                .messages
                .windows(2)
                .any(|pair| pair[1].delay_ms < pair[0].delay_ms)
            {
                w.push("boot.messages delays not ascending; lines reveal in list order".into());
            }
        }
        if self.debug.log_interval_secs <= 0.0 {
            w.push("debug.log_interval_secs must be > 0".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_sample_config() {
        let sample = r#"(
            window: (width: 800.0, height: 600.0, title: "Test"),
            field: (
                population: 120,
                orbs: 3,
                seed: Some(7),
                connection_index: "grid",
                time_scaled: true,
                canvas_opacity: 0.9,
            ),
            overlay: (enabled: false),
            boot: (
                mode: "loop",
                messages: [(text: "BOOT", delay_ms: 0), (text: "READY", delay_ms: 200)],
                complete_ms: 1000,
            ),
        )"#;
        let cfg = BackdropConfig::load_from_file(write_temp(sample).path()).expect("parse config");
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.field.population, 120);
        assert_eq!(cfg.field.seed, Some(7));
        assert_eq!(cfg.field.connection_index, ConnectionIndex::Grid);
        assert!(cfg.field.time_scaled);
        assert!(!cfg.overlay.enabled);
        assert_eq!(cfg.boot.mode, BootMode::Loop);
        assert_eq!(cfg.boot.messages.len(), 2);
        assert_eq!(cfg.boot.progress_tick_ms, 40, "unset field keeps default");
        assert!(cfg.validate().is_empty(), "expected no warnings: {:?}", cfg.validate());
    }

    #[test]
    fn defaults_match_site_constants() {
        let cfg = BackdropConfig::default();
        assert_eq!(cfg.field.population, 80);
        assert_eq!(cfg.field.orbs, 5);
        assert!((cfg.field.canvas_opacity - 0.85).abs() < 1e-6);
        let delays: Vec<u32> = cfg.boot.messages.iter().map(|m| m.delay_ms).collect();
        assert_eq!(delays, vec![0, 400, 800, 1200, 1600]);
        assert_eq!(cfg.boot.messages[4].text, "WELCOME TO HEXAGIX");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_detects_warnings() {
        let bad = BackdropConfig {
            window: WindowConfig {
                width: -100.0,
                height: 0.0,
                title: "Bad".into(),
                auto_close: -1.0,
                ..Default::default()
            },
            field: FieldConfig {
                population: 12,
                canvas_opacity: 1.5,
                ..Default::default()
            },
            overlay: OverlayConfig {
                enabled: true,
                vignette_opacity: -0.2,
            },
            boot: BootConfig {
                mode: BootMode::Once,
                messages: vec![
                    BootMessage { text: "A".into(), delay_ms: 900 },
                    BootMessage { text: "B".into(), delay_ms: 100 },
                ],
                progress_tick_ms: 0,
                progress_step: 0,
                complete_ms: 500,
                fade_ms: 0,
            },
            debug: DebugConfig { log_interval_secs: 0.0 },
        };
        let warnings = bad.validate();
        let joined = warnings.join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("window.autoClose"));
        assert!(joined.contains("field.population 12 below 30"));
        assert!(joined.contains("field.canvas_opacity"));
        assert!(joined.contains("overlay.vignette_opacity"));
        assert!(joined.contains("boot.progress_tick_ms"));
        assert!(joined.contains("boot.progress_step is 0"));
        assert!(joined.contains("never shown"));
        assert!(joined.contains("not ascending"));
        assert!(joined.contains("debug.log_interval_secs"));
        assert!(warnings.len() >= 10, "expected many warnings, got {}: {joined}", warnings.len());
    }

    #[test]
    fn skip_mode_ignores_boot_timing() {
        let cfg = BackdropConfig {
            boot: BootConfig {
                mode: BootMode::Skip,
                messages: Vec::new(),
                progress_tick_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn enum_strings_round_trip_through_layers() {
        let base = r#"(field: (connection_index: "auto"), boot: (mode: "skip"))"#;
        let (cfg, _, errors) = BackdropConfig::load_layered([write_temp(base).path().to_path_buf()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(cfg.field.connection_index, ConnectionIndex::Auto);
        assert_eq!(cfg.boot.mode, BootMode::Skip);
        assert!("Pairwise".parse::<ConnectionIndex>().is_ok());
        assert!("sideways".parse::<BootMode>().is_err());
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = BackdropConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, BackdropConfig::default());
    }

    #[test]
    fn layered_merge_overrides() {
        let base = r"(
            window: (width: 900.0),
            field: (population: 60, orbs: 4),
        )";
        let override_one = r#"(
            window: (title: "Local"),
            field: (population: 100),
        )"#;
        let (cfg, used, errors) = BackdropConfig::load_layered([
            write_temp(base).path().to_path_buf(),
            write_temp(override_one).path().to_path_buf(),
        ]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.window.width, 900.0);
        assert_eq!(cfg.window.title, "Local");
        assert_eq!(cfg.field.population, 100);
        assert_eq!(cfg.field.orbs, 4, "nested key from base layer survives the merge");
        assert_eq!(cfg.window.height, WindowConfig::default().height);
    }

    #[test]
    fn layered_reports_missing_and_broken_layers() {
        let broken = write_temp("(field: (population: ");
        let (cfg, used, errors) = BackdropConfig::load_layered([
            std::path::PathBuf::from("missing/backdrop.ron"),
            broken.path().to_path_buf(),
        ]);
        assert!(used.is_empty());
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("read error"));
        assert!(errors[1].contains("parse error"));
        assert_eq!(cfg, BackdropConfig::default());
    }

    #[test]
    fn parse_autoclose_and_validate() {
        let sample = r"(window: (autoClose: 3.25))";
        let cfg = BackdropConfig::load_from_file(write_temp(sample).path()).expect("parse config");
        assert!((cfg.window.auto_close - 3.25).abs() < 1e-6);

        let tiny = r"(window: (autoClose: 0.001))";
        let cfg2 = BackdropConfig::load_from_file(write_temp(tiny).path()).expect("parse config");
        assert!(
            cfg2.validate().iter().any(|w| w.contains("window.autoClose")),
            "expected warning for tiny autoClose"
        );
    }

    #[test]
    fn parse_preview_close_triggers() {
        let sample = r#"(window: (autoCloseFrames: 600, autoCloseLoops: 3), boot: (mode: "loop"))"#;
        let cfg = BackdropConfig::load_from_file(write_temp(sample).path()).expect("parse config");
        assert_eq!(cfg.window.auto_close_frames, 600);
        assert_eq!(cfg.window.auto_close_loops, 3);
        assert!(cfg.validate().is_empty());

        let once = r#"(window: (autoCloseLoops: 2))"#;
        let cfg2 = BackdropConfig::load_from_file(write_temp(once).path()).expect("parse config");
        assert!(cfg2.validate().iter().any(|w| w.contains("autoCloseLoops")));
    }

    // Helper: create a temp file with given contents; returns handle (kept for lifetime)
    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tmp");
        f.write_all(contents.as_bytes()).expect("write tmp");
        f
    }
}
