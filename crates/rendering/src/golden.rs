//! Golden frame hash of the software field canvas.
//!
//! After `GoldenSettings::capture_frame` field frames, the canvas bytes are
//! hashed with blake3 (preimage: versioned tag, width and height as u32 LE,
//! then the RGBA8 bytes). With a fixed seed and `time_scaled: false` the hash
//! is stable across runs and machines.
//!
//! Baseline load precedence:
//! 1. `GOLDEN_BASELINE_HASH` env
//! 2. File at `GOLDEN_BASELINE_FILE` (default: `golden_baseline_hash.txt`)
//!
//! `GOLDEN_WRITE_BASELINE=1` writes the captured hash to the baseline file when
//! none exists yet (or when `GOLDEN_ALLOW_NEW=1`).

use bevy::prelude::*;
use hx_core::PresentSet;
use hx_field::PixelCanvas;

use crate::field_host::FieldHost;

const GOLDEN_SEED_TAG_V1: &[u8] = b"hexagix-field-v1";
const DEFAULT_BASELINE_FILE: &str = "golden_baseline_hash.txt";

#[derive(Resource, Debug, Clone)]
pub struct GoldenSettings {
    /// Field frame number to capture.
    pub capture_frame: u64,
}

impl Default for GoldenSettings {
    fn default() -> Self {
        Self { capture_frame: 30 }
    }
}

#[derive(Resource, Debug, Default)]
pub struct GoldenState {
    pub captured: bool,
    pub hash: Option<String>,
    pub frame_captured: Option<u64>,
    pub capture_width: Option<u32>,
    pub capture_height: Option<u32>,
    pub baseline_hash: Option<String>,
    pub baseline_match: Option<bool>,
}

/// Hex blake3 digest of the canvas contents.
pub fn hash_canvas(canvas: &PixelCanvas) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(GOLDEN_SEED_TAG_V1);
    hasher.update(&canvas.width().to_le_bytes());
    hasher.update(&canvas.height().to_le_bytes());
    hasher.update(&canvas.to_rgba8());
    hasher.finalize().to_hex().to_string()
}

fn flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}

fn baseline_path() -> String {
    std::env::var("GOLDEN_BASELINE_FILE")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASELINE_FILE.to_string())
}

fn load_baseline() -> Option<String> {
    if let Ok(env_hash) = std::env::var("GOLDEN_BASELINE_HASH") {
        return Some(env_hash).filter(|h| !h.is_empty());
    }
    let contents = std::fs::read_to_string(baseline_path()).ok()?;
    let line = contents.lines().next()?.trim();
    (!line.is_empty()).then(|| line.to_string())
}

pub struct GoldenHashPlugin;

impl Plugin for GoldenHashPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GoldenSettings>()
            .init_resource::<GoldenState>()
            .add_systems(
                Update,
                capture_golden
                    .after(PresentSet)
                    .run_if(resource_exists::<FieldHost>),
            );
    }
}

fn capture_golden(host: Res<FieldHost>, settings: Res<GoldenSettings>, mut state: ResMut<GoldenState>) {
    if state.captured || host.frame() != Some(settings.capture_frame) {
        return;
    }
    let canvas = host.canvas();
    let hash = hash_canvas(canvas);
    state.captured = true;
    state.frame_captured = Some(settings.capture_frame);
    state.capture_width = Some(canvas.width());
    state.capture_height = Some(canvas.height());

    #[cfg(not(target_arch = "wasm32"))]
    {
        if state.baseline_hash.is_none() {
            state.baseline_hash = load_baseline();
        }
        if flag("GOLDEN_WRITE_BASELINE") && (state.baseline_hash.is_none() || flag("GOLDEN_ALLOW_NEW")) {
            let path = baseline_path();
            match std::fs::write(&path, format!("{hash}\n")) {
                Ok(()) => {
                    info!(path = %path, "Golden baseline written");
                    state.baseline_hash = Some(hash.clone());
                }
                Err(e) => warn!(path = %path, "Failed to write golden baseline: {e}"),
            }
        }
    }

    state.baseline_match = state.baseline_hash.as_deref().map(|b| b == hash);
    match state.baseline_match {
        Some(true) => info!(hash = %hash, "Golden frame matches baseline"),
        Some(false) => warn!(hash = %hash, baseline = ?state.baseline_hash, "Golden frame differs from baseline"),
        None => info!(hash = %hash, "Golden frame captured (no baseline)"),
    }
    state.hash = Some(hash);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_field::{Painter, Point, Rgba, SurfaceSize};

    #[test]
    fn hash_covers_pixels_and_dimensions() {
        let a = PixelCanvas::new(SurfaceSize::new(4, 4));
        let b = PixelCanvas::new(SurfaceSize::new(8, 2));
        assert_ne!(hash_canvas(&a), hash_canvas(&b), "same byte count, different shape");
        let mut c = a.clone();
        c.stroke_circle(Point::new(2.0, 2.0), 1.0, 1.0, Rgba::rgb8([0, 229, 255], 1.0));
        assert_ne!(hash_canvas(&a), hash_canvas(&c));
        assert_eq!(hash_canvas(&a), hash_canvas(&a.clone()));
        assert_eq!(hash_canvas(&a).len(), 64);
    }
}
