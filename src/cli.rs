//! Command-line overrides applied on top of the layered RON config.
//!
//! Example:
//!   cargo run -- --config assets/config/preview.ron --seed 7 --skip-boot

use anyhow::{ensure, Result};
use bevy::prelude::Resource;
use clap::Parser;
use hx_config::{BackdropConfig, BootMode, DEFAULT_LAYERS};
use std::path::PathBuf;

#[derive(Parser, Resource, Debug, Clone, Default, PartialEq)]
#[command(name = "hexagix_backdrop", version, about = "Hexagix particle-field backdrop", long_about = None)]
pub struct Cli {
    /// Extra config layer applied after the default ones (repeatable).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Vec<PathBuf>,
    /// Fixed RNG seed for a reproducible field layout.
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub population: Option<usize>,
    /// Go straight to the field.
    #[arg(long)]
    pub skip_boot: bool,
    /// Exit after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub auto_close: Option<f32>,
    /// Exit once the field has drawn this many frames.
    #[arg(long, value_name = "FRAMES")]
    pub close_after_frames: Option<u64>,
    /// Loop the boot splash and exit after this many plays.
    #[arg(long, value_name = "PLAYS")]
    pub close_after_loops: Option<u32>,
}

impl Cli {
    /// Default layers followed by every `--config` layer.
    pub fn layers(&self) -> Vec<PathBuf> {
        DEFAULT_LAYERS
            .iter()
            .map(PathBuf::from)
            .chain(self.config.iter().cloned())
            .collect()
    }

    /// Explicit layers must exist; the default ones are optional.
    pub fn check_layers(&self) -> Result<()> {
        for path in &self.config {
            ensure!(path.is_file(), "config layer {} not found", path.display());
        }
        Ok(())
    }

    pub fn apply(&self, cfg: &mut BackdropConfig) {
        if let Some(seed) = self.seed {
            cfg.field.seed = Some(seed);
        }
        if let Some(population) = self.population {
            cfg.field.population = population;
        }
        if self.skip_boot {
            cfg.boot.mode = BootMode::Skip;
        }
        if let Some(secs) = self.auto_close {
            cfg.window.auto_close = secs;
        }
        if let Some(frames) = self.close_after_frames {
            cfg.window.auto_close_frames = frames;
        }
        if let Some(plays) = self.close_after_loops {
            cfg.boot.mode = BootMode::Loop;
            cfg.window.auto_close_loops = plays;
        }
    }
}
