//! Boot splash timeline as pure functions of elapsed milliseconds.

use hx_config::{BootConfig, BootMessage};
use hx_field::overlay::{breathe, ease_in_out};
use std::f32::consts::TAU;

/// Opacity of every line except the newest.
pub const OLDER_LINE_OPACITY: f32 = 0.4;
/// Each line slides up this far while it fades in.
pub const LINE_RISE_PX: f32 = 20.0;
pub const LINE_ENTER_MS: u64 = 300;
pub const INTRO_MS: u64 = 500;
pub const HEX_TURN_MS: u64 = 8000;
pub const PULSE_MS: u64 = 1000;
pub const SCAN_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct BootLine {
    pub index: usize,
    /// `[01]`, `[02]`, ...
    pub label: String,
    pub text: String,
    pub opacity: f32,
    /// Remaining downward offset of the entering line, in pixels.
    pub rise: f32,
}

/// Everything the splash shows at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BootFrame {
    pub lines: Vec<BootLine>,
    /// Whole percent, `0..=100`.
    pub progress: u32,
    pub core_scale: f32,
    pub core_opacity: f32,
    /// Clockwise rotation of the hexagon rings, radians.
    pub rotation: f32,
    pub dot_scale: f32,
    pub label_opacity: f32,
    /// Position of the progress bar highlight sweep, `0..1`.
    pub scan: f32,
    /// Overall splash opacity; drops to 0 during the fade-out.
    pub fade: f32,
    pub complete: bool,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BootTimeline {
    messages: Vec<BootMessage>,
    tick_ms: u64,
    step: u32,
    complete_ms: u64,
    fade_ms: u64,
}

impl BootTimeline {
    pub fn from_config(cfg: &BootConfig) -> Self {
        Self {
            messages: cfg.messages.clone(),
            tick_ms: cfg.progress_tick_ms as u64,
            step: cfg.progress_step,
            complete_ms: cfg.complete_ms as u64,
            fade_ms: cfg.fade_ms as u64,
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Time at which the splash is fully gone.
    pub fn total_ms(&self) -> u64 {
        self.complete_ms + self.fade_ms
    }

    /// Messages whose reveal time has passed, in order.
    pub fn visible_count(&self, t: u64) -> usize {
        self.messages.iter().filter(|m| m.delay_ms as u64 <= t).count()
    }

    /// `step` percent per elapsed tick, capped at 100. A zero tick jumps to 100.
    pub fn progress(&self, t: u64) -> u32 {
        if self.tick_ms == 0 {
            return 100;
        }
        let ticks = (t / self.tick_ms).min(u32::MAX as u64) as u32;
        ticks.saturating_mul(self.step).min(100)
    }

    pub fn lines(&self, t: u64) -> Vec<BootLine> {
        let visible = self.visible_count(t);
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.delay_ms as u64 <= t)
            .map(|(i, m)| {
                let age = t - m.delay_ms as u64;
                let enter = ease_out((age as f32 / LINE_ENTER_MS as f32).min(1.0));
                let target = if i + 1 == visible { 1.0 } else { OLDER_LINE_OPACITY };
                BootLine {
                    index: i,
                    label: format!("[{:02}]", i + 1),
                    text: m.text.clone(),
                    opacity: target * enter,
                    rise: LINE_RISE_PX * (1.0 - enter),
                }
            })
            .collect()
    }

    pub fn fade(&self, t: u64) -> f32 {
        if t < self.complete_ms {
            return 1.0;
        }
        if self.fade_ms == 0 {
            return 0.0;
        }
        1.0 - ((t - self.complete_ms) as f32 / self.fade_ms as f32).min(1.0)
    }

    pub fn is_complete(&self, t: u64) -> bool {
        t >= self.complete_ms
    }

    pub fn is_finished(&self, t: u64) -> bool {
        t >= self.total_ms()
    }

    pub fn sample(&self, t: u64) -> BootFrame {
        let intro = ease_out((t as f32 / INTRO_MS as f32).min(1.0));
        BootFrame {
            lines: self.lines(t),
            progress: self.progress(t),
            core_scale: 0.8 + 0.2 * intro,
            core_opacity: intro,
            rotation: hex_rotation(t),
            dot_scale: 1.0 + 0.2 * pulse(t),
            label_opacity: 0.5 + 0.5 * pulse(t),
            scan: (t % SCAN_MS) as f32 / SCAN_MS as f32,
            fade: self.fade(t),
            complete: self.is_complete(t),
            finished: self.is_finished(t),
        }
    }
}

/// One full turn every eight seconds.
pub fn hex_rotation(t: u64) -> f32 {
    TAU * (t % HEX_TURN_MS) as f32 / HEX_TURN_MS as f32
}

fn pulse(t: u64) -> f32 {
    // Starts the cycle at its low point so t = 0 reads as the rest pose.
    breathe(t as f32, PULSE_MS as f32)
}

fn ease_out(u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    if u >= 1.0 {
        return 1.0;
    }
    // Upper half of the smoothstep, rescaled: fast start, gentle landing.
    2.0 * ease_in_out(0.5 + u * 0.5) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> BootTimeline {
        BootTimeline::from_config(&BootConfig::default())
    }

    #[test]
    fn messages_reveal_every_400ms() {
        let tl = timeline();
        assert_eq!(tl.visible_count(0), 1);
        assert_eq!(tl.visible_count(399), 1);
        assert_eq!(tl.visible_count(400), 2);
        assert_eq!(tl.visible_count(1600), 5);
        assert_eq!(tl.visible_count(10_000), 5);
    }

    #[test]
    fn progress_ticks_and_caps() {
        let tl = timeline();
        assert_eq!(tl.progress(0), 0);
        assert_eq!(tl.progress(39), 0);
        assert_eq!(tl.progress(40), 2);
        assert_eq!(tl.progress(1000), 50);
        assert_eq!(tl.progress(2000), 100);
        assert_eq!(tl.progress(2499), 100);
    }

    #[test]
    fn newest_line_is_brightest() {
        let tl = timeline();
        let lines = tl.lines(1550);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].label, "[01]");
        assert_eq!(lines[3].label, "[04]");
        assert!((lines[3].opacity - 1.0).abs() < 1e-6);
        assert!((lines[0].opacity - OLDER_LINE_OPACITY).abs() < 1e-6);
        assert_eq!(lines[3].rise, 0.0);
        // Just revealed: transparent and still low.
        let fresh = tl.lines(1600);
        assert_eq!(fresh[4].opacity, 0.0);
        assert_eq!(fresh[4].rise, LINE_RISE_PX);
    }

    #[test]
    fn completes_then_fades() {
        let tl = timeline();
        assert_eq!(tl.total_ms(), 3000);
        let before = tl.sample(2499);
        assert!(!before.complete && before.fade == 1.0);
        let mid = tl.sample(2750);
        assert!(mid.complete && !mid.finished);
        assert!((mid.fade - 0.5).abs() < 1e-6);
        let done = tl.sample(3000);
        assert!(done.finished && done.fade == 0.0);
    }

    #[test]
    fn decorations_cycle() {
        assert_eq!(hex_rotation(0), 0.0);
        assert!((hex_rotation(4000) - std::f32::consts::PI).abs() < 1e-5);
        assert_eq!(hex_rotation(8000), 0.0);
        let tl = timeline();
        let rest = tl.sample(0);
        assert_eq!((rest.dot_scale, rest.label_opacity), (1.0, 0.5));
        assert_eq!((rest.core_scale, rest.core_opacity), (0.8, 0.0));
        let peak = tl.sample(500);
        assert!((peak.dot_scale - 1.2).abs() < 1e-5);
        assert!((peak.label_opacity - 1.0).abs() < 1e-5);
        assert!((peak.core_scale - 1.0).abs() < 1e-6);
        assert!((tl.sample(1250).scan - 0.25).abs() < 1e-6);
    }

    #[test]
    fn custom_timing() {
        let cfg = BootConfig {
            progress_tick_ms: 0,
            complete_ms: 100,
            fade_ms: 0,
            messages: Vec::new(),
            ..Default::default()
        };
        let tl = BootTimeline::from_config(&cfg);
        assert_eq!(tl.progress(0), 100);
        assert!(tl.lines(5000).is_empty());
        assert_eq!(tl.fade(100), 0.0);
        assert!(tl.is_finished(100));
    }
}
