//! Splash entities and the systems that drive them from [`BootTimeline`].

use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;
use hx_config::BootMode;
use hx_core::{AppState, BackdropConfigRes};
use hx_field::palette::{BACKGROUND, PRIMARY_GLOW};
use hx_field::{PixelCanvas, SurfaceSize};
use hx_rendering::canvas_image;
use std::time::Duration;

use crate::art::{self, BAR_HEIGHT, BAR_WIDTH, DOT_TEXTURE, RINGS_SIZE, SCAN_WIDTH};
use crate::timeline::{BootFrame, BootTimeline};

/// Above the field and its overlays.
pub const SPLASH_Z: f32 = 100.0;
const RINGS_Y: f32 = 106.0;
const LINES_X: f32 = -160.0;
const LINES_TOP: f32 = -16.0;
const LINE_HEIGHT: f32 = 20.0;
const BAR_Y: f32 = -136.0;
const LABEL_Y: f32 = -160.0;
const GRID_OPACITY: f32 = 0.3;
const MUTED: [u8; 3] = [26, 34, 46];
const MUTED_TEXT: [u8; 3] = [128, 146, 160];

/// Elapsed splash time and completed loop count.
#[derive(Resource, Debug, Default)]
pub struct BootClock {
    pub elapsed: Duration,
    pub plays: u32,
}

impl BootClock {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis().min(u64::MAX as u128) as u64
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ActiveTimeline(pub BootTimeline);

#[derive(Component, Debug)]
pub struct SplashRoot;

/// Which splash element an entity is; each reads a different part of [`BootFrame`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashPart {
    Backdrop,
    Grid,
    Rings,
    Dot,
    Line(usize),
    Track,
    Fill,
    Scan,
    Label,
}

fn rgb(c: [u8; 3], alpha: f32) -> Color {
    Color::srgba_u8(c[0], c[1], c[2], 255).with_alpha(alpha)
}

fn texture(images: &mut Option<ResMut<Assets<Image>>>, canvas: &PixelCanvas) -> Handle<Image> {
    images
        .as_mut()
        .map(|images| images.add(canvas_image(canvas)))
        .unwrap_or_default()
}

fn window_size(windows: &Query<&Window, With<PrimaryWindow>>, cfg: &BackdropConfigRes) -> Vec2 {
    windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .ok()
        .filter(|s| s.x > 0.0 && s.y > 0.0)
        .unwrap_or(Vec2::new(cfg.window.width, cfg.window.height))
}

pub(crate) fn start_boot(
    mut commands: Commands,
    cfg: Res<BackdropConfigRes>,
    mut next: ResMut<NextState<AppState>>,
    mut images: Option<ResMut<Assets<Image>>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if cfg.boot.mode == BootMode::Skip {
        info!("Boot splash skipped");
        next.set(AppState::Field);
        return;
    }
    let timeline = BootTimeline::from_config(&cfg.boot);
    let window = window_size(&windows, &cfg);
    let grid = art::bake_grid(SurfaceSize::new(window.x as u32, window.y as u32));

    let grid_tex = texture(&mut images, &grid);
    let rings_tex = texture(&mut images, &art::bake_rings());
    let dot_tex = texture(&mut images, &art::bake_dot());
    let fill_tex = texture(&mut images, &art::bake_progress_fill());
    let scan_tex = texture(&mut images, &art::bake_scan());

    let bar_left = -(BAR_WIDTH as f32) * 0.5;
    commands
        .spawn((SplashRoot, Transform::from_xyz(0.0, 0.0, SPLASH_Z), Visibility::Visible))
        .with_children(|root| {
            root.spawn((
                SplashPart::Backdrop,
                Sprite { color: rgb(BACKGROUND, 1.0), custom_size: Some(window), ..default() },
                Transform::default(),
            ));
            root.spawn((
                SplashPart::Grid,
                Sprite { image: grid_tex, custom_size: Some(window), ..default() },
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
            root.spawn((
                SplashPart::Rings,
                Sprite {
                    image: rings_tex,
                    custom_size: Some(Vec2::splat(RINGS_SIZE as f32)),
                    ..default()
                },
                Transform::from_xyz(0.0, RINGS_Y, 0.2),
            ));
            root.spawn((
                SplashPart::Dot,
                Sprite {
                    image: dot_tex,
                    custom_size: Some(Vec2::splat(DOT_TEXTURE as f32)),
                    ..default()
                },
                Transform::from_xyz(0.0, RINGS_Y, 0.3),
            ));
            for i in 0..timeline.message_count() {
                root.spawn((
                    SplashPart::Line(i),
                    Text2d::new(""),
                    TextFont { font_size: 14.0, ..default() },
                    TextColor(rgb(PRIMARY_GLOW, 0.0)),
                    Anchor::CenterLeft,
                    Transform::from_xyz(LINES_X, LINES_TOP - i as f32 * LINE_HEIGHT, 0.4),
                ));
            }
            root.spawn((
                SplashPart::Track,
                Sprite {
                    color: rgb(MUTED, 1.0),
                    custom_size: Some(Vec2::new(BAR_WIDTH as f32, BAR_HEIGHT as f32)),
                    ..default()
                },
                Transform::from_xyz(0.0, BAR_Y, 0.4),
            ));
            root.spawn((
                SplashPart::Fill,
                Sprite {
                    image: fill_tex,
                    custom_size: Some(Vec2::new(0.0, BAR_HEIGHT as f32)),
                    anchor: Anchor::CenterLeft,
                    ..default()
                },
                Transform::from_xyz(bar_left, BAR_Y, 0.5),
            ));
            root.spawn((
                SplashPart::Scan,
                Sprite {
                    image: scan_tex,
                    custom_size: Some(Vec2::new(SCAN_WIDTH as f32, BAR_HEIGHT as f32)),
                    ..default()
                },
                Transform::from_xyz(bar_left, BAR_Y, 0.6),
            ));
            root.spawn((
                SplashPart::Label,
                Text2d::new("0% COMPLETE"),
                TextFont { font_size: 12.0, ..default() },
                TextColor(rgb(MUTED_TEXT, 0.5)),
                Transform::from_xyz(0.0, LABEL_Y, 0.4),
            ));
        });

    commands.insert_resource(ActiveTimeline(timeline));
    commands.insert_resource(BootClock::default());
    info!(mode = ?cfg.boot.mode, "Boot splash started");
}

pub(crate) fn tick_boot(
    time: Res<Time>,
    cfg: Res<BackdropConfigRes>,
    timeline: Res<ActiveTimeline>,
    mut clock: ResMut<BootClock>,
    mut next: ResMut<NextState<AppState>>,
) {
    clock.elapsed += time.delta();
    if !timeline.0.is_finished(clock.elapsed_ms()) {
        return;
    }
    match cfg.boot.mode {
        BootMode::Loop => {
            clock.elapsed = Duration::ZERO;
            clock.plays += 1;
            debug!(plays = clock.plays, "Boot splash restarting");
        }
        _ => next.set(AppState::Field),
    }
}

pub(crate) fn apply_frame(
    timeline: Res<ActiveTimeline>,
    clock: Res<BootClock>,
    cfg: Res<BackdropConfigRes>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprites: Query<(&SplashPart, &mut Sprite, &mut Transform), Without<Text2d>>,
    mut texts: Query<(&SplashPart, &mut Text2d, &mut TextColor, &mut Transform), Without<Sprite>>,
) {
    let frame: BootFrame = timeline.0.sample(clock.elapsed_ms());
    let fade = frame.fade;
    let window = window_size(&windows, &cfg);
    let bar_left = -(BAR_WIDTH as f32) * 0.5;

    for (part, mut sprite, mut transform) in &mut sprites {
        match part {
            SplashPart::Backdrop => {
                sprite.custom_size = Some(window);
                sprite.color.set_alpha(fade);
            }
            SplashPart::Grid => {
                sprite.custom_size = Some(window);
                sprite.color.set_alpha(GRID_OPACITY * fade);
            }
            SplashPart::Rings => {
                // CSS rotation is clockwise on screen; Bevy's z rotation is counter-clockwise.
                transform.rotation = Quat::from_rotation_z(-frame.rotation);
                transform.scale = Vec3::splat(frame.core_scale);
                sprite.color.set_alpha(frame.core_opacity * fade);
            }
            SplashPart::Dot => {
                transform.scale = Vec3::splat(frame.core_scale * frame.dot_scale);
                sprite.color.set_alpha(frame.core_opacity * fade);
            }
            SplashPart::Track => sprite.color.set_alpha(fade),
            SplashPart::Fill => {
                let width = BAR_WIDTH as f32 * frame.progress as f32 / 100.0;
                sprite.custom_size = Some(Vec2::new(width, BAR_HEIGHT as f32));
                sprite.color.set_alpha(fade);
            }
            SplashPart::Scan => {
                let scan_width = SCAN_WIDTH as f32;
                let travel = BAR_WIDTH as f32 - scan_width;
                transform.translation.x = bar_left + scan_width * 0.5 + travel * frame.scan;
                sprite.color.set_alpha(fade);
            }
            SplashPart::Line(_) | SplashPart::Label => {}
        }
    }

    for (part, mut text, mut color, mut transform) in &mut texts {
        match part {
            SplashPart::Line(i) => {
                let Some(line) = frame.lines.iter().find(|l| l.index == *i) else {
                    color.0.set_alpha(0.0);
                    continue;
                };
                let content = format!("{} {}", line.label, line.text);
                if text.0 != content {
                    text.0 = content;
                }
                color.0.set_alpha(line.opacity * fade);
                transform.translation.y = LINES_TOP - *i as f32 * LINE_HEIGHT - line.rise;
            }
            SplashPart::Label => {
                let content = format!("{}% COMPLETE", frame.progress);
                if text.0 != content {
                    text.0 = content;
                }
                color.0.set_alpha(frame.label_opacity * fade);
            }
            _ => {}
        }
    }
}

pub(crate) fn finish_boot(
    mut commands: Commands,
    roots: Query<Entity, With<SplashRoot>>,
    clock: Option<Res<BootClock>>,
) {
    for root in &roots {
        commands.entity(root).despawn();
    }
    commands.remove_resource::<ActiveTimeline>();
    commands.remove_resource::<BootClock>();
    let ms = clock.map(|c| c.elapsed_ms()).unwrap_or_default();
    info!(elapsed_ms = ms, "Boot sequence complete");
}
