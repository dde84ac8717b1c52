//! Ambient glow sprites above the field: vignette, top glow and two
//! breathing corner accents. Textures are baked once on the CPU; only sprite
//! alpha and placement change afterwards.

use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;
use hx_core::{BackdropConfigRes, PresentSet};
use hx_field::overlay::CORNER_BOX;
use hx_field::{bake, OverlayLayer, SurfaceSize};

use crate::field_host::surface_size;
use crate::texture::canvas_image;

/// Between the field and the boot splash.
pub const OVERLAY_Z: f32 = -50.0;
/// Window-sized layers are smooth gradients, so they are baked small and stretched.
const STRETCH_BAKE_DIVISOR: u32 = 4;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySprite(pub OverlayLayer);

/// Seconds since the overlays appeared.
#[derive(Resource, Debug, Default)]
pub struct OverlayClock(pub f32);

/// Sprite size, anchor and centre-origin translation of `layer` in a
/// `width x height` window.
pub fn placement(layer: OverlayLayer, width: f32, height: f32) -> (Vec2, Anchor, Vec2) {
    let corner = Vec2::splat(CORNER_BOX as f32);
    match layer {
        OverlayLayer::Vignette | OverlayLayer::TopGlow => (Vec2::new(width, height), Anchor::Center, Vec2::ZERO),
        OverlayLayer::TopLeftCorner => (corner, Anchor::TopLeft, Vec2::new(-width * 0.5, height * 0.5)),
        OverlayLayer::BottomRightCorner => (corner, Anchor::BottomRight, Vec2::new(width * 0.5, -height * 0.5)),
    }
}

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_overlays).add_systems(
            Update,
            (layout_overlays, animate_overlays)
                .in_set(PresentSet)
                .run_if(resource_exists::<OverlayClock>),
        );
    }
}

fn window_or_config(windows: &Query<&Window, With<PrimaryWindow>>, cfg: &BackdropConfigRes) -> SurfaceSize {
    windows
        .single()
        .map(surface_size)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or(SurfaceSize::new(cfg.window.width as u32, cfg.window.height as u32))
}

fn spawn_overlays(
    mut commands: Commands,
    cfg: Res<BackdropConfigRes>,
    mut images: Option<ResMut<Assets<Image>>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if !cfg.overlay.enabled {
        return;
    }
    let window = window_or_config(&windows, &cfg);
    let reduced = SurfaceSize::new(
        (window.width / STRETCH_BAKE_DIVISOR).max(1),
        (window.height / STRETCH_BAKE_DIVISOR).max(1),
    );
    for (i, layer) in OverlayLayer::ALL.into_iter().enumerate() {
        let canvas = match layer {
            OverlayLayer::Vignette | OverlayLayer::TopGlow => bake(layer, reduced),
            _ => bake(layer, window),
        };
        let image = images
            .as_mut()
            .map(|images| images.add(canvas_image(&canvas)))
            .unwrap_or_default();
        let (size, anchor, at) = placement(layer, window.w(), window.h());
        commands.spawn((
            OverlaySprite(layer),
            Sprite {
                image,
                color: Color::srgba(1.0, 1.0, 1.0, layer.opacity(0.0, cfg.overlay.vignette_opacity)),
                custom_size: Some(size),
                anchor,
                ..default()
            },
            Transform::from_xyz(at.x, at.y, OVERLAY_Z + i as f32 * 0.1),
        ));
    }
    commands.insert_resource(OverlayClock::default());
    debug!(width = window.width, height = window.height, "Overlay glows baked");
}

fn layout_overlays(
    cfg: Res<BackdropConfigRes>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut q: Query<(&OverlaySprite, &mut Sprite, &mut Transform)>,
) {
    let window = window_or_config(&windows, &cfg);
    for (overlay, mut sprite, mut transform) in &mut q {
        let (size, _, at) = placement(overlay.0, window.w(), window.h());
        if sprite.custom_size != Some(size) {
            sprite.custom_size = Some(size);
        }
        if transform.translation.truncate() != at {
            transform.translation.x = at.x;
            transform.translation.y = at.y;
        }
    }
}

fn animate_overlays(
    time: Res<Time>,
    cfg: Res<BackdropConfigRes>,
    mut clock: ResMut<OverlayClock>,
    mut q: Query<(&OverlaySprite, &mut Sprite)>,
) {
    clock.0 += time.delta_secs();
    for (overlay, mut sprite) in &mut q {
        let alpha = overlay.0.opacity(clock.0, cfg.overlay.vignette_opacity);
        sprite.color.set_alpha(alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use hx_core::CorePlugin;
    use std::time::Duration;

    fn build(enabled: bool) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default()));
        app.init_asset::<Image>();
        let mut cfg = hx_config::BackdropConfig::default();
        cfg.overlay.enabled = enabled;
        cfg.window.width = 400.0;
        cfg.window.height = 200.0;
        app.insert_resource(BackdropConfigRes(cfg));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)));
        app.add_plugins((CorePlugin, OverlayPlugin));
        app
    }

    #[test]
    fn corners_pin_to_window_corners() {
        let (size, anchor, at) = placement(OverlayLayer::BottomRightCorner, 800.0, 600.0);
        assert_eq!(size, Vec2::splat(384.0));
        assert_eq!(anchor, Anchor::BottomRight);
        assert_eq!(at, Vec2::new(400.0, -300.0));
        let (size, _, at) = placement(OverlayLayer::Vignette, 800.0, 600.0);
        assert_eq!((size, at), (Vec2::new(800.0, 600.0), Vec2::ZERO));
    }

    #[test]
    fn spawns_four_layers_and_fades_in_top_glow() {
        let mut app = build(true);
        for _ in 0..12 {
            app.update();
        }
        let world = app.world_mut();
        let mut q = world.query::<(&OverlaySprite, &Sprite)>();
        let layers: Vec<_> = q.iter(world).map(|(o, s)| (o.0, s.color.alpha())).collect();
        assert_eq!(layers.len(), 4);
        for (layer, alpha) in layers {
            match layer {
                OverlayLayer::TopGlow => assert!(alpha > 0.95, "top glow alpha {alpha}"),
                OverlayLayer::Vignette => assert!((alpha - 0.6).abs() < 1e-6),
                _ => assert!((0.3 - 1e-4..=0.5 + 1e-4).contains(&alpha)),
            }
        }
    }

    #[test]
    fn disabled_overlay_spawns_nothing() {
        let mut app = build(false);
        app.update();
        let world = app.world_mut();
        assert_eq!(world.query::<&OverlaySprite>().iter(world).count(), 0);
        assert!(!world.contains_resource::<OverlayClock>());
    }
}
