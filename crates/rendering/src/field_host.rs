//! Hosts the particle field animator inside Bevy.
//!
//! The animator draws into a [`PixelCanvas`] sized to the primary window's
//! logical resolution; the canvas is uploaded to an `Image` shown by a single
//! full-window sprite behind everything else. Bevy's frame loop drains the
//! animator's [`FrameQueue`] once per `Update`.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use hx_config::FieldConfig;
use hx_core::{BackdropConfigRes, FieldMountRequest, FieldStepSet, InputSet, PresentSet, RngSeed};
use hx_field::{Animator, FrameQueue, FrameStats, Painter, PixelCanvas, Point, Surface, SurfaceSize};
use rand::{rngs::StdRng, SeedableRng};

use crate::texture::{canvas_image, upload};

/// Below the overlays and the boot splash.
pub const FIELD_Z: f32 = -100.0;

/// Marker for the full-window sprite showing the field canvas.
#[derive(Component, Debug)]
pub struct FieldSprite;

#[derive(Resource)]
pub struct FieldHost {
    animator: Option<Animator<FrameQueue>>,
    canvas: PixelCanvas,
    image: Handle<Image>,
    rng: StdRng,
    /// Canvas changed since the last upload.
    dirty: bool,
    mounts: u32,
}

impl FieldHost {
    pub fn new(image: Handle<Image>, seed: u64) -> Self {
        Self {
            animator: None,
            canvas: PixelCanvas::new(SurfaceSize::default()),
            image,
            rng: StdRng::seed_from_u64(seed),
            dirty: false,
            mounts: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.animator.as_ref().is_some_and(Animator::is_mounted)
    }

    pub fn animator(&self) -> Option<&Animator<FrameQueue>> {
        self.animator.as_ref()
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn image(&self) -> &Handle<Image> {
        &self.image
    }

    /// Frames advanced since the current mount.
    pub fn frame(&self) -> Option<u64> {
        self.animator.as_ref()?.state().map(|s| s.frame)
    }

    pub fn stats(&self) -> Option<FrameStats> {
        self.animator.as_ref().filter(|a| a.is_mounted()).map(Animator::stats)
    }

    /// Successful mounts since startup.
    pub fn mount_count(&self) -> u32 {
        self.mounts
    }

    /// Mounts a fresh field on a canvas of `size`. Returns whether it came up
    /// live; a zero-sized surface leaves an inert animator behind.
    pub fn mount(&mut self, config: &FieldConfig, size: SurfaceSize) -> bool {
        if self.is_mounted() {
            return true;
        }
        self.canvas.resize(size);
        let animator = Animator::mount(config, Some(&mut self.canvas), FrameQueue::new(), &mut self.rng);
        let live = animator.is_mounted();
        self.animator = Some(animator);
        if live {
            self.mounts += 1;
        }
        live
    }

    /// Tears the field down and blanks the canvas. Returns whether a live
    /// field was actually removed.
    pub fn unmount(&mut self) -> bool {
        let Some(mut animator) = self.animator.take() else {
            return false;
        };
        let was_live = animator.is_mounted();
        animator.unmount();
        self.canvas.clear();
        self.dirty = true;
        was_live
    }

    pub fn on_pointer_move(&mut self, pointer: Point) {
        if let Some(a) = self.animator.as_mut() {
            a.on_pointer_move(pointer);
        }
    }

    pub fn on_resize(&mut self, size: SurfaceSize) {
        if let Some(a) = self.animator.as_mut() {
            a.on_resize(&mut self.canvas, size);
        }
    }

    /// Delivers the pending frame, if any. `dt` is in 60 Hz reference frames.
    pub fn pump(&mut self, dt: f32) -> bool {
        let ran = match self.animator.as_mut() {
            Some(a) => a.pump(&mut self.canvas, dt),
            None => false,
        };
        self.dirty |= ran;
        ran
    }
}

/// Logical window size as a canvas size.
pub fn surface_size(window: &Window) -> SurfaceSize {
    SurfaceSize::new(window.width().round() as u32, window.height().round() as u32)
}

pub struct FieldHostPlugin;

impl Plugin for FieldHostPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_field_host).add_systems(
            Update,
            (
                (apply_mount_requests, track_resize, track_pointer).chain().in_set(InputSet),
                step_field.in_set(FieldStepSet),
                present_field.in_set(PresentSet),
            )
                .run_if(resource_exists::<FieldHost>),
        );
    }
}

fn setup_field_host(
    mut commands: Commands,
    cfg: Res<BackdropConfigRes>,
    seed: Res<RngSeed>,
    images: Option<ResMut<Assets<Image>>>,
    mut requests: EventWriter<FieldMountRequest>,
) {
    let image = images
        .map(|mut images| images.add(canvas_image(&PixelCanvas::new(SurfaceSize::default()))))
        .unwrap_or_default();
    commands.spawn((
        FieldSprite,
        Sprite {
            image: image.clone(),
            color: Color::srgba(1.0, 1.0, 1.0, cfg.field.canvas_opacity),
            custom_size: Some(Vec2::new(cfg.window.width, cfg.window.height)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, FIELD_Z),
        Visibility::Hidden,
    ));
    commands.insert_resource(FieldHost::new(image, seed.0));
    requests.write(FieldMountRequest::Mount);
}

fn apply_mount_requests(
    mut requests: EventReader<FieldMountRequest>,
    mut host: ResMut<FieldHost>,
    cfg: Res<BackdropConfigRes>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    for request in requests.read() {
        match request {
            FieldMountRequest::Mount => {
                if host.is_mounted() {
                    continue;
                }
                let size = windows.single().map(surface_size).unwrap_or_default();
                if host.mount(&cfg.field, size) {
                    info!(
                        population = cfg.field.population,
                        orbs = cfg.field.orbs,
                        width = size.width,
                        height = size.height,
                        "Particle field mounted"
                    );
                } else {
                    debug!(width = size.width, height = size.height, "No drawable surface; particle field left inert");
                }
            }
            FieldMountRequest::Unmount => {
                if host.unmount() {
                    info!("Particle field unmounted");
                }
            }
        }
    }
}

fn track_resize(mut host: ResMut<FieldHost>, windows: Query<&Window, With<PrimaryWindow>>) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = surface_size(window);
    if !size.is_empty() && size != host.canvas.size() {
        host.on_resize(size);
    }
}

fn track_pointer(mut host: ResMut<FieldHost>, windows: Query<&Window, With<PrimaryWindow>>) {
    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(pos) = window.cursor_position() {
        host.on_pointer_move(Point::new(pos.x, pos.y));
    }
}

fn step_field(time: Res<Time>, mut host: ResMut<FieldHost>) {
    host.pump(time.delta_secs() * 60.0);
}

fn present_field(
    mut host: ResMut<FieldHost>,
    images: Option<ResMut<Assets<Image>>>,
    mut sprites: Query<(&mut Sprite, &mut Visibility), With<FieldSprite>>,
) {
    let live = host.is_mounted();
    for (mut sprite, mut visibility) in &mut sprites {
        visibility.set_if_neq(if live { Visibility::Visible } else { Visibility::Hidden });
        let size = Vec2::new(host.canvas.width() as f32, host.canvas.height() as f32);
        if live && sprite.custom_size != Some(size) {
            sprite.custom_size = Some(size);
        }
    }
    if !host.dirty {
        return;
    }
    if let Some(mut images) = images {
        if let Some(image) = images.get_mut(&host.image) {
            upload(&host.canvas, image);
        }
    }
    host.dirty = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use hx_core::CorePlugin;

    fn app_with_window(width: f32, height: f32) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default()));
        app.init_asset::<Image>();
        let mut cfg = hx_config::BackdropConfig::default();
        cfg.field.population = 40;
        app.insert_resource(BackdropConfigRes(cfg));
        app.insert_resource(RngSeed(7));
        app.add_plugins((CorePlugin, FieldHostPlugin));
        app.world_mut().spawn((
            Window { resolution: (width, height).into(), ..default() },
            PrimaryWindow,
        ));
        app
    }

    #[test]
    fn mounts_on_startup_and_uploads_frames() {
        let mut app = app_with_window(160.0, 90.0);
        app.update();
        app.update();

        let host = app.world().resource::<FieldHost>();
        assert!(host.is_mounted());
        assert_eq!(host.mount_count(), 1);
        assert!(host.frame().unwrap_or_default() >= 1);
        assert_eq!(host.canvas().size(), SurfaceSize::new(160, 90));
        let handle = host.image().clone();

        let images = app.world().resource::<Assets<Image>>();
        let image = images.get(&handle).expect("field image");
        assert_eq!((image.width(), image.height()), (160, 90));

        let world = app.world_mut();
        let mut q = world.query_filtered::<&Visibility, With<FieldSprite>>();
        assert_eq!(q.iter(world).collect::<Vec<_>>(), vec![&Visibility::Visible]);
    }

    #[test]
    fn unmount_stops_frames_and_remount_reseeds() {
        let mut app = app_with_window(120.0, 80.0);
        app.update();
        app.update();
        app.world_mut().send_event(FieldMountRequest::Unmount);
        app.update();
        assert!(!app.world().resource::<FieldHost>().is_mounted());
        app.world_mut().send_event(FieldMountRequest::Unmount);
        app.update();
        assert!(app.world().resource::<FieldHost>().frame().is_none());

        app.world_mut().send_event(FieldMountRequest::Mount);
        app.update();
        let host = app.world().resource::<FieldHost>();
        assert!(host.is_mounted());
        assert_eq!(host.mount_count(), 2);
        assert_eq!(host.frame(), Some(1));
    }

    #[test]
    fn no_window_leaves_field_inert() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default()));
        app.init_asset::<Image>();
        app.add_plugins((CorePlugin, FieldHostPlugin));
        app.update();
        app.update();
        let host = app.world().resource::<FieldHost>();
        assert!(!host.is_mounted());
        assert_eq!(host.mount_count(), 0);
    }

    #[test]
    fn window_resize_reaches_the_canvas() {
        let mut app = app_with_window(100.0, 100.0);
        app.update();
        {
            let world = app.world_mut();
            let mut q = world.query_filtered::<&mut Window, With<PrimaryWindow>>();
            for mut w in q.iter_mut(world) {
                w.resolution.set(200.0, 50.0);
            }
        }
        app.update();
        app.update();
        let host = app.world().resource::<FieldHost>();
        assert_eq!(host.canvas().size(), SurfaceSize::new(200, 50));
        let state = host.animator().and_then(|a| a.state()).expect("mounted");
        assert!(state.particles.iter().all(|p| p.x < 200.0 && p.y < 50.0));
    }
}
