// Rendering crate: camera, the particle field host and the ambient overlay glows.
// Everything drawn here comes from hx_field's software canvas uploaded as sprite textures.

use bevy::prelude::*;
use hx_field::palette;

pub mod field_host;
pub use field_host::{FieldHost, FieldHostPlugin, FieldSprite, FIELD_Z};

pub mod overlay;
pub use overlay::{OverlayClock, OverlayPlugin, OverlaySprite, OVERLAY_Z};

pub mod texture;
pub use texture::{canvas_image, upload};

#[cfg(feature = "golden")]
pub mod golden;
#[cfg(feature = "golden")]
pub use golden::{GoldenHashPlugin, GoldenSettings, GoldenState};

/// Page background behind every layer.
pub fn background_color() -> Color {
    let [r, g, b] = palette::BACKGROUND;
    Color::srgb_u8(r, g, b)
}

#[derive(Component)]
pub struct BackdropCamera;

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, BackdropCamera));
}

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(background_color()))
            .add_systems(Startup, setup_camera)
            .add_plugins((FieldHostPlugin, OverlayPlugin));
    }
}
