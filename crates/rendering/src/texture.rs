//! `PixelCanvas` <-> Bevy `Image` plumbing.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use hx_field::PixelCanvas;

/// Builds a texture holding the canvas pixels. An empty canvas becomes a
/// single transparent texel so the image is always valid.
pub fn canvas_image(canvas: &PixelCanvas) -> Image {
    let (width, height) = (canvas.width(), canvas.height());
    let (size, data) = if width == 0 || height == 0 {
        (Extent3d { width: 1, height: 1, depth_or_array_layers: 1 }, vec![0; 4])
    } else {
        (Extent3d { width, height, depth_or_array_layers: 1 }, canvas.to_rgba8())
    };
    Image::new(
        size,
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

/// Copies the canvas into `image`, reusing its buffer when the size matches.
pub fn upload(canvas: &PixelCanvas, image: &mut Image) {
    let same_size = image.width() == canvas.width() && image.height() == canvas.height();
    match image.data.as_mut() {
        Some(data) if same_size => canvas.write_rgba8(data),
        _ => *image = canvas_image(canvas),
    }
}
