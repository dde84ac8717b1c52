//! Software 2D canvas.
//!
//! Premultiplied `f32` RGBA buffer with source-over blending and one-pixel
//! analytic anti-aliasing. Output is straight-alpha sRGB bytes, ready to be
//! uploaded as an `Rgba8UnormSrgb` texture.

use crate::paint::{sample_stops, ColorStop, Painter, Point, Rgba, Surface, SurfaceSize};

#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    size: SurfaceSize,
    /// Premultiplied, row-major, top row first.
    pixels: Vec<[f32; 4]>,
}

impl PixelCanvas {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixels: vec![[0.0; 4]; size.width as usize * size.height as usize],
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Straight-alpha colour of one pixel, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let p = self.pixels[y as usize * self.size.width as usize + x as usize];
        Some(unpremultiply(p))
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        self.write_rgba8(&mut out);
        out
    }

    /// Like [`to_rgba8`](Self::to_rgba8) but reuses `out`'s allocation.
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for &p in &self.pixels {
            let c = unpremultiply(p);
            out.extend_from_slice(&[to_u8(c.r), to_u8(c.g), to_u8(c.b), to_u8(c.a)]);
        }
    }

    /// Fills an axis-aligned ellipse with a radial gradient measured in
    /// normalized ellipse distance (offset 1 on the ellipse boundary).
    pub fn fill_elliptical(&mut self, center: Point, rx: f32, ry: f32, stops: &[ColorStop]) {
        if rx <= 0.0 || ry <= 0.0 || stops.is_empty() {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip_box(center, rx + 1.0, ry + 1.0) else {
            return;
        };
        let r_min = rx.min(ry);
        for y in y0..y1 {
            let py = y as f32 + 0.5 - center.y;
            for x in x0..x1 {
                let px = x as f32 + 0.5 - center.x;
                let t = ((px / rx).powi(2) + (py / ry).powi(2)).sqrt();
                // Edge coverage in pixels, measured along the shorter radius.
                let coverage = ((1.0 - t) * r_min + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let color = sample_stops(stops, t.min(1.0));
                self.blend(x, y, color, coverage);
            }
        }
    }

    /// Fills the canvas with a top-to-bottom gradient.
    pub fn fill_vertical(&mut self, stops: &[ColorStop]) {
        let h = self.size.h().max(1.0);
        for y in 0..self.size.height {
            let color = sample_stops(stops, (y as f32 + 0.5) / h);
            for x in 0..self.size.width {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn clip_box(&self, center: Point, ex: f32, ey: f32) -> Option<(u32, u32, u32, u32)> {
        let x0 = (center.x - ex).floor().max(0.0);
        let y0 = (center.y - ey).floor().max(0.0);
        let x1 = (center.x + ex).ceil().min(self.size.w());
        let y1 = (center.y + ey).ceil().min(self.size.h());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    #[inline]
    fn blend(&mut self, x: u32, y: u32, src: [f32; 4], coverage: f32) {
        let idx = y as usize * self.size.width as usize + x as usize;
        let dst = &mut self.pixels[idx];
        let a = src[3] * coverage;
        let inv = 1.0 - a;
        dst[0] = src[0] * coverage + dst[0] * inv;
        dst[1] = src[1] * coverage + dst[1] * inv;
        dst[2] = src[2] * coverage + dst[2] * inv;
        dst[3] = a + dst[3] * inv;
    }

    fn segment(&mut self, from: Point, to: Point, width: f32, color_at: impl Fn(f32) -> [f32; 4]) {
        let half = width * 0.5;
        let ext = half + 1.0;
        let min = Point::new(from.x.min(to.x), from.y.min(to.y));
        let max = Point::new(from.x.max(to.x), from.y.max(to.y));
        let mid = Point::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5);
        let Some((x0, y0, x1, y1)) =
            self.clip_box(mid, (max.x - min.x) * 0.5 + ext, (max.y - min.y) * 0.5 + ext)
        else {
            return;
        };
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len2 = dx * dx + dy * dy;
        for y in y0..y1 {
            let py = y as f32 + 0.5;
            for x in x0..x1 {
                let px = x as f32 + 0.5;
                let t = if len2 <= f32::EPSILON {
                    0.0
                } else {
                    (((px - from.x) * dx + (py - from.y) * dy) / len2).clamp(0.0, 1.0)
                };
                let cx = from.x + dx * t;
                let cy = from.y + dy * t;
                let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color_at(t), coverage);
                }
            }
        }
    }
}

impl Painter for PixelCanvas {
    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill_radial(&mut self, center: Point, radius: f32, stops: &[ColorStop]) {
        self.fill_elliptical(center, radius, radius, stops);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, stops: &[ColorStop]) {
        if stops.is_empty() || width <= 0.0 {
            return;
        }
        self.segment(from, to, width, |t| sample_stops(stops, t));
    }

    fn stroke_polygon(&mut self, points: &[Point], width: f32, color: Rgba) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }
        let solid = [color.r * color.a, color.g * color.a, color.b * color.a, color.a];
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.segment(from, to, width, |_| solid);
        }
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgba) {
        if radius < 0.0 || width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let ext = radius + half + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip_box(center, ext, ext) else {
            return;
        };
        let solid = [color.r * color.a, color.g * color.a, color.b * color.a, color.a];
        let inner = (radius - half - 1.0).max(0.0);
        let inner2 = inner * inner;
        for y in y0..y1 {
            let py = y as f32 + 0.5 - center.y;
            for x in x0..x1 {
                let px = x as f32 + 0.5 - center.x;
                let d2 = px * px + py * py;
                if d2 < inner2 {
                    continue;
                }
                let coverage = (half + 0.5 - (d2.sqrt() - radius).abs()).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, solid, coverage);
                }
            }
        }
    }
}

impl Surface for PixelCanvas {
    type Context = PixelCanvas;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        if size != self.size {
            *self = PixelCanvas::new(size);
        }
    }

    /// A zero-area canvas has no usable context.
    fn context(&mut self) -> Option<&mut Self::Context> {
        if self.size.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[inline]
fn unpremultiply(p: [f32; 4]) -> Rgba {
    if p[3] <= f32::EPSILON {
        return Rgba::TRANSPARENT;
    }
    Rgba { r: p[0] / p[3], g: p[1] / p[3], b: p[2] / p[3], a: p[3] }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
