//! Drawing vocabulary shared by the field renderer and its painters.
//!
//! The field never talks to a concrete graphics API: it emits calls against
//! [`Painter`], which is implemented by the software [`PixelCanvas`](crate::PixelCanvas)
//! and by [`RecordingPainter`] for tests.

/// Surface-space point (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Drawing surface dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.width as f32
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.height as f32
    }
}

/// Straight (non-premultiplied) sRGB colour, channels in `0..=1`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// 8-bit channel triple plus a float alpha, the way CSS `rgba()` strings read.
    pub fn rgb8(rgb: [u8; 3], alpha: f32) -> Self {
        Self {
            r: rgb[0] as f32 / 255.0,
            g: rgb[1] as f32 / 255.0,
            b: rgb[2] as f32 / 255.0,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }
}

/// Gradient stop; `offset` is `0..=1` along the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Samples a gradient at `t`, interpolating premultiplied colour between the
/// surrounding stops. Returns premultiplied `[r, g, b, a]`.
pub fn sample_stops(stops: &[ColorStop], t: f32) -> [f32; 4] {
    fn premul(c: Rgba) -> [f32; 4] {
        [c.r * c.a, c.g * c.a, c.b * c.a, c.a]
    }
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return premul(first.color);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span <= f32::EPSILON { 1.0 } else { (t - a.offset) / span };
            let (pa, pb) = (premul(a.color), premul(b.color));
            return [
                pa[0] + (pb[0] - pa[0]) * u,
                pa[1] + (pb[1] - pa[1]) * u,
                pa[2] + (pb[2] - pa[2]) * u,
                pa[3] + (pb[3] - pa[3]) * u,
            ];
        }
    }
    premul(stops[stops.len() - 1].color)
}

/// 2D drawing context used by the field renderer.
pub trait Painter {
    /// Clears the whole surface to transparent.
    fn clear(&mut self);
    /// Fills a disc with a radial gradient from `center` (offset 0) to `radius` (offset 1).
    fn fill_radial(&mut self, center: Point, radius: f32, stops: &[ColorStop]);
    /// Strokes a segment whose colour follows `stops` from `from` (0) to `to` (1).
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, stops: &[ColorStop]);
    /// Strokes a closed polygon outline.
    fn stroke_polygon(&mut self, points: &[Point], width: f32, color: Rgba);
    /// Strokes a circle outline.
    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgba);
}

/// A surface the animator can draw on. `context` is `None` when no usable 2D
/// context exists, which makes the animator degrade to a silent no-op.
pub trait Surface {
    type Context: Painter;
    fn size(&self) -> SurfaceSize;
    fn resize(&mut self, size: SurfaceSize);
    fn context(&mut self) -> Option<&mut Self::Context>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Radial { center: Point, radius: f32, stops: Vec<ColorStop> },
    Line { from: Point, to: Point, width: f32, stops: Vec<ColorStop> },
    Polygon { points: Vec<Point>, width: f32, color: Rgba },
    Circle { center: Point, radius: f32, width: f32, color: Rgba },
}

/// Painter that records calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    pub size: SurfaceSize,
    pub calls: Vec<DrawCall>,
    /// When false, `context()` reports no usable context.
    pub has_context: bool,
}

impl RecordingPainter {
    pub fn new(size: SurfaceSize) -> Self {
        Self { size, calls: Vec::new(), has_context: true }
    }

    /// A surface whose 2D context cannot be acquired.
    pub fn without_context(size: SurfaceSize) -> Self {
        Self { size, calls: Vec::new(), has_context: false }
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. }))
    }

    pub fn radials(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Radial { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Circle { .. }))
    }
}

impl Painter for RecordingPainter {
    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn fill_radial(&mut self, center: Point, radius: f32, stops: &[ColorStop]) {
        self.calls.push(DrawCall::Radial { center, radius, stops: stops.to_vec() });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, stops: &[ColorStop]) {
        self.calls.push(DrawCall::Line { from, to, width, stops: stops.to_vec() });
    }

    fn stroke_polygon(&mut self, points: &[Point], width: f32, color: Rgba) {
        self.calls.push(DrawCall::Polygon { points: points.to_vec(), width, color });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgba) {
        self.calls.push(DrawCall::Circle { center, radius, width, color });
    }
}

impl Surface for RecordingPainter {
    type Context = RecordingPainter;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn context(&mut self) -> Option<&mut Self::Context> {
        if self.has_context && !self.size.is_empty() {
            Some(self)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stops_interpolates_premultiplied() {
        let stops = [
            ColorStop::new(0.0, Rgba::rgb8([255, 255, 255], 1.0)),
            ColorStop::new(1.0, Rgba::TRANSPARENT),
        ];
        let mid = sample_stops(&stops, 0.5);
        assert!((mid[3] - 0.5).abs() < 1e-6);
        assert!((mid[0] - 0.5).abs() < 1e-6, "premultiplied red halves with alpha");
        assert_eq!(sample_stops(&stops, -1.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(sample_stops(&stops, 2.0), [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(sample_stops(&[], 0.3), [0.0; 4]);
    }

    #[test]
    fn recording_surface_without_context_yields_none() {
        let mut s = RecordingPainter::without_context(SurfaceSize::new(10, 10));
        assert!(s.context().is_none());
        let mut empty = RecordingPainter::new(SurfaceSize::new(0, 10));
        assert!(empty.context().is_none(), "zero-area surface has no usable context");
    }

    #[test]
    fn clear_resets_recorded_calls() {
        let mut p = RecordingPainter::new(SurfaceSize::new(4, 4));
        p.stroke_circle(Point::new(1.0, 1.0), 1.0, 1.0, Rgba::TRANSPARENT);
        p.clear();
        assert_eq!(p.calls, vec![DrawCall::Clear]);
    }
}
