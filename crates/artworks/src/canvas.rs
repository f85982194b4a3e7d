use std::f64::consts::TAU;
use std::fmt;

use kurbo::Shape;
use vello_cpu::kurbo::{BezPath, Rect};
use vello_cpu::{peniko, Pixmap, RenderContext};

use crate::Viewport;

/// Largest edge, in pixels, a canvas will allocate.
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("cannot allocate an empty {width}x{height} surface")]
    Empty { width: u32, height: u32 },
    #[error("surface {width}x{height} exceeds the {max}px edge limit")]
    TooLarge { width: u32, height: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Gallery background, `#0a0a0a`.
    pub const VOID: Color = Color::rgb(10, 10, 10);
    pub const PAPER: Color = Color::rgb(249, 249, 249);
    pub const OCHRE: Color = Color::rgb(139, 115, 85);
    pub const UMBER: Color = Color::rgb(89, 65, 45);
    pub const TAN: Color = Color::rgb(196, 181, 154);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: unit_to_byte(alpha),
            ..self
        }
    }

    /// Multiplies the colour channels, leaving alpha untouched.
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.max(0.0);
        let channel = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

fn unit_to_byte(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Rasterised RGBA8 drawing surface backed by `vello_cpu`.
///
/// Coordinates are in pixels with the origin top-left. Drawing calls are
/// recorded into a render context and only land in the pixel buffer on
/// [`Canvas::flush`]; [`Canvas::as_bytes`] and [`Canvas::pixel`] read the
/// flushed contents. The stored alpha channel is always opaque so the buffer
/// can be uploaded or encoded as-is.
pub struct Canvas {
    ctx: RenderContext,
    pixels: Pixmap,
    scratch: Pixmap,
    pending: bool,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("pending", &self.pending)
            .finish()
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let (w, h) = check_size(width, height)?;
        let mut canvas = Self {
            ctx: RenderContext::new(w, h),
            pixels: Pixmap::new(w, h),
            scratch: Pixmap::new(w, h),
            pending: false,
        };
        canvas.clear(Color::VOID);
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixels.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixels.height())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width(), self.height())
    }

    /// Reallocates for a new size. Contents and pending drawing are dropped.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let (w, h) = check_size(width, height)?;
        if (width, height) == (self.width(), self.height()) {
            return Ok(());
        }
        self.reallocate(w, h);
        self.clear(Color::VOID);
        Ok(())
    }

    /// Flushed pixels, row-major RGBA8.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.data_as_u8_slice()
    }

    /// Becomes a copy of `other`'s flushed pixels. Anything still pending on
    /// either side is dropped.
    pub fn copy_from(&mut self, other: &Canvas) {
        if (self.width(), self.height()) != (other.width(), other.height()) {
            self.reallocate(other.pixels.width(), other.pixels.height());
        }
        self.ctx.reset();
        self.pending = false;
        self.pixels
            .data_as_u8_slice_mut()
            .copy_from_slice(other.pixels.data_as_u8_slice());
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = (y as usize * self.width() as usize + x as usize) * 4;
        let px = &self.as_bytes()[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Paints every pixel opaque `color`, discarding pending drawing.
    pub fn clear(&mut self, color: Color) {
        self.ctx.reset();
        self.pending = false;
        let rgba = [color.r, color.g, color.b, 255];
        for px in self.pixels.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Rasterises everything drawn since the last flush onto the pixels.
    pub fn flush(&mut self) {
        if !self.pending {
            return;
        }
        self.scratch.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.scratch);
        self.ctx.reset();
        self.pending = false;
        premul_over_in_place(
            self.pixels.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
        );
    }

    /// Washes the whole canvas with a translucent layer, leaving trails.
    pub fn fade(&mut self, color: Color, alpha: f32) {
        let a = unit_to_byte(alpha);
        if a == 0 {
            return;
        }
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        self.paint(Color { a, ..color });
        self.ctx.fill_rect(&Rect::new(0.0, 0.0, w, h));
    }

    /// Covers the pixel containing `(x, y)`.
    pub fn plot(&mut self, x: f32, y: f32, color: Color) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.fill_rect(x.floor(), y.floor(), 1.0, 1.0, color);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(rect) = self.visible(Rect::new(
            f64::from(x),
            f64::from(y),
            f64::from(x + w),
            f64::from(y + h),
        )) else {
            return;
        };
        if color.a == 0 {
            return;
        }
        self.paint(color);
        self.ctx.fill_rect(&rect);
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        if radius < 0.75 {
            self.plot(cx, cy, color);
            return;
        }
        let circle = kurbo::Circle::new((f64::from(cx), f64::from(cy)), f64::from(radius));
        if self.visible(circle.bounding_box()).is_none() {
            return;
        }
        self.fill_shape(&circle, color);
    }

    /// One pixel wide ring centred on `radius`.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let center = (f64::from(cx), f64::from(cy));
        let outer = f64::from(radius) + 0.5;
        let inner = (f64::from(radius) - 0.5).max(0.0);
        let ring = kurbo::CircleSegment::new(center, outer, inner, 0.0, TAU);
        if self.visible(ring.bounding_box()).is_none() {
            return;
        }
        self.fill_shape(&ring, color);
    }

    /// One pixel wide segment from `(x0, y0)` to `(x1, y1)`.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        let from = kurbo::Point::new(f64::from(x0), f64::from(y0));
        let to = kurbo::Point::new(f64::from(x1), f64::from(y1));
        let along = to - from;
        let length = along.hypot();
        if !length.is_finite() {
            return;
        }
        if length < 0.5 {
            self.plot(x0, y0, color);
            return;
        }
        let bounds = Rect::from_points(from, to).inflate(1.0, 1.0);
        if self.visible(bounds).is_none() || color.a == 0 {
            return;
        }
        let half = kurbo::Vec2::new(-along.y, along.x) * (0.5 / length);
        let mut path = BezPath::new();
        path.move_to(from + half);
        path.line_to(to + half);
        path.line_to(to - half);
        path.line_to(from - half);
        path.close_path();
        self.paint(color);
        self.ctx.fill_path(&path);
    }

    fn fill_shape(&mut self, shape: &impl Shape, color: Color) {
        if color.a == 0 {
            return;
        }
        let mut path = BezPath::new();
        for el in shape.path_elements(0.1) {
            path.push(el);
        }
        self.paint(color);
        self.ctx.fill_path(&path);
    }

    fn paint(&mut self, color: Color) {
        self.ctx
            .set_paint(peniko::Color::from_rgba8(color.r, color.g, color.b, color.a));
        self.pending = true;
    }

    /// Part of `rect` inside the canvas, if any.
    fn visible(&self, rect: Rect) -> Option<Rect> {
        let bounds = Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()));
        let clipped = rect.abs().intersect(bounds);
        (clipped.is_finite() && clipped.area() > 0.0).then_some(clipped)
    }

    fn reallocate(&mut self, w: u16, h: u16) {
        self.ctx = RenderContext::new(w, h);
        self.pixels = Pixmap::new(w, h);
        self.scratch = Pixmap::new(w, h);
        self.pending = false;
    }
}

fn check_size(width: u32, height: u32) -> Result<(u16, u16), SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::Empty { width, height });
    }
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if width <= MAX_DIMENSION && height <= MAX_DIMENSION => Ok((w, h)),
        _ => Err(SurfaceError::TooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        }),
    }
}

/// Source-over of premultiplied `src` onto `dst`, both RGBA8.
fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        d[3] = s[3].saturating_add(mul_div255(u16::from(d[3]), inv));
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255(u16::from(d[c]), inv));
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}
