// surface.rs - Drawing vocabulary and the surface boundary
//
// Layers describe what to draw with a handful of value types (paths,
// paints, styles). A `Surface` turns them into pixels: a browser canvas,
// the software raster, or a recorder in tests.

use std::f32::consts::TAU;

use crate::color::Rgba;
use crate::error::EngineError;
use crate::geometry::Point;

/// One gradient color stop; `offset` in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stop {
    pub offset: f32,
    pub color: Rgba,
}

impl Stop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Gradient along the line `from` -> `to`.
    Linear { from: Point, to: Point, stops: Vec<Stop> },
    /// Two-circle radial gradient, as canvas `createRadialGradient`.
    Radial { inner: Point, inner_r: f32, outer: Point, outer_r: f32, stops: Vec<Stop> },
}

impl Paint {
    pub fn linear(from: Point, to: Point, stops: impl Into<Vec<Stop>>) -> Self {
        Paint::Linear { from, to, stops: stops.into() }
    }

    /// Radial gradient centered on `center` from radius 0 to `r`.
    pub fn radial(center: Point, r: f32, stops: impl Into<Vec<Stop>>) -> Self {
        Paint::Radial { inner: center, inner_r: 0.0, outer: center, outer_r: r, stops: stops.into() }
    }

    /// Color at a gradient parameter. Colors are interpolated premultiplied,
    /// so fading into `transparent` does not darken.
    pub fn sample_stops(stops: &[Stop], s: f32) -> Rgba {
        let Some(first) = stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if s <= first.offset {
            return first.color;
        }
        for pair in stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if s <= b.offset {
                let span = b.offset - a.offset;
                let k = if span > 0.0 { (s - a.offset) / span } else { 1.0 };
                return premul_lerp(a.color, b.color, k);
            }
        }
        stops[stops.len() - 1].color
    }
}

fn premul_lerp(a: Rgba, b: Rgba, k: f32) -> Rgba {
    let (aa, ba) = (a.alpha(), b.alpha());
    let alpha = aa + (ba - aa) * k;
    if alpha <= 0.0 {
        return Rgba::TRANSPARENT;
    }
    let ch = |x: u8, y: u8| {
        let v = (x as f32 * aa + (y as f32 * ba - x as f32 * aa) * k) / alpha;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba::new(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b), (alpha * 255.0).round() as u8)
}

/// Soft outer glow (canvas `shadowColor`/`shadowBlur`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

/// Paint plus global alpha and an optional glow.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub paint: Paint,
    /// Multiplies every painted pixel (canvas `globalAlpha`).
    pub alpha: f32,
    pub glow: Option<Glow>,
}

impl Style {
    pub fn new(paint: Paint, alpha: f32) -> Self {
        Self { paint, alpha, glow: None }
    }

    pub fn solid(color: Rgba, alpha: f32) -> Self {
        Self::new(Paint::Solid(color), alpha)
    }

    pub fn glow(mut self, color: Rgba, blur: f32) -> Self {
        self.glow = Some(Glow { color, blur });
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub cap: LineCap,
}

impl Stroke {
    pub const fn new(width: f32) -> Self {
        Self { width, cap: LineCap::Butt }
    }

    pub const fn round(width: f32) -> Self {
        Self { width, cap: LineCap::Round }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    /// Elliptical arc swept clockwise (screen space) from `start` to `end`.
    Ellipse { center: Point, rx: f32, ry: f32, start: f32, end: f32 },
    Close,
}

/// A drawing path, built the way a canvas path is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.ops.push(PathOp::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.ops.push(PathOp::LineTo(p));
        self
    }

    pub fn quad_to(mut self, ctrl: Point, to: Point) -> Self {
        self.ops.push(PathOp::QuadTo { ctrl, to });
        self
    }

    pub fn ellipse(mut self, center: Point, rx: f32, ry: f32, start: f32, end: f32) -> Self {
        self.ops.push(PathOp::Ellipse { center, rx, ry, start, end });
        self
    }

    pub fn close(mut self) -> Self {
        self.ops.push(PathOp::Close);
        self
    }

    pub fn circle(center: Point, r: f32) -> Self {
        Self::new().ellipse(center, r, r, 0.0, TAU)
    }

    pub fn line(a: Point, b: Point) -> Self {
        Self::new().move_to(a).line_to(b)
    }

    /// Open polyline through `points`.
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new();
        for (i, &p) in points.iter().enumerate() {
            path = if i == 0 { path.move_to(p) } else { path.line_to(p) };
        }
        path
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// The raster surface the pipeline draws onto. Every primitive may fail;
/// a failure aborts the frame.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, w: u32, h: u32) -> Result<(), EngineError>;

    /// Reset every pixel to transparent.
    fn clear(&mut self) -> Result<(), EngineError>;

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: &Style) -> Result<(), EngineError>;

    fn fill_path(&mut self, path: &Path, style: &Style) -> Result<(), EngineError>;

    fn stroke_path(&mut self, path: &Path, style: &Style, stroke: Stroke) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_clamp_outside_range() {
        let stops = [Stop::new(0.2, Rgba::WHITE), Stop::new(0.8, Rgba::rgb(0, 0, 0))];
        assert_eq!(Paint::sample_stops(&stops, 0.0), Rgba::WHITE);
        assert_eq!(Paint::sample_stops(&stops, 1.0), Rgba::rgb(0, 0, 0));
        assert_eq!(Paint::sample_stops(&[], 0.5), Rgba::TRANSPARENT);
    }

    #[test]
    fn fading_to_transparent_keeps_hue() {
        let teal = Rgba::rgb(0, 232, 200);
        let stops = [Stop::new(0.0, teal), Stop::new(1.0, Rgba::TRANSPARENT)];
        let mid = Paint::sample_stops(&stops, 0.5);
        assert_eq!((mid.r, mid.g, mid.b), (0, 232, 200));
        assert_eq!(mid.a, 128);
    }

    #[test]
    fn polyline_starts_with_move() {
        let path = Path::polyline(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)]);
        assert_eq!(path.ops().len(), 3);
        assert!(matches!(path.ops()[0], PathOp::MoveTo(_)));
        assert!(Path::polyline(&[]).is_empty());
    }
}
