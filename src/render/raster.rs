// raster.rs - Software RGBA surface
//
// Output layout: tightly packed RGBA8, row-major, straight (not
// premultiplied) alpha, the format `ImageData` and PNG encoders take.
//
// Every primitive is first rasterized into a coverage mask over its
// bounding box, then composited once with source-over. Paths are flattened
// to polylines; fills use four sub-scanlines per row with exact horizontal
// coverage, strokes use distance to segment. Glow is not rendered.

use std::f32::consts::TAU;

use crate::color::Rgba;
use crate::error::EngineError;
use crate::geometry::Point;

use super::surface::{LineCap, Paint, Path, PathOp, Stroke, Style, Surface};

const SUB_ROWS: usize = 4;
const QUAD_STEPS: usize = 12;

pub struct Raster {
    out: Vec<u8>,
    w: u32,
    h: u32,
}

impl Raster {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            out: vec![0; w as usize * h as usize * 4],
            w,
            h,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.out
    }

    pub fn output_ptr(&self) -> *const u8 {
        self.out.as_ptr()
    }

    pub fn output_len(&self) -> usize {
        self.out.len()
    }

    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }

    /// Pixel at (x, y), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let i = (y as usize * self.w as usize + x as usize) * 4;
        Some(Rgba::new(self.out[i], self.out[i + 1], self.out[i + 2], self.out[i + 3]))
    }

    fn composite(&mut self, mask: &Mask, style: &Style) {
        if style.alpha <= 0.0 {
            return;
        }
        for my in 0..mask.h {
            let y = mask.y0 + my;
            for mx in 0..mask.w {
                let cov = mask.cov[my * mask.w + mx];
                if cov <= 0.0 {
                    continue;
                }
                let x = mask.x0 + mx;
                let src = sample(&style.paint, x as f32 + 0.5, y as f32 + 0.5);
                let sa = src.alpha() * style.alpha.min(1.0) * cov.min(1.0);
                if sa <= 0.0 {
                    continue;
                }
                let i = (y * self.w as usize + x) * 4;
                blend(&mut self.out[i..i + 4], src, sa);
            }
        }
    }
}

/// Source-over of `src` at coverage-weighted alpha `sa` onto straight RGBA.
fn blend(dst: &mut [u8], src: Rgba, sa: f32) {
    let da = dst[3] as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 {
        return;
    }
    let mix = |s: u8, d: u8| {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / oa;
        v.round().clamp(0.0, 255.0) as u8
    };
    dst[0] = mix(src.r, dst[0]);
    dst[1] = mix(src.g, dst[1]);
    dst[2] = mix(src.b, dst[2]);
    dst[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
}

fn sample(paint: &Paint, x: f32, y: f32) -> Rgba {
    match paint {
        Paint::Solid(c) => *c,
        Paint::Linear { from, to, stops } => {
            let (dx, dy) = (to.x - from.x, to.y - from.y);
            let len2 = dx * dx + dy * dy;
            if !(len2 > 0.0) {
                return Rgba::TRANSPARENT;
            }
            let s = ((x - from.x) * dx + (y - from.y) * dy) / len2;
            Paint::sample_stops(stops, s.clamp(0.0, 1.0))
        }
        Paint::Radial { inner, inner_r, outer, outer_r, stops } => {
            match conical_param(Point::new(x, y), *inner, *inner_r, *outer, *outer_r) {
                Some(s) => Paint::sample_stops(stops, s.clamp(0.0, 1.0)),
                None => Rgba::TRANSPARENT,
            }
        }
    }
}

/// Largest `s` with `|p - c(s)| = r(s)` and `r(s) >= 0`, where the circle
/// interpolates from (c0, r0) to (c1, r1).
fn conical_param(p: Point, c0: Point, r0: f32, c1: Point, r1: f32) -> Option<f32> {
    let (dcx, dcy, dr) = (c1.x - c0.x, c1.y - c0.y, r1 - r0);
    let (qx, qy) = (p.x - c0.x, p.y - c0.y);
    let a = dcx * dcx + dcy * dcy - dr * dr;
    let b = -2.0 * (qx * dcx + qy * dcy + r0 * dr);
    let c = qx * qx + qy * qy - r0 * r0;

    let valid = |s: f32| s.is_finite() && r0 + s * dr >= 0.0;
    if a.abs() < 1e-6 {
        let s = -c / b;
        return valid(s).then_some(s);
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let (s1, s2) = ((-b + root) / (2.0 * a), (-b - root) / (2.0 * a));
    let (hi, lo) = if s1 > s2 { (s1, s2) } else { (s2, s1) };
    if valid(hi) {
        Some(hi)
    } else if valid(lo) {
        Some(lo)
    } else {
        None
    }
}

struct Polyline {
    points: Vec<Point>,
    closed: bool,
}

/// Flatten a path into polylines the way canvas builds subpaths: an arc
/// continues the current subpath with a connecting line, or opens one.
fn flatten(path: &Path) -> Vec<Polyline> {
    let mut out: Vec<Polyline> = Vec::new();
    let mut cur: Vec<Point> = Vec::new();

    let flush = |cur: &mut Vec<Point>, out: &mut Vec<Polyline>, closed: bool| {
        if !cur.is_empty() {
            out.push(Polyline { points: std::mem::take(cur), closed });
        }
    };

    for op in path.ops() {
        match *op {
            PathOp::MoveTo(p) => {
                flush(&mut cur, &mut out, false);
                cur.push(p);
            }
            PathOp::LineTo(p) => cur.push(p),
            PathOp::QuadTo { ctrl, to } => {
                let from = cur.last().copied().unwrap_or(ctrl);
                if cur.is_empty() {
                    cur.push(from);
                }
                for k in 1..=QUAD_STEPS {
                    let t = k as f32 / QUAD_STEPS as f32;
                    let u = 1.0 - t;
                    cur.push(Point::new(
                        u * u * from.x + 2.0 * u * t * ctrl.x + t * t * to.x,
                        u * u * from.y + 2.0 * u * t * ctrl.y + t * t * to.y,
                    ));
                }
            }
            PathOp::Ellipse { center, rx, ry, start, end } => {
                let mut sweep = end - start;
                while sweep < 0.0 {
                    sweep += TAU;
                }
                let sweep = sweep.min(TAU);
                let steps = ((sweep * rx.max(ry) / 2.0).ceil() as usize).clamp(8, 256);
                for k in 0..=steps {
                    let a = start + sweep * k as f32 / steps as f32;
                    cur.push(Point::new(center.x + a.cos() * rx, center.y + a.sin() * ry));
                }
            }
            PathOp::Close => {
                if let Some(&first) = cur.first() {
                    flush(&mut cur, &mut out, true);
                    cur.push(first);
                }
            }
        }
    }
    flush(&mut cur, &mut out, false);
    // A lone point left behind by `Close` draws nothing.
    out.retain(|p| p.points.len() > 1);
    out
}

/// Coverage over a pixel-aligned box.
struct Mask {
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
    cov: Vec<f32>,
}

impl Mask {
    /// Box covering `[min, max]` grown by `pad`, clipped to the surface.
    fn bounding(points: impl Iterator<Item = Point>, pad: f32, sw: u32, sh: u32) -> Option<Self> {
        let (mut x0, mut y0, mut x1, mut y1) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for p in points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                continue;
            }
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        if x0 > x1 {
            return None;
        }
        let lo_x = (x0 - pad).floor().max(0.0) as usize;
        let lo_y = (y0 - pad).floor().max(0.0) as usize;
        let hi_x = ((x1 + pad).ceil().max(0.0) as usize).min(sw as usize);
        let hi_y = ((y1 + pad).ceil().max(0.0) as usize).min(sh as usize);
        if lo_x >= hi_x || lo_y >= hi_y {
            return None;
        }
        let (w, h) = (hi_x - lo_x, hi_y - lo_y);
        Some(Self { x0: lo_x, y0: lo_y, w, h, cov: vec![0.0; w * h] })
    }

    fn fill(&mut self, polys: &[Polyline]) {
        let mut edges: Vec<(Point, Point)> = Vec::new();
        for poly in polys {
            let pts = &poly.points;
            for i in 0..pts.len() {
                let a = pts[i];
                let b = pts[(i + 1) % pts.len()];
                if a.y != b.y && a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite() {
                    edges.push((a, b));
                }
            }
        }

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        let weight = 1.0 / SUB_ROWS as f32;
        for my in 0..self.h {
            for sub in 0..SUB_ROWS {
                let sy = (self.y0 + my) as f32 + (sub as f32 + 0.5) / SUB_ROWS as f32;
                crossings.clear();
                for &(a, b) in &edges {
                    let (lo, hi, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                    if sy >= lo.y && sy < hi.y {
                        let x = lo.x + (sy - lo.y) / (hi.y - lo.y) * (hi.x - lo.x);
                        crossings.push((x, dir));
                    }
                }
                crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

                let mut winding = 0;
                let mut span_start = 0.0;
                for &(x, dir) in &crossings {
                    let was = winding;
                    winding += dir;
                    if was == 0 && winding != 0 {
                        span_start = x;
                    } else if was != 0 && winding == 0 {
                        self.add_span(my, span_start, x, weight);
                    }
                }
            }
        }
    }

    fn add_span(&mut self, my: usize, xa: f32, xb: f32, weight: f32) {
        let xa = xa - self.x0 as f32;
        let xb = xb - self.x0 as f32;
        let first = xa.floor().max(0.0) as usize;
        let last = (xb.ceil().max(0.0) as usize).min(self.w);
        let row = &mut self.cov[my * self.w..(my + 1) * self.w];
        for (px, cell) in row.iter_mut().enumerate().take(last).skip(first) {
            let overlap = (px as f32 + 1.0).min(xb) - (px as f32).max(xa);
            if overlap > 0.0 {
                *cell += overlap * weight;
            }
        }
    }

    fn stroke(&mut self, polys: &[Polyline], stroke: Stroke) {
        let hw = stroke.width * 0.5;
        for poly in polys {
            let mut pts = poly.points.clone();
            if poly.closed {
                pts.push(pts[0]);
            }
            let n = pts.len().saturating_sub(1);
            for i in 0..n {
                let butt_start = i == 0 && !poly.closed && stroke.cap == LineCap::Butt;
                let butt_end = i + 1 == n && !poly.closed && stroke.cap == LineCap::Butt;
                self.stroke_segment(pts[i], pts[i + 1], hw, butt_start, butt_end);
            }
        }
    }

    fn stroke_segment(&mut self, a: Point, b: Point, hw: f32, butt_start: bool, butt_end: bool) {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len2 = dx * dx + dy * dy;
        let reach = hw + 1.0;
        let lo_x = (a.x.min(b.x) - reach).floor().max(self.x0 as f32) as usize;
        let hi_x = ((a.x.max(b.x) + reach).ceil().max(0.0) as usize).min(self.x0 + self.w);
        let lo_y = (a.y.min(b.y) - reach).floor().max(self.y0 as f32) as usize;
        let hi_y = ((a.y.max(b.y) + reach).ceil().max(0.0) as usize).min(self.y0 + self.h);

        for y in lo_y..hi_y {
            for x in lo_x..hi_x {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let raw = if len2 > 0.0 { ((px - a.x) * dx + (py - a.y) * dy) / len2 } else { 0.0 };
                if (butt_start && raw < 0.0) || (butt_end && raw > 1.0) {
                    continue;
                }
                let t = raw.clamp(0.0, 1.0);
                let d = (px - (a.x + t * dx)).hypot(py - (a.y + t * dy));
                let cov = (hw + 0.5 - d).clamp(0.0, 1.0);
                let cell = &mut self.cov[(y - self.y0) * self.w + (x - self.x0)];
                if cov > *cell {
                    *cell = cov;
                }
            }
        }
    }
}

impl Surface for Raster {
    fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    fn resize(&mut self, w: u32, h: u32) -> Result<(), EngineError> {
        self.w = w;
        self.h = h;
        self.out.clear();
        self.out.resize(w as usize * h as usize * 4, 0);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), EngineError> {
        self.out.fill(0);
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: &Style) -> Result<(), EngineError> {
        let rect = Path::new()
            .move_to(Point::new(x, y))
            .line_to(Point::new(x + w, y))
            .line_to(Point::new(x + w, y + h))
            .line_to(Point::new(x, y + h))
            .close();
        self.fill_path(&rect, style)
    }

    fn fill_path(&mut self, path: &Path, style: &Style) -> Result<(), EngineError> {
        let polys = flatten(path);
        let points = polys.iter().flat_map(|p| p.points.iter().copied());
        if let Some(mut mask) = Mask::bounding(points, 1.0, self.w, self.h) {
            mask.fill(&polys);
            self.composite(&mask, style);
        }
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path, style: &Style, stroke: Stroke) -> Result<(), EngineError> {
        if !(stroke.width > 0.0) {
            return Ok(());
        }
        let polys = flatten(path);
        let points = polys.iter().flat_map(|p| p.points.iter().copied());
        if let Some(mut mask) = Mask::bounding(points, stroke.width * 0.5 + 1.0, self.w, self.h) {
            mask.stroke(&polys, stroke);
            self.composite(&mask, style);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::Stop;

    #[test]
    fn buffer_is_tightly_packed_rgba() {
        let r = Raster::new(16, 9);
        assert_eq!(r.output_len(), 16 * 9 * 4);
        assert_eq!(r.pixels().len(), r.output_len());
    }

    #[test]
    fn opaque_rect_covers_exactly() {
        let mut r = Raster::new(10, 10);
        r.fill_rect(2.0, 2.0, 4.0, 4.0, &Style::solid(Rgba::WHITE, 1.0)).unwrap();
        assert_eq!(r.pixel(3, 3), Some(Rgba::WHITE));
        assert_eq!(r.pixel(1, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(r.pixel(6, 6), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn global_alpha_scales_coverage() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(0.0, 0.0, 4.0, 4.0, &Style::solid(Rgba::rgb(255, 0, 0), 0.5)).unwrap();
        let p = r.pixel(1, 1).unwrap();
        assert_eq!((p.r, p.g, p.b), (255, 0, 0));
        assert_eq!(p.a, 128);
    }

    #[test]
    fn vertical_gradient_runs_top_to_bottom() {
        let mut r = Raster::new(2, 100);
        let paint = Paint::linear(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            [Stop::new(0.0, Rgba::rgb(0, 0, 0)), Stop::new(1.0, Rgba::rgb(200, 200, 200))],
        );
        r.fill_rect(0.0, 0.0, 2.0, 100.0, &Style::new(paint, 1.0)).unwrap();
        let top = r.pixel(0, 0).unwrap();
        let bottom = r.pixel(0, 99).unwrap();
        assert!(top.r < 5 && bottom.r > 195);
    }

    #[test]
    fn circle_fill_is_round() {
        let mut r = Raster::new(40, 40);
        r.fill_path(&Path::circle(Point::new(20.0, 20.0), 10.0), &Style::solid(Rgba::WHITE, 1.0)).unwrap();
        assert_eq!(r.pixel(20, 20).unwrap().a, 255);
        assert_eq!(r.pixel(20, 12).unwrap().a, 255);
        assert_eq!(r.pixel(3, 3).unwrap().a, 0);
        // corner of the bounding square lies outside the circle
        assert_eq!(r.pixel(11, 11).unwrap().a, 0);
    }

    #[test]
    fn horizontal_stroke_touches_its_row_only() {
        let mut r = Raster::new(20, 20);
        let line = Path::line(Point::new(2.0, 10.5), Point::new(18.0, 10.5));
        r.stroke_path(&line, &Style::solid(Rgba::WHITE, 1.0), Stroke::new(1.0)).unwrap();
        assert_eq!(r.pixel(10, 10).unwrap().a, 255);
        assert_eq!(r.pixel(10, 5).unwrap().a, 0);
        assert_eq!(r.pixel(0, 10).unwrap().a, 0);
    }

    #[test]
    fn drawing_off_surface_is_ignored() {
        let mut r = Raster::new(8, 8);
        r.fill_path(&Path::circle(Point::new(-50.0, -50.0), 5.0), &Style::solid(Rgba::WHITE, 1.0)).unwrap();
        r.stroke_path(&Path::line(Point::new(100.0, 0.0), Point::new(200.0, 0.0)), &Style::solid(Rgba::WHITE, 1.0), Stroke::new(2.0)).unwrap();
        assert!(r.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn concentric_radial_fades_outward() {
        let c = Point::new(10.0, 10.0);
        let paint = Paint::radial(c, 10.0, [Stop::new(0.0, Rgba::WHITE), Stop::new(1.0, Rgba::TRANSPARENT)]);
        let center = sample(&paint, 10.0, 10.0);
        let edge = sample(&paint, 19.0, 10.0);
        assert!(center.a > 250);
        assert!(edge.a < 40);
    }

    #[test]
    fn resize_reallocates_cleared() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(0.0, 0.0, 4.0, 4.0, &Style::solid(Rgba::WHITE, 1.0)).unwrap();
        r.resize(6, 2).unwrap();
        assert_eq!(r.size(), (6, 2));
        assert_eq!(r.output_len(), 48);
        assert!(r.pixels().iter().all(|&b| b == 0));
    }
}
