// scene.rs - Sky layers: base gradient, grid, nebula, stars, shooting
// stars and the waterline

use tracing::debug;

use crate::color::Rgba;
use crate::config::Config;
use crate::error::EngineError;
use crate::geometry::{Point, nebula_drift, waterline_points};
use crate::sim::World;

use super::surface::{Paint, Path, Stop, Stroke, Style, Surface};

/// Offsets of the three background stops.
const BASE_STOPS: [f32; 3] = [0.0, 0.45, 1.0];
const GRID_LINE: f32 = 0.5;
const SPARKLE_ARM: f32 = 3.0;
const HEAD_GLOW_R: f32 = 6.0;
/// Depth of the shimmer under the waterline, as a fraction of height.
const SHIMMER_DEPTH: f32 = 0.12;

pub(super) fn base<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let (w, h) = (world.width(), world.height());
    let stops: Vec<Stop> = BASE_STOPS
        .iter()
        .enumerate()
        .map(|(i, &offset)| Stop::new(offset, cfg.base_stop(i)))
        .collect();
    let paint = Paint::linear(Point::new(0.0, 0.0), Point::new(0.0, h), stops);
    s.fill_rect(0.0, 0.0, w, h, &Style::new(paint, 1.0))
}

pub(super) fn grid<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let (w, h) = (world.width(), world.height());
    let g = cfg.grid_size;
    if !(g > 0.0) {
        debug!(grid_size = g, "grid skipped: non-positive cell size");
        return Ok(());
    }

    let mut path = Path::new();
    let mut x = 0.0;
    while x < w {
        path = path.move_to(Point::new(x, 0.0)).line_to(Point::new(x, h));
        x += g;
    }
    let mut y = 0.0;
    while y < h {
        path = path.move_to(Point::new(0.0, y)).line_to(Point::new(w, y));
        y += g;
    }
    if path.is_empty() {
        return Ok(());
    }
    s.stroke_path(&path, &Style::solid(cfg.grid_color, cfg.grid_opacity), Stroke::new(GRID_LINE))
}

pub(super) fn nebula<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let (w, h, t) = (world.width(), world.height(), world.time());
    for (i, cloud) in cfg.nebula_clouds.iter().enumerate() {
        let drift = nebula_drift(t, i);
        let c = Point::new(cloud.x * w + drift.x, cloud.y * h + drift.y);
        let paint = Paint::radial(
            c,
            cloud.r,
            [
                Stop::new(0.0, cloud.color.with_alpha(0xcc)),
                Stop::new(0.5, cloud.color.with_alpha(0x44)),
                Stop::new(1.0, Rgba::TRANSPARENT),
            ],
        );
        s.fill_path(&Path::circle(c, cloud.r), &Style::new(paint, cloud.opacity))?;
    }
    Ok(())
}

pub(super) fn stars<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let t = world.time();
    for star in world.stars() {
        let opacity = star.opacity(t);
        let c = Point::new(star.x, star.y);
        s.fill_path(&Path::circle(c, star.r), &Style::solid(cfg.star_color, opacity))?;

        if star.sparkles(t) {
            let arm = star.r * SPARKLE_ARM;
            let cross = Path::new()
                .move_to(Point::new(c.x - arm, c.y))
                .line_to(Point::new(c.x + arm, c.y))
                .move_to(Point::new(c.x, c.y - arm))
                .line_to(Point::new(c.x, c.y + arm));
            s.stroke_path(&cross, &Style::solid(cfg.star_color, opacity * 0.4), Stroke::new(0.5))?;
        }
    }
    Ok(())
}

pub(super) fn shooting_stars<S: Surface + ?Sized>(s: &mut S, world: &World) -> Result<(), EngineError> {
    for star in world.shooting_stars() {
        let fade = star.fade();
        let (head, tail) = (star.head(), star.tail());

        let trail = Paint::linear(
            head,
            tail,
            [
                Stop::new(0.0, star.color),
                Stop::new(0.3, star.color2.with_alpha(0xaa)),
                Stop::new(1.0, Rgba::TRANSPARENT),
            ],
        );
        s.stroke_path(&Path::line(head, tail), &Style::new(trail, star.opacity * fade), Stroke::round(1.5))?;

        let glow = Paint::radial(head, HEAD_GLOW_R, [Stop::new(0.0, star.color), Stop::new(1.0, Rgba::TRANSPARENT)]);
        s.fill_path(&Path::circle(head, HEAD_GLOW_R), &Style::new(glow, star.opacity * fade * 0.8))?;
    }
    Ok(())
}

pub(super) fn waterline<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let (w, h, t) = (world.width(), world.height(), world.time());
    let base_y = cfg.waterline_y * h;
    let points = waterline_points(w, base_y, cfg.waterline_wave_amp, cfg.waterline_wave_freq, t);

    // Refraction shimmer below the line
    let mut shimmer = Path::new().move_to(Point::new(0.0, base_y));
    for &p in &points {
        shimmer = shimmer.line_to(p);
    }
    let shimmer = shimmer.line_to(Point::new(w, h)).line_to(Point::new(0.0, h)).close();
    let paint = Paint::linear(
        Point::new(0.0, base_y),
        Point::new(0.0, base_y + h * SHIMMER_DEPTH),
        [Stop::new(0.0, cfg.waterline_color.with_alpha(0x18)), Stop::new(1.0, Rgba::TRANSPARENT)],
    );
    s.fill_path(&shimmer, &Style::new(paint, 1.0))?;

    if points.is_empty() {
        return Ok(());
    }
    let style = Style::solid(cfg.waterline_color, cfg.waterline_opacity).glow(cfg.waterline_color, 8.0);
    s.stroke_path(&Path::polyline(&points), &style, Stroke::new(1.2))
}
