// sea.rs - Underwater layers: coral, bubbles, fish, jellyfish, particles

use std::f32::consts::{PI, TAU};

use crate::color::Rgba;
use crate::config::Config;
use crate::error::EngineError;
use crate::geometry::{Point, tentacle_points, wrap_angle};
use crate::sim::{CoralKind, World, links};

use super::surface::{Paint, Path, Stop, Stroke, Style, Surface};

const ANEMONE_DOT: f32 = 3.0;

const HALO_SCALE: f32 = 2.2;
const BELL_SQUASH: f32 = 0.65;
const TENTACLES: usize = 7;
/// Tentacles span this fraction of the radius either side of center.
const TENTACLE_SPREAD: f32 = 0.8;
const TENTACLE_LEN: f32 = 1.2;
const TENTACLE_SWAY: f32 = 0.25;
const TENTACLE_SPEED: f64 = 1.2;

pub(super) fn coral<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let t = world.time();
    for c in world.coral() {
        let style = Style::solid(c.color, cfg.coral_opacity).glow(c.color, 8.0);
        match c.kind {
            CoralKind::Branch => {
                let mut path = Path::new();
                for seg in c.segments(t) {
                    path = path.move_to(seg.from).line_to(seg.to);
                }
                if !path.is_empty() {
                    s.stroke_path(&path, &style, Stroke::new(1.5))?;
                }
            }
            CoralKind::Anemone => {
                let center = c.anemone_center();
                let mut path = Path::new();
                for petal in c.petals(t) {
                    path = path.move_to(center).quad_to(petal.control, petal.tip);
                }
                s.stroke_path(&path, &style, Stroke::new(1.5))?;
                s.fill_path(&Path::circle(center, ANEMONE_DOT), &style)?;
            }
        }
    }
    Ok(())
}

pub(super) fn bubbles<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    for b in world.bubbles() {
        let ring = Style::solid(cfg.bubble_color, b.opacity).glow(cfg.bubble_color, 4.0);
        s.stroke_path(&Path::circle(Point::new(b.x, b.y), b.r), &ring, Stroke::new(0.8))?;

        // Specular highlight, upper left
        let spot = Point::new(b.x - b.r * 0.3, b.y - b.r * 0.3);
        let highlight = Style::solid(Rgba::WHITE, b.opacity * 0.5).glow(cfg.bubble_color, 4.0);
        s.fill_path(&Path::circle(spot, b.r * 0.22), &highlight)?;
    }
    Ok(())
}

pub(super) fn fish<S: Surface + ?Sized>(s: &mut S, world: &World) -> Result<(), EngineError> {
    let t = world.time();
    for f in world.fish() {
        let style = Style::solid(f.color, f.opacity).glow(f.color, 6.0);
        let c = Point::new(f.x, f.y + f.wobble(t));
        // The tail trails behind the heading.
        let back = if f.heading_right() { -1.0 } else { 1.0 };
        let size = f.size;

        let body = Path::new().ellipse(c, size, size * 0.45, 0.0, TAU);
        s.fill_path(&body, &style)?;

        let tail = Path::new()
            .move_to(Point::new(c.x + back * size * 0.85, c.y))
            .line_to(Point::new(c.x + back * size * 1.5, c.y - size * 0.5))
            .line_to(Point::new(c.x + back * size * 1.5, c.y + size * 0.5))
            .close();
        s.fill_path(&tail, &style)?;
    }
    Ok(())
}

pub(super) fn jellyfish<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let t = world.time();
    let opacity = cfg.jellyfish_opacity;
    for j in world.jellyfish() {
        let c = Point::new(j.x, j.y + j.bob(t));
        let r = j.r;

        let halo = Paint::radial(c, r * HALO_SCALE, [
            Stop::new(0.0, j.color.with_alpha(0x30)),
            Stop::new(1.0, Rgba::TRANSPARENT),
        ]);
        s.fill_path(&Path::circle(c, r * HALO_SCALE), &Style::new(halo, opacity * 0.6))?;

        // Bell: upper half of a squashed ellipse, lit from above
        let bell = Path::new().ellipse(c, r, r * BELL_SQUASH, PI, TAU);
        let fill = Paint::Radial {
            inner: Point::new(c.x, c.y - r * 0.3),
            inner_r: r * 0.1,
            outer: c,
            outer_r: r,
            stops: vec![
                Stop::new(0.0, j.color.with_alpha(0xcc)),
                Stop::new(0.6, j.color.with_alpha(0x55)),
                Stop::new(1.0, j.color.with_alpha(0x11)),
            ],
        };
        s.fill_path(&bell, &Style::new(fill, opacity))?;
        let rim = Style::solid(j.color.with_alpha(0x88), opacity).glow(j.color, 10.0);
        s.stroke_path(&bell, &rim, Stroke::new(1.0))?;

        let sway = wrap_angle(t * TENTACLE_SPEED);
        let mut tentacles = Path::new();
        for k in 0..TENTACLES {
            let frac = k as f32 / (TENTACLES - 1) as f32;
            let anchor = Point::new(j.x - r * TENTACLE_SPREAD + frac * r * TENTACLE_SPREAD * 2.0, c.y);
            let phase = j.tentacle_phase + k as f32 * 0.5 + sway;
            let points = tentacle_points(anchor, r * TENTACLE_LEN, phase, r * TENTACLE_SWAY);
            for (i, &p) in points.iter().enumerate() {
                tentacles = if i == 0 { tentacles.move_to(p) } else { tentacles.line_to(p) };
            }
        }
        let style = Style::solid(j.color.with_alpha(0xaa), opacity * 0.7).glow(j.color, 6.0);
        s.stroke_path(&tentacles, &style, Stroke::new(0.8))?;
    }
    Ok(())
}

pub(super) fn particles<S: Surface + ?Sized>(s: &mut S, cfg: &Config, world: &World) -> Result<(), EngineError> {
    let pool = world.particles();
    for link in links(pool) {
        let (a, b) = (&pool[link.a], &pool[link.b]);
        let style = Style::solid(cfg.particle_color, cfg.particle_opacity * link.strength * 0.5);
        s.stroke_path(&Path::line(Point::new(a.x, a.y), Point::new(b.x, b.y)), &style, Stroke::new(0.5))?;
    }

    let dot = Style::solid(cfg.particle_color, cfg.particle_opacity * 1.5).glow(cfg.particle_color, 4.0);
    for p in pool {
        s.fill_path(&Path::circle(Point::new(p.x, p.y), p.r), &dot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawOp, PathOp, Recorder};
    use crate::random::ScriptedRandom;

    fn world(cfg: &Config, v: f32) -> World {
        World::new(cfg, 400.0, 300.0, &mut ScriptedRandom::constant(v))
    }

    #[test]
    fn anemone_draws_petals_then_center_dot() {
        // coin() is false at 0.3, so every coral is an anemone
        let cfg = Config { coral_count: 2, ..Config::default() };
        let mut rec = Recorder::new(400, 300);
        coral(&mut rec, &cfg, &world(&cfg, 0.3)).unwrap();
        assert_eq!(rec.ops().len(), 4);
        let DrawOp::StrokePath { path, .. } = &rec.ops()[0] else {
            panic!("expected petals");
        };
        let curves = path.ops().iter().filter(|op| matches!(op, PathOp::QuadTo { .. })).count();
        assert_eq!(curves, 8);
        assert!(matches!(rec.ops()[1], DrawOp::FillPath { .. }));
    }

    #[test]
    fn branch_coral_is_one_stroke_each() {
        let cfg = Config { coral_count: 3, ..Config::default() };
        let mut rec = Recorder::new(400, 300);
        coral(&mut rec, &cfg, &world(&cfg, 0.8)).unwrap();
        assert_eq!(rec.ops().len(), 3);
        assert!(rec.ops().iter().all(|op| matches!(op, DrawOp::StrokePath { .. })));
    }

    #[test]
    fn jellyfish_draws_halo_bell_rim_tentacles() {
        let cfg = Config { jellyfish_count: 1, ..Config::default() };
        let mut rec = Recorder::new(400, 300);
        jellyfish(&mut rec, &cfg, &world(&cfg, 0.5)).unwrap();
        let ops = rec.ops();
        assert_eq!(ops.len(), 4);
        let DrawOp::StrokePath { path, .. } = &ops[3] else {
            panic!("expected tentacles");
        };
        let starts = path.ops().iter().filter(|op| matches!(op, PathOp::MoveTo(_))).count();
        assert_eq!(starts, TENTACLES);
    }

    #[test]
    fn fish_tail_points_away_from_heading() {
        let cfg = Config { fish_count: 1, ..Config::default() };
        // 0.9 -> heading right, so the tail sits left of the body
        let w = world(&cfg, 0.9);
        let f = &w.fish()[0];
        let mut rec = Recorder::new(400, 300);
        fish(&mut rec, &w).unwrap();
        let DrawOp::FillPath { path, .. } = &rec.ops()[1] else {
            panic!("expected the tail");
        };
        let PathOp::MoveTo(root) = path.ops()[0] else {
            panic!("tail starts with a move");
        };
        assert!(root.x < f.x);
    }

    #[test]
    fn particle_links_precede_dots() {
        let cfg = Config { particles_enabled: true, particle_count: 3, ..Config::default() };
        // every particle lands on the same spot, so all three pairs link
        let w = world(&cfg, 0.5);
        let mut rec = Recorder::new(400, 300);
        particles(&mut rec, &cfg, &w).unwrap();
        let ops = rec.ops();
        assert_eq!(ops.len(), 6);
        assert!(ops[..3].iter().all(|op| matches!(op, DrawOp::StrokePath { .. })));
        assert!(ops[3..].iter().all(|op| matches!(op, DrawOp::FillPath { .. })));
    }
}
