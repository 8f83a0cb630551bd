// jellyfish.rs - Drifting jellyfish
//
// Horizontal drift wraps around the surface with a margin of two radii.
// The vertical bob is computed at draw time from the clock, never stored,
// so it cannot accumulate drift.

use crate::color::Rgba;
use crate::config::{Config, cycle_color};
use crate::geometry::jelly_bob;
use crate::random::RandomSource;

#[derive(Clone, Debug, PartialEq)]
pub struct Jellyfish {
    pub x: f32,
    /// Resting height; the drawn height adds `bob(t)`.
    pub y: f32,
    pub r: f32,
    pub color: Rgba,
    pub bob_phase: f32,
    pub bob_period: f32,
    /// Pixels per frame, either sign.
    pub drift_speed: f32,
    pub tentacle_phase: f32,
}

impl Jellyfish {
    /// Jellyfish `i` of `count`, spread evenly across the middle 70%.
    pub fn spawn(cfg: &Config, i: usize, count: usize, w: f32, h: f32, rng: &mut impl RandomSource) -> Self {
        let lane = 0.15 + (i as f32 / count.max(1) as f32) * 0.7;
        Self {
            x: lane * w + rng.signed(80.0),
            y: rng.range(0.45, 0.8) * h,
            r: rng.range(cfg.jellyfish_size_min, cfg.jellyfish_size_max),
            color: cycle_color(&cfg.jellyfish_colors, i, cfg.accent_color),
            bob_phase: rng.angle(),
            bob_period: rng.range(4.0, 7.0),
            drift_speed: rng.signed(0.12),
            tentacle_phase: rng.angle(),
        }
    }

    #[inline]
    pub fn bob(&self, t: f64) -> f32 {
        jelly_bob(t, self.bob_period, self.bob_phase)
    }

    /// Leftmost and rightmost x before wrapping.
    #[inline]
    pub fn bounds(&self, w: f32) -> (f32, f32) {
        (-self.r * 2.0, w + self.r * 2.0)
    }

    pub fn drift(&mut self, w: f32) {
        self.x += self.drift_speed;
        let (lo, hi) = self.bounds(w);
        if self.x > hi {
            self.x = lo;
        }
        if self.x < lo {
            self.x = hi;
        }
    }
}

pub fn init(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Vec<Jellyfish> {
    let n = cfg.jellyfish_count;
    (0..n).map(|i| Jellyfish::spawn(cfg, i, n, w, h, rng)).collect()
}

pub fn update(pool: &mut [Jellyfish], w: f32) {
    for j in pool {
        j.drift(w);
    }
}
