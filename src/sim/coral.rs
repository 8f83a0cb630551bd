// coral.rs - Coral along the bottom edge
//
// Coral never moves or recycles. Only its sway angle animates; the branch
// geometry is regenerated each frame from the stored seed.

use std::f32::consts::FRAC_PI_2;

use tracing::debug;

use crate::color::Rgba;
use crate::config::{Config, cycle_color};
use crate::geometry::{
    BRANCH_DEPTH, Petal, Point, Segment, anemone_petals, branch_segments, oscillate,
};
use crate::random::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoralKind {
    Branch,
    Anemone,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Coral {
    pub x: f32,
    pub base_y: f32,
    pub height: f32,
    pub color: Rgba,
    pub kind: CoralKind,
    pub sway_phase: f32,
    pub sway_period: f32,
    /// Peak sway in radians.
    pub sway_amp: f32,
    pub seed: f32,
}

/// Horizontal slot of coral `i` of `count`: evenly spaced, overhanging
/// each side by 5% of the width.
pub fn slot_x(i: usize, count: usize, w: f32) -> f32 {
    if count <= 1 {
        return w * 0.5;
    }
    (i as f32 / (count - 1) as f32) * w * 1.1 - w * 0.05
}

impl Coral {
    pub fn spawn(cfg: &Config, i: usize, count: usize, w: f32, h: f32, rng: &mut impl RandomSource) -> Self {
        Self {
            x: slot_x(i, count, w),
            base_y: h,
            height: cfg.coral_height_fraction * h * rng.range(0.5, 1.3),
            color: cycle_color(&cfg.coral_colors, i, cfg.accent_color),
            kind: if rng.coin() { CoralKind::Branch } else { CoralKind::Anemone },
            sway_phase: rng.angle(),
            sway_period: rng.range(3.0, 6.0),
            sway_amp: rng.range(0.04, 0.10),
            seed: rng.unit() * 1000.0,
        }
    }

    #[inline]
    pub fn sway(&self, t: f64) -> f32 {
        oscillate(t, self.sway_period, self.sway_phase) * self.sway_amp
    }

    /// Branch segments at time `t`, growing straight up before sway.
    pub fn segments(&self, t: f64) -> Vec<Segment> {
        branch_segments(
            Point::new(self.x, self.base_y),
            self.height,
            -FRAC_PI_2 + self.sway(t),
            BRANCH_DEPTH,
            self.seed,
        )
    }

    pub fn anemone_center(&self) -> Point {
        Point::new(self.x, self.base_y - self.height * 0.3)
    }

    pub fn petals(&self, t: f64) -> [Petal; crate::geometry::ANEMONE_PETALS] {
        anemone_petals(self.anemone_center(), self.height * 0.4, self.sway(t))
    }
}

pub fn init(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Vec<Coral> {
    let n = cfg.coral_count;
    if n == 1 {
        debug!("single coral placed at horizontal center");
    }
    (0..n).map(|i| Coral::spawn(cfg, i, n, w, h, rng)).collect()
}
