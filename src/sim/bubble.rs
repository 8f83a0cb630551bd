// bubble.rs - Rising bubbles
//
// Bubbles rise a fixed amount per frame and wobble sideways. One that
// clears the top edge is recycled in place at the bottom edge.

use crate::config::Config;
use crate::geometry::oscillate;
use crate::random::RandomSource;

/// Bubbles live in the lower part of the surface, below this fraction.
const WATER_TOP: f32 = 0.4;

/// Where a freshly made bubble appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    /// Anywhere in the lower 60% (pool initialization).
    Scattered,
    /// On the bottom edge (recycling).
    Surfacing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub opacity: f32,
    /// Pixels per frame.
    pub rise_speed: f32,
    pub wobble_amp: f32,
    pub wobble_period: f32,
    pub wobble_phase: f32,
}

impl Bubble {
    pub fn spawn(cfg: &Config, w: f32, h: f32, entry: Entry, rng: &mut impl RandomSource) -> Self {
        let x = rng.unit() * w;
        let y = match entry {
            Entry::Scattered => h * rng.range(WATER_TOP, 1.0),
            Entry::Surfacing => h,
        };
        Self {
            x,
            y,
            r: rng.range(cfg.bubble_size_min, cfg.bubble_size_max),
            opacity: rng.range(cfg.bubble_opacity_min, cfg.bubble_opacity_max),
            rise_speed: rng.range(0.25, 0.8),
            wobble_amp: rng.range(0.4, 1.2),
            wobble_period: rng.range(2.0, 5.0),
            wobble_phase: rng.angle(),
        }
    }

    #[inline]
    pub fn above_top(&self) -> bool {
        self.y + self.r < 0.0
    }
}

pub fn init(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Vec<Bubble> {
    (0..cfg.bubble_count)
        .map(|_| Bubble::spawn(cfg, w, h, Entry::Scattered, rng))
        .collect()
}

/// Rise and wobble every bubble; returns how many were recycled.
pub fn update(
    bubbles: &mut [Bubble],
    cfg: &Config,
    w: f32,
    h: f32,
    t: f64,
    dt: f32,
    rng: &mut impl RandomSource,
) -> usize {
    let mut recycled = 0;
    for b in bubbles.iter_mut() {
        b.y -= b.rise_speed;
        b.x += oscillate(t, b.wobble_period, b.wobble_phase) * b.wobble_amp * dt;
        if b.above_top() {
            *b = Bubble::spawn(cfg, w, h, Entry::Surfacing, rng);
            recycled += 1;
        }
    }
    recycled
}
