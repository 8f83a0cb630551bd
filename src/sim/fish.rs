// fish.rs - Fish crossing the mid-water band
//
// Each fish swims at a constant signed speed. Once it leaves the far edge
// its slot is filled by a brand new fish, which may start from either side.

use crate::color::Rgba;
use crate::config::Config;
use crate::geometry::oscillate;
use crate::random::RandomSource;

/// Spawn distance outside the edge.
const ENTRY_MARGIN: f32 = 60.0;
/// Distance past the far edge at which a fish is replaced.
const EXIT_MARGIN: f32 = 80.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Fish {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Pixels per frame; the sign is the heading.
    pub speed: f32,
    pub color: Rgba,
    pub opacity: f32,
    pub wobble_amp: f32,
    pub wobble_period: f32,
    pub wobble_phase: f32,
}

impl Fish {
    pub fn spawn(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Self {
        let dir = if rng.coin() { 1.0 } else { -1.0 };
        Self {
            x: if dir > 0.0 { -ENTRY_MARGIN } else { w + ENTRY_MARGIN },
            y: h * rng.range(0.38, 0.83),
            size: rng.range(8.0, 22.0),
            speed: rng.range(0.4, 1.0) * dir,
            color: cfg.fish_color,
            opacity: cfg.fish_opacity,
            wobble_amp: rng.range(0.8, 2.0),
            wobble_period: rng.range(1.5, 3.5),
            wobble_phase: rng.angle(),
        }
    }

    #[inline]
    pub fn heading_right(&self) -> bool {
        self.speed > 0.0
    }

    /// Whether the fish has fully left the edge it was swimming towards.
    pub fn departed(&self, w: f32) -> bool {
        (self.speed > 0.0 && self.x > w + EXIT_MARGIN) || (self.speed < 0.0 && self.x < -EXIT_MARGIN)
    }

    #[inline]
    pub fn wobble(&self, t: f64) -> f32 {
        oscillate(t, self.wobble_period, self.wobble_phase) * self.wobble_amp
    }
}

pub fn init(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Vec<Fish> {
    (0..cfg.fish_count).map(|_| Fish::spawn(cfg, w, h, rng)).collect()
}

/// Move every fish; returns how many slots were refilled.
pub fn update(pool: &mut [Fish], cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> usize {
    let mut replaced = 0;
    for f in pool.iter_mut() {
        f.x += f.speed;
        if f.departed(w) {
            *f = Fish::spawn(cfg, w, h, rng);
            replaced += 1;
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn heading_decides_entry_side() {
        let cfg = Config::default();
        let right = Fish::spawn(&cfg, 500.0, 400.0, &mut ScriptedRandom::constant(0.9));
        assert!(right.heading_right());
        assert_eq!(right.x, -ENTRY_MARGIN);

        let left = Fish::spawn(&cfg, 500.0, 400.0, &mut ScriptedRandom::constant(0.1));
        assert!(!left.heading_right());
        assert_eq!(left.x, 500.0 + ENTRY_MARGIN);
    }

    #[test]
    fn fish_is_replaced_after_crossing() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::constant(0.9);
        let mut pool = vec![Fish { x: 580.5, ..Fish::spawn(&cfg, 500.0, 400.0, &mut rng) }];
        assert_eq!(update(&mut pool, &cfg, 500.0, 400.0, &mut rng), 1);
        assert_eq!(pool[0].x, -ENTRY_MARGIN);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn fish_stays_until_fully_gone() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::constant(0.1);
        let mut pool = vec![Fish { x: -70.0, ..Fish::spawn(&cfg, 500.0, 400.0, &mut rng) }];
        assert_eq!(update(&mut pool, &cfg, 500.0, 400.0, &mut rng), 0);
        assert!(pool[0].x < -70.0);
    }
}
