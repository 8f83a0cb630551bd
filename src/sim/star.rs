// star.rs - Fixed twinkling stars
//
// Position never changes for the lifetime of the pool; only the opacity
// animates, as a pure function of the clock.

use crate::config::Config;
use crate::geometry::{star_opacity, twinkle};
use crate::random::RandomSource;

/// Stars only populate the upper part of the surface.
const SKY_FRACTION: f32 = 0.55;

/// Bright stars past this twinkle level also draw a cross sparkle.
pub const SPARKLE_MIN_BASE: f32 = 0.45;
pub const SPARKLE_MIN_TWINKLE: f32 = 0.7;

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub base_opacity: f32,
    /// Seconds per twinkle cycle.
    pub twinkle_period: f32,
    pub twinkle_phase: f32,
}

impl Star {
    pub fn spawn(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Self {
        Self {
            x: rng.unit() * w,
            y: rng.unit() * h * SKY_FRACTION,
            r: rng.range(0.4, 1.8),
            base_opacity: rng.range(cfg.star_opacity_min, cfg.star_opacity_max),
            twinkle_period: rng.range(3.0, 9.0),
            twinkle_phase: rng.angle(),
        }
    }

    #[inline]
    pub fn twinkle(&self, t: f64) -> f32 {
        twinkle(t, self.twinkle_period, self.twinkle_phase)
    }

    #[inline]
    pub fn opacity(&self, t: f64) -> f32 {
        star_opacity(self.base_opacity, self.twinkle(t))
    }

    pub fn sparkles(&self, t: f64) -> bool {
        self.base_opacity > SPARKLE_MIN_BASE && self.twinkle(t) > SPARKLE_MIN_TWINKLE
    }
}

pub fn init(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Vec<Star> {
    (0..cfg.star_count).map(|_| Star::spawn(cfg, w, h, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn spawn_uses_one_draw_per_attribute() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let s = Star::spawn(&cfg, 1000.0, 800.0, &mut rng);
        assert_eq!(rng.drawn(), 6);
        assert_eq!(s.x, 500.0);
        assert_eq!(s.y, 800.0 * 0.5 * SKY_FRACTION);
        assert!((s.base_opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn opacity_stays_between_forty_percent_and_base() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::new(vec![0.1, 0.9, 0.3, 0.7, 0.5, 0.2]);
        let stars = init(&cfg, 640.0, 480.0, &mut rng);
        assert_eq!(stars.len(), cfg.star_count);
        for s in &stars {
            for i in 0..200 {
                let o = s.opacity(i as f64 * 0.113);
                assert!(o >= 0.4 * s.base_opacity - 1e-6 && o <= s.base_opacity + 1e-6);
            }
        }
    }

    #[test]
    fn dim_stars_never_sparkle() {
        let star = Star {
            x: 0.0,
            y: 0.0,
            r: 1.0,
            base_opacity: 0.3,
            twinkle_period: 4.0,
            twinkle_phase: 0.0,
        };
        assert!((0..100).all(|i| !star.sparkles(i as f64 * 0.1)));
    }
}
