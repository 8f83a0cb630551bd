// shooting_star.rs - Timer-gated shooting stars
//
// The only variable-size population. A countdown (milliseconds) gates
// spawns; each star streaks along a near-horizontal line and is dropped
// once its life reaches max_life.

use std::f32::consts::FRAC_PI_6;

use crate::color::Rgba;
use crate::config::Config;
use crate::geometry::{Point, trail_fade};
use crate::random::RandomSource;

/// Time a star lingers after covering its own trail length.
const LINGER: f32 = 0.3;
const LAUNCH_JITTER: f32 = 0.4;

#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
    pub x: f32,
    pub y: f32,
    /// Pixels per second.
    pub vx: f32,
    pub vy: f32,
    /// Trail length in pixels.
    pub length: f32,
    pub opacity: f32,
    pub color: Rgba,
    pub color2: Rgba,
    /// Seconds alive.
    pub life: f32,
    pub max_life: f32,
}

impl ShootingStar {
    pub fn spawn(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Self {
        let angle = -FRAC_PI_6 + rng.signed(LAUNCH_JITTER);
        let speed = rng.range(380.0, 660.0);
        let length = rng.range(90.0, 210.0);
        Self {
            x: rng.unit() * w * 0.8,
            y: rng.unit() * h * 0.35,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            length,
            opacity: rng.range(0.7, 1.0),
            color: cfg.shooting_star_color,
            color2: cfg.shooting_star_trail_color(),
            life: 0.0,
            max_life: length / speed + LINGER,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.life += dt;
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.life >= self.max_life
    }

    /// Opacity multiplier from the triangular life envelope.
    pub fn fade(&self) -> f32 {
        if self.max_life > 0.0 {
            trail_fade(self.life / self.max_life)
        } else {
            0.0
        }
    }

    pub fn head(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// End of the trail, `length` pixels behind the head. A star with no
    /// velocity has no direction, so its trail collapses onto the head.
    pub fn tail(&self) -> Point {
        let speed = self.vx.hypot(self.vy);
        if !(speed > f32::EPSILON) {
            return self.head();
        }
        Point::new(
            self.x - self.vx / speed * self.length,
            self.y - self.vy / speed * self.length,
        )
    }
}

/// What one update of the population did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Turnover {
    pub spawned: usize,
    pub expired: usize,
}

/// Run the spawn timer, move every star, and drop the expired ones.
///
/// `timer` counts down in milliseconds and keeps counting below zero
/// while the population is full, so a freed slot is refilled at once.
pub fn update(
    stars: &mut Vec<ShootingStar>,
    timer: &mut f32,
    cfg: &Config,
    w: f32,
    h: f32,
    dt: f32,
    rng: &mut impl RandomSource,
) -> Turnover {
    let mut turnover = Turnover::default();

    *timer -= dt * 1000.0;
    if *timer <= 0.0 && stars.len() < cfg.shooting_star_count {
        stars.push(ShootingStar::spawn(cfg, w, h, rng));
        *timer = cfg.shooting_star_frequency * rng.range(0.7, 1.3);
        turnover.spawned = 1;
    }

    let before = stars.len();
    stars.retain_mut(|s| {
        s.advance(dt);
        !s.expired()
    });
    turnover.expired = before - stars.len();
    turnover
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::random::{ScriptedRandom, seeded};

    fn still_star() -> ShootingStar {
        ShootingStar {
            x: 10.0,
            y: 10.0,
            vx: 0.0,
            vy: 0.0,
            length: 100.0,
            opacity: 1.0,
            color: Rgba::WHITE,
            color2: Rgba::WHITE,
            life: 0.0,
            max_life: 1.0,
        }
    }

    #[test]
    fn zero_velocity_tail_is_head() {
        let s = still_star();
        assert_eq!(s.tail(), s.head());
    }

    #[test]
    fn tail_trails_behind_motion() {
        let s = ShootingStar { vx: 300.0, vy: -400.0, ..still_star() };
        let tail = s.tail();
        assert!((tail.x - (10.0 - 60.0)).abs() < 1e-3);
        assert!((tail.y - (10.0 + 80.0)).abs() < 1e-3);
    }

    #[test]
    fn max_life_covers_trail_plus_linger() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let s = ShootingStar::spawn(&cfg, 1000.0, 1000.0, &mut rng);
        assert!((s.max_life - (150.0 / 520.0 + LINGER)).abs() < 1e-5);
        assert_eq!(s.color2, cfg.shooting_star_color);
        // launch angle is exactly -30° for a centered jitter sample
        assert!((s.vy / s.vx - (-FRAC_PI_6).tan()).abs() < 1e-4);
    }

    #[test]
    fn first_update_spawns_immediately_then_waits() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let mut stars = Vec::new();
        let mut timer = 0.0;

        let t = update(&mut stars, &mut timer, &cfg, 800.0, 600.0, 0.016, &mut rng);
        assert_eq!(t, Turnover { spawned: 1, expired: 0 });
        assert!((timer - cfg.shooting_star_frequency).abs() < 1e-2);

        let t = update(&mut stars, &mut timer, &cfg, 800.0, 600.0, 0.016, &mut rng);
        assert_eq!(t.spawned, 0);
        assert_eq!(stars.len(), 1);
    }

    #[test]
    fn star_removed_once_life_reaches_max() {
        let cfg = Config { shooting_star_count: 0, ..Config::default() };
        let mut stars = vec![ShootingStar { max_life: 0.1, ..still_star() }];
        let mut timer = 0.0;
        let mut rng = ScriptedRandom::constant(0.5);

        update(&mut stars, &mut timer, &cfg, 800.0, 600.0, 0.05, &mut rng);
        assert_eq!(stars.len(), 1);
        let t = update(&mut stars, &mut timer, &cfg, 800.0, 600.0, 0.05, &mut rng);
        assert_eq!(t.expired, 1);
        assert!(stars.is_empty());
    }

    proptest! {
        #[test]
        fn population_never_exceeds_max(
            max in 0usize..6,
            freq in 0.0f32..500.0,
            seed in any::<u64>(),
            steps in 1usize..400,
        ) {
            let cfg = Config {
                shooting_star_count: max,
                shooting_star_frequency: freq,
                ..Config::default()
            };
            let mut rng = seeded(seed);
            let mut stars = Vec::new();
            let mut timer = 0.0;
            for _ in 0..steps {
                update(&mut stars, &mut timer, &cfg, 1280.0, 720.0, 0.05, &mut rng);
                prop_assert!(stars.len() <= max);
                for s in &stars {
                    prop_assert!(s.life > 0.0 && s.life < s.max_life);
                }
            }
        }
    }
}
