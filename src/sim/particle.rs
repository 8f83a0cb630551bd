// particle.rs - Toroidal data particles
//
// Particles drift at a constant velocity and wrap at all four edges. The
// network look comes entirely from the renderer linking near neighbours.

use crate::config::Config;
use crate::random::RandomSource;

/// Particles closer than this are linked by a line.
pub const LINK_DISTANCE: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DataParticle {
    pub x: f32,
    pub y: f32,
    /// Pixels per frame.
    pub vx: f32,
    pub vy: f32,
    pub r: f32,
    pub opacity: f32,
}

impl DataParticle {
    pub fn spawn(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Self {
        Self {
            x: rng.unit() * w,
            y: rng.unit() * h,
            vx: rng.signed(0.3),
            vy: rng.signed(0.3),
            r: rng.range(1.5, 3.5),
            opacity: cfg.particle_opacity_min,
        }
    }

    pub fn advance(&mut self, w: f32, h: f32) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x < 0.0 {
            self.x = w;
        }
        if self.x > w {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = h;
        }
        if self.y > h {
            self.y = 0.0;
        }
    }
}

/// The pool is only populated when particles are enabled.
pub fn init(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Vec<DataParticle> {
    if !cfg.particles_enabled {
        return Vec::new();
    }
    (0..cfg.particle_count).map(|_| DataParticle::spawn(cfg, w, h, rng)).collect()
}

pub fn update(pool: &mut [DataParticle], w: f32, h: f32) {
    for p in pool {
        p.advance(w, h);
    }
}

/// A link between particles `a` and `b`; `strength` is 1 when they touch
/// and falls linearly to 0 at [`LINK_DISTANCE`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub strength: f32,
}

/// Every unordered pair closer than [`LINK_DISTANCE`].
pub fn links(pool: &[DataParticle]) -> impl Iterator<Item = Link> + '_ {
    pool.iter().enumerate().flat_map(move |(i, p)| {
        pool[i + 1..].iter().enumerate().filter_map(move |(k, q)| {
            let dist = (p.x - q.x).hypot(p.y - q.y);
            (dist < LINK_DISTANCE).then(|| Link {
                a: i,
                b: i + 1 + k,
                strength: 1.0 - dist / LINK_DISTANCE,
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::random::seeded;

    fn at(x: f32, y: f32) -> DataParticle {
        DataParticle { x, y, vx: 0.0, vy: 0.0, r: 2.0, opacity: 0.04 }
    }

    #[test]
    fn wraps_on_every_edge() {
        let mut p = DataParticle { vx: -0.2, vy: 0.2, ..at(0.1, 99.9) };
        p.advance(200.0, 100.0);
        assert_eq!((p.x, p.y), (200.0, 0.0));

        let mut p = DataParticle { vx: 0.2, vy: -0.2, ..at(199.9, 0.1) };
        p.advance(200.0, 100.0);
        assert_eq!((p.x, p.y), (0.0, 100.0));
    }

    #[test]
    fn disabled_pool_is_empty() {
        let cfg = Config::default();
        assert!(!cfg.particles_enabled);
        assert!(init(&cfg, 100.0, 100.0, &mut seeded(1)).is_empty());
    }

    #[test]
    fn links_fade_with_distance() {
        let pool = vec![at(0.0, 0.0), at(50.0, 0.0), at(300.0, 0.0)];
        let found: Vec<Link> = links(&pool).collect();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].a, found[0].b), (0, 1));
        assert!((found[0].strength - 0.5).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn positions_stay_on_surface(seed in any::<u64>(), steps in 1usize..3000) {
            let cfg = Config { particles_enabled: true, ..Config::default() };
            let mut pool = init(&cfg, 320.0, 200.0, &mut seeded(seed));
            for _ in 0..steps {
                update(&mut pool, 320.0, 200.0);
            }
            for p in &pool {
                prop_assert!((0.0..=320.0).contains(&p.x));
                prop_assert!((0.0..=200.0).contains(&p.y));
            }
        }
    }
}
