// sim/ - Aquatic-space simulation
//
// Entity pools, one module per kind. The world owns the clock, the
// shooting-star spawn timer and every pool; nothing here touches a surface.

mod bubble;
mod coral;
mod fish;
mod jellyfish;
mod particle;
mod shooting_star;
mod star;

pub use bubble::{Bubble, Entry};
pub use coral::{Coral, CoralKind, slot_x};
pub use fish::Fish;
pub use jellyfish::Jellyfish;
pub use particle::{DataParticle, LINK_DISTANCE, Link, links};
pub use shooting_star::{ShootingStar, Turnover};
pub use star::{SPARKLE_MIN_BASE, SPARKLE_MIN_TWINKLE, Star};

use tracing::{debug, trace};

use crate::config::Config;
use crate::driver::clamp_dt;
use crate::random::RandomSource;

/// What one simulation step changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub shooting: Turnover,
    pub bubbles_recycled: usize,
    pub fish_replaced: usize,
}

/// Simulation state for one engine instance.
#[derive(Clone, Debug, Default)]
pub struct World {
    w: f32,
    h: f32,

    /// Seconds of simulated time. Kept in f64 so steps still register
    /// after days of animation; phases narrow to f32 via `wrap_angle`.
    t: f64,
    /// Milliseconds until the next shooting star may spawn.
    shooting_timer: f32,

    stars: Vec<Star>,
    shooting_stars: Vec<ShootingStar>,
    bubbles: Vec<Bubble>,
    jellyfish: Vec<Jellyfish>,
    coral: Vec<Coral>,
    fish: Vec<Fish>,
    particles: Vec<DataParticle>,
}

impl World {
    pub fn new(cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) -> Self {
        let mut world = Self::default();
        world.initialize(cfg, w, h, rng);
        world
    }

    /// Rebuild every pool for a `w` x `h` surface, discarding all entity
    /// state. The clock keeps running; the spawn timer restarts.
    pub fn initialize(&mut self, cfg: &Config, w: f32, h: f32, rng: &mut impl RandomSource) {
        self.w = w;
        self.h = h;
        self.shooting_timer = 0.0;

        self.stars = star::init(cfg, w, h, rng);
        self.shooting_stars.clear();
        self.bubbles = bubble::init(cfg, w, h, rng);
        self.jellyfish = jellyfish::init(cfg, w, h, rng);
        self.coral = coral::init(cfg, w, h, rng);
        self.fish = fish::init(cfg, w, h, rng);
        self.particles = particle::init(cfg, w, h, rng);

        debug!(
            w,
            h,
            stars = self.stars.len(),
            bubbles = self.bubbles.len(),
            jellyfish = self.jellyfish.len(),
            coral = self.coral.len(),
            fish = self.fish.len(),
            particles = self.particles.len(),
            "pools initialized"
        );
    }

    /// Advance the clock by `dt` seconds (clamped), then run each enabled
    /// population's per-frame rule once. Stars and coral have no motion
    /// state; their animation is derived from the clock at draw time.
    pub fn step(&mut self, cfg: &Config, dt: f32, rng: &mut impl RandomSource) -> StepStats {
        let dt = clamp_dt(dt);
        self.t += dt as f64;

        let (w, h, t) = (self.w, self.h, self.t);
        let mut stats = StepStats::default();

        if cfg.shooting_star_enabled {
            stats.shooting = shooting_star::update(
                &mut self.shooting_stars,
                &mut self.shooting_timer,
                cfg,
                w,
                h,
                dt,
                rng,
            );
            if stats.shooting.spawned > 0 {
                debug!(alive = self.shooting_stars.len(), "shooting star spawned");
            }
            if stats.shooting.expired > 0 {
                debug!(expired = stats.shooting.expired, "shooting star expired");
            }
        }
        if cfg.bubbles_enabled {
            stats.bubbles_recycled = bubble::update(&mut self.bubbles, cfg, w, h, t, dt, rng);
        }
        if cfg.jellyfish_enabled {
            jellyfish::update(&mut self.jellyfish, w);
        }
        if cfg.fish_enabled {
            stats.fish_replaced = fish::update(&mut self.fish, cfg, w, h, rng);
        }
        if cfg.particles_enabled {
            particle::update(&mut self.particles, w, h);
        }

        trace!(dt, t, ?stats, "step");
        stats
    }

    // Accessors
    pub fn width(&self) -> f32 { self.w }
    pub fn height(&self) -> f32 { self.h }
    pub fn time(&self) -> f64 { self.t }
    pub fn shooting_timer(&self) -> f32 { self.shooting_timer }

    pub fn stars(&self) -> &[Star] { &self.stars }
    pub fn shooting_stars(&self) -> &[ShootingStar] { &self.shooting_stars }
    pub fn bubbles(&self) -> &[Bubble] { &self.bubbles }
    pub fn jellyfish(&self) -> &[Jellyfish] { &self.jellyfish }
    pub fn coral(&self) -> &[Coral] { &self.coral }
    pub fn fish(&self) -> &[Fish] { &self.fish }
    pub fn particles(&self) -> &[DataParticle] { &self.particles }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::driver::MAX_STEP_DT;
    use crate::random::{ScriptedRandom, seeded};

    #[test]
    fn pools_match_configured_counts() {
        let cfg = Config::default();
        let world = World::new(&cfg, 1280.0, 720.0, &mut seeded(7));
        assert_eq!(world.stars().len(), 120);
        assert_eq!(world.bubbles().len(), 22);
        assert_eq!(world.jellyfish().len(), 3);
        assert_eq!(world.coral().len(), 7);
        assert_eq!(world.fish().len(), 5);
        assert!(world.particles().is_empty());
        assert!(world.shooting_stars().is_empty());
    }

    #[test]
    fn large_gap_advances_clock_by_at_most_one_step() {
        let cfg = Config::default();
        let mut world = World::new(&cfg, 800.0, 600.0, &mut seeded(1));
        world.step(&cfg, 12.0, &mut seeded(2));
        assert_eq!(world.time(), MAX_STEP_DT as f64);
    }

    #[test]
    fn disabled_pools_are_inert() {
        let cfg = Config {
            bubbles_enabled: false,
            jellyfish_enabled: false,
            fish_enabled: false,
            shooting_star_enabled: false,
            ..Config::default()
        };
        let mut rng = ScriptedRandom::constant(0.4);
        let mut world = World::new(&cfg, 800.0, 600.0, &mut rng);
        let (bubbles, jellies, fish) =
            (world.bubbles().to_vec(), world.jellyfish().to_vec(), world.fish().to_vec());
        for _ in 0..50 {
            world.step(&cfg, 0.016, &mut rng);
        }
        assert_eq!(world.bubbles(), &bubbles[..]);
        assert_eq!(world.jellyfish(), &jellies[..]);
        assert_eq!(world.fish(), &fish[..]);
        assert!(world.shooting_stars().is_empty());
    }

    #[test]
    fn first_step_spawns_a_shooting_star() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let mut world = World::new(&cfg, 800.0, 600.0, &mut rng);
        let stats = world.step(&cfg, 0.016, &mut rng);
        assert_eq!(stats.shooting.spawned, 1);
        assert_eq!(world.shooting_stars().len(), 1);
        assert!(world.shooting_timer() > 0.0);
    }

    #[test]
    fn reinitialize_keeps_clock_and_counts() {
        let cfg = Config::default();
        let mut rng = seeded(3);
        let mut world = World::new(&cfg, 800.0, 600.0, &mut rng);
        for _ in 0..10 {
            world.step(&cfg, 0.02, &mut rng);
        }
        let t = world.time();
        world.initialize(&cfg, 400.0, 300.0, &mut rng);
        assert_eq!(world.time(), t);
        assert_eq!((world.width(), world.height()), (400.0, 300.0));
        assert_eq!(world.stars().len(), cfg.star_count);
        assert!(world.shooting_stars().is_empty());
    }

    #[test]
    fn clock_keeps_advancing_after_days() {
        let cfg = Config::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let mut world = World::new(&cfg, 800.0, 600.0, &mut rng);
        // 2^19 s, about six days
        world.t = 524_288.0;
        let star = world.stars()[0].clone();
        let before = star.opacity(world.time());

        world.step(&cfg, 1.0 / 60.0, &mut rng);
        assert!(world.time() > 524_288.0);
        assert!((world.time() - 524_288.0 - 1.0 / 60.0).abs() < 1e-6);
        assert_ne!(star.opacity(world.time()), before);
    }

    proptest! {
        #[test]
        fn shooting_population_never_exceeds_max(
            seed in any::<u64>(),
            max in 0usize..6,
            dts in prop::collection::vec(0.0f32..1.0, 1..300),
        ) {
            let cfg = Config {
                shooting_star_count: max,
                shooting_star_frequency: 50.0,
                ..Config::default()
            };
            let mut rng = seeded(seed);
            let mut world = World::new(&cfg, 640.0, 480.0, &mut rng);
            for dt in dts {
                world.step(&cfg, dt, &mut rng);
                prop_assert!(world.shooting_stars().len() <= max);
            }
        }
    }
}
