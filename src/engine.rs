// engine.rs - One animated background instance
//
// Owns the effective configuration, the world, the surface it draws to,
// the random source and the animation driver. Hosts call `frame` from
// their per-frame callback and `resize` from their resize callback;
// everything runs on that one thread.

use tracing::{error, info};

use crate::config::{Config, ConfigOverride};
use crate::driver::{AnimationDriver, DriverState, FrameScheduler};
use crate::error::EngineError;
use crate::random::RandomSource;
use crate::render::{self, LayerMask, Surface};
use crate::sim::{StepStats, World};

pub struct Engine<S, R, F> {
    cfg: Config,
    world: World,
    surface: S,
    rng: R,
    driver: AnimationDriver<F>,
}

impl<S: Surface, R: RandomSource, F: FrameScheduler> Engine<S, R, F> {
    /// Merge `overrides` over the defaults and populate every pool for the
    /// surface's current size. The loop stays idle until `start`.
    pub fn create(surface: S, overrides: ConfigOverride, mut rng: R, scheduler: F) -> Self {
        let keys = overrides.keys();
        let cfg = Config::with_override(overrides);
        let (w, h) = surface.size();
        let world = World::new(&cfg, w as f32, h as f32, &mut rng);
        info!(w, h, overrides = ?keys, "engine created");
        Self { cfg, world, surface, rng, driver: AnimationDriver::new(scheduler) }
    }

    /// Begin the animation loop. Idempotent.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.driver.start()? {
            info!("animation started");
        }
        Ok(())
    }

    /// Halt the animation loop. Idempotent.
    pub fn stop(&mut self) {
        if self.driver.stop() {
            info!("animation stopped");
        }
    }

    /// Host frame callback at `timestamp` (ms). Runs one step and one
    /// render, then asks for the next callback. Returns `None` when idle.
    ///
    /// A failure stops the loop for good: the error is returned and no
    /// further callback is requested.
    pub fn frame(&mut self, timestamp: f64) -> Result<Option<LayerMask>, EngineError> {
        let Some(dt) = self.driver.begin_frame(timestamp) else {
            return Ok(None);
        };
        self.step(dt);
        let drawn = self.render().and_then(|drawn| {
            self.driver.end_frame()?;
            Ok(drawn)
        });
        if let Err(err) = &drawn {
            error!(%err, "frame failed; animation halted");
            self.driver.halt();
        }
        drawn.map(Some)
    }

    /// Adopt new surface dimensions and rebuild every pool from scratch.
    pub fn resize(&mut self, w: u32, h: u32) -> Result<(), EngineError> {
        self.surface.resize(w, h)?;
        self.world.initialize(&self.cfg, w as f32, h as f32, &mut self.rng);
        info!(w, h, "resized; pools reinitialized");
        Ok(())
    }

    /// Advance the simulation by `dt` seconds (clamped).
    pub fn step(&mut self, dt: f32) -> StepStats {
        self.world.step(&self.cfg, dt, &mut self.rng)
    }

    /// Draw the current world without advancing it.
    pub fn render(&mut self) -> Result<LayerMask, EngineError> {
        render::draw(&mut self.surface, &self.cfg, &self.world)
    }

    pub fn config(&self) -> &Config { &self.cfg }
    pub fn world(&self) -> &World { &self.world }
    pub fn surface(&self) -> &S { &self.surface }
    pub fn driver(&self) -> &AnimationDriver<F> { &self.driver }
    pub fn state(&self) -> DriverState { self.driver.state() }
    pub fn is_running(&self) -> bool { self.driver.is_running() }
}
