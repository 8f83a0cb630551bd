//! Animated aquatic-space background.
//!
//! A starfield over a shimmering waterline, with bubbles, jellyfish,
//! coral and fish below it and an optional data-particle network on top.
//! Every population is configurable through one flat [`Config`].
//!
//! The crate splits into a pure simulation ([`sim::World`]), a layered
//! renderer over an abstract [`render::Surface`], and an [`Engine`] that
//! ties them to a host frame clock. In the browser, `web::AquaBackground`
//! drives a `<canvas>`; natively, [`render::Raster`] renders offscreen.

pub mod color;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod random;
pub mod render;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use color::Rgba;
pub use config::{Config, ConfigOverride, NebulaCloud, merge};
pub use driver::{AnimationDriver, DriverState, FrameScheduler, ManualScheduler, clamp_dt};
pub use engine::Engine;
pub use error::EngineError;
pub use random::RandomSource;
