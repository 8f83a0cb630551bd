// render/ - Layered drawing of the world onto a surface
//
// Layer order is the only depth mechanism: background first, foreground
// last, later layers painting over earlier ones. The base gradient and the
// stars always draw; every other layer follows its `*_enabled` flag.

mod raster;
mod record;
mod scene;
mod sea;
mod surface;

pub use raster::Raster;
pub use record::{DrawOp, Recorder};
pub use surface::{Glow, LineCap, Paint, Path, PathOp, Stop, Stroke, Style, Surface};

use tracing::trace;

use crate::config::Config;
use crate::error::EngineError;
use crate::sim::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Base,
    Grid,
    Nebula,
    Stars,
    ShootingStars,
    Waterline,
    Coral,
    Bubbles,
    Fish,
    Jellyfish,
    Particles,
}

impl Layer {
    /// Back to front.
    pub const ORDER: [Layer; 11] = [
        Layer::Base,
        Layer::Grid,
        Layer::Nebula,
        Layer::Stars,
        Layer::ShootingStars,
        Layer::Waterline,
        Layer::Coral,
        Layer::Bubbles,
        Layer::Fish,
        Layer::Jellyfish,
        Layer::Particles,
    ];

    pub fn enabled(self, cfg: &Config) -> bool {
        match self {
            Layer::Base | Layer::Stars => true,
            Layer::Grid => cfg.grid_enabled,
            Layer::Nebula => cfg.nebula_enabled,
            Layer::ShootingStars => cfg.shooting_star_enabled,
            Layer::Waterline => cfg.waterline_enabled,
            Layer::Coral => cfg.coral_enabled,
            Layer::Bubbles => cfg.bubbles_enabled,
            Layer::Fish => cfg.fish_enabled,
            Layer::Jellyfish => cfg.jellyfish_enabled,
            Layer::Particles => cfg.particles_enabled,
        }
    }

    #[inline]
    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of layers, e.g. the ones a frame actually drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerMask(u16);

impl LayerMask {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every layer `cfg` turns on.
    pub fn enabled(cfg: &Config) -> Self {
        Layer::ORDER.iter().filter(|l| l.enabled(cfg)).collect()
    }

    pub fn insert(&mut self, layer: Layer) {
        self.0 |= layer.bit();
    }

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in draw order.
    pub fn iter(self) -> impl Iterator<Item = Layer> {
        Layer::ORDER.into_iter().filter(move |l| self.contains(*l))
    }
}

impl<'a> FromIterator<&'a Layer> for LayerMask {
    fn from_iter<I: IntoIterator<Item = &'a Layer>>(iter: I) -> Self {
        let mut mask = LayerMask::empty();
        for l in iter {
            mask.insert(*l);
        }
        mask
    }
}

/// Clear `surface` and draw every enabled layer of `world`, back to front.
/// Returns the layers drawn. The first failing primitive aborts the frame.
pub fn draw<S: Surface + ?Sized>(surface: &mut S, cfg: &Config, world: &World) -> Result<LayerMask, EngineError> {
    surface.clear()?;
    let mut drawn = LayerMask::empty();
    for layer in Layer::ORDER {
        if !layer.enabled(cfg) {
            continue;
        }
        match layer {
            Layer::Base => scene::base(surface, cfg, world)?,
            Layer::Grid => scene::grid(surface, cfg, world)?,
            Layer::Nebula => scene::nebula(surface, cfg, world)?,
            Layer::Stars => scene::stars(surface, cfg, world)?,
            Layer::ShootingStars => scene::shooting_stars(surface, world)?,
            Layer::Waterline => scene::waterline(surface, cfg, world)?,
            Layer::Coral => sea::coral(surface, cfg, world)?,
            Layer::Bubbles => sea::bubbles(surface, cfg, world)?,
            Layer::Fish => sea::fish(surface, world)?,
            Layer::Jellyfish => sea::jellyfish(surface, cfg, world)?,
            Layer::Particles => sea::particles(surface, cfg, world)?,
        }
        drawn.insert(layer);
    }
    trace!(layers = drawn.len(), "frame drawn");
    Ok(drawn)
}
