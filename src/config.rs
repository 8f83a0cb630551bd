// config.rs - Default configuration and one-level override merge
//
// Every option lives in one flat table. `Config` is the fully populated
// record the engine consumes; `ConfigOverride` is the same table with every
// field optional. Merging replaces a whole top-level value when the override
// sets it: a palette or cloud list is swapped out, never patched entry-wise.

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, hex};
use crate::error::EngineError;

/// One soft radial glow in the nebula layer. `x`/`y` are fractions of the
/// surface size, `r` is the radius in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NebulaCloud {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub color: Rgba,
    pub opacity: f32,
}

impl NebulaCloud {
    pub fn new(x: f32, y: f32, r: f32, color: &str, opacity: f32) -> Self {
        Self { x, y, r, color: hex(color), opacity }
    }
}

macro_rules! config_table {
    ($( $(#[$doc:meta])* $field:ident : $ty:ty = $default:expr; )*) => {
        /// Effective configuration: every option populated.
        #[derive(Clone, Debug, PartialEq, Serialize)]
        #[serde(rename_all = "camelCase")]
        pub struct Config {
            $( $(#[$doc])* pub $field: $ty, )*
        }

        impl Default for Config {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }

        /// Caller-supplied partial configuration. Absent keys inherit defaults.
        #[derive(Clone, Debug, Default, PartialEq, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct ConfigOverride {
            $( $(#[$doc])* pub $field: Option<$ty>, )*
        }

        impl ConfigOverride {
            /// Names of the keys this override sets.
            pub fn keys(&self) -> Vec<&'static str> {
                let mut keys = Vec::new();
                $( if self.$field.is_some() { keys.push(stringify!($field)); } )*
                keys
            }
        }

        /// Replace every top-level key the override sets; keep the rest.
        pub fn merge(defaults: &Config, over: ConfigOverride) -> Config {
            Config {
                $( $field: over.$field.unwrap_or_else(|| defaults.$field.clone()), )*
            }
        }
    };
}

config_table! {
    /// Vertical background gradient stops at 0, 0.45 and 1.
    base_bg: Vec<Rgba> = vec![hex("#020408"), hex("#050c18"), hex("#060f1e")];
    accent_color: Rgba = hex("#00e8c8");
    accent_color2: Option<Rgba> = None;

    star_count: usize = 120;
    star_color: Rgba = hex("#ffffff");
    star_opacity_min: f32 = 0.15;
    star_opacity_max: f32 = 0.65;

    nebula_enabled: bool = true;
    nebula_clouds: Vec<NebulaCloud> = vec![
        NebulaCloud::new(0.15, 0.12, 280.0, "#00e8c8", 0.055),
        NebulaCloud::new(0.75, 0.08, 320.0, "#7c3aed", 0.045),
        NebulaCloud::new(0.50, 0.20, 200.0, "#0096c7", 0.035),
    ];

    shooting_star_enabled: bool = true;
    shooting_star_color: Rgba = hex("#00e8c8");
    /// Trail mid color; falls back to `shooting_star_color`.
    shooting_star_color2: Option<Rgba> = None;
    /// Mean milliseconds between spawns.
    shooting_star_frequency: f32 = 6000.0;
    /// Maximum number alive at once.
    shooting_star_count: usize = 3;

    waterline_enabled: bool = true;
    /// Fraction of surface height.
    waterline_y: f32 = 0.32;
    waterline_opacity: f32 = 0.18;
    waterline_color: Rgba = hex("#00e8c8");
    waterline_wave_amp: f32 = 6.0;
    waterline_wave_freq: f32 = 0.008;

    bubbles_enabled: bool = true;
    bubble_count: usize = 22;
    bubble_color: Rgba = hex("#00e8c8");
    bubble_opacity_min: f32 = 0.04;
    bubble_opacity_max: f32 = 0.13;
    bubble_size_min: f32 = 3.0;
    bubble_size_max: f32 = 18.0;

    jellyfish_enabled: bool = true;
    jellyfish_count: usize = 3;
    jellyfish_colors: Vec<Rgba> = vec![hex("#00e8c8"), hex("#48cae4"), hex("#7c3aed")];
    jellyfish_opacity: f32 = 0.16;
    jellyfish_size_min: f32 = 45.0;
    jellyfish_size_max: f32 = 90.0;

    coral_enabled: bool = true;
    coral_count: usize = 7;
    coral_colors: Vec<Rgba> = vec![hex("#00e8c8"), hex("#0096c7"), hex("#7c3aed")];
    coral_opacity: f32 = 0.10;
    /// Mean coral height as a fraction of surface height.
    coral_height_fraction: f32 = 0.20;

    fish_enabled: bool = true;
    fish_count: usize = 5;
    fish_color: Rgba = hex("#48cae4");
    fish_opacity: f32 = 0.07;

    particles_enabled: bool = false;
    particle_count: usize = 40;
    particle_color: Rgba = hex("#00e5ff");
    particle_opacity: f32 = 0.06;
    /// Opacity each particle starts with.
    particle_opacity_min: f32 = 0.04;

    grid_enabled: bool = false;
    grid_color: Rgba = hex("#00e5ff");
    grid_opacity: f32 = 0.022;
    /// Cell size in pixels.
    grid_size: f32 = 60.0;
}

impl ConfigOverride {
    /// Parse an override object from JSON text. Unknown keys are ignored;
    /// a known key holding the wrong shape is an error.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Config {
    /// Defaults merged with `over`.
    pub fn with_override(over: ConfigOverride) -> Self {
        merge(&Config::default(), over)
    }

    /// Background stop `i`, falling back to the default stop when the
    /// configured list is shorter.
    pub fn base_stop(&self, i: usize) -> Rgba {
        self.base_bg
            .get(i)
            .copied()
            .unwrap_or_else(|| Config::default().base_bg[i.min(2)])
    }

    pub fn shooting_star_trail_color(&self) -> Rgba {
        self.shooting_star_color2.unwrap_or(self.shooting_star_color)
    }
}

/// Pick `palette[i % len]`, or `fallback` when the palette is empty.
pub fn cycle_color(palette: &[Rgba], i: usize, fallback: Rgba) -> Rgba {
    if palette.is_empty() {
        fallback
    } else {
        palette[i % palette.len()]
    }
}
