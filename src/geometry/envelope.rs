// envelope.rs - Periodic and one-shot animation curves

use std::f64::consts::TAU;

/// `x` radians reduced to [0, 2π) before narrowing, so a long-running
/// clock keeps its sub-frame resolution.
#[inline]
pub fn wrap_angle(x: f64) -> f32 {
    x.rem_euclid(TAU) as f32
}

/// `sin` of a cycle with the given period (seconds) and phase (radians).
#[inline]
pub fn oscillate(t: f64, period: f32, phase: f32) -> f32 {
    (wrap_angle(t * TAU / period as f64) + phase).sin()
}

/// Twinkle level in [0, 1].
#[inline]
pub fn twinkle(t: f64, period: f32, phase: f32) -> f32 {
    0.5 + 0.5 * oscillate(t, period, phase)
}

/// Star opacity for a twinkle level: between 0.4 and 1.0 of `base`.
#[inline]
pub fn star_opacity(base: f32, twinkle: f32) -> f32 {
    base * (0.4 + 0.6 * twinkle.clamp(0.0, 1.0))
}

pub const FADE_IN: f32 = 0.2;

/// Triangular life envelope: ramps up over the first 20% of life, then
/// down to zero at the end. `progress` is `life / max_life`.
#[inline]
pub fn trail_fade(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p < FADE_IN {
        p / FADE_IN
    } else {
        1.0 - (p - FADE_IN) / (1.0 - FADE_IN)
    }
}
