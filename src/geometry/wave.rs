// wave.rs - Waterline, tentacle and nebula drift curves

use super::{Point, oscillate, wrap_angle};

/// Horizontal sampling step of the waterline, in pixels.
pub const WATERLINE_STEP: f32 = 4.0;
const WATERLINE_SPEED: f64 = 1.2;

/// Samples of the waterline from x = 0 to x = width inclusive.
pub fn waterline_points(width: f32, base_y: f32, amp: f32, freq: f32, t: f64) -> Vec<Point> {
    if !(width >= 0.0) {
        return Vec::new();
    }
    let shift = wrap_angle(t * WATERLINE_SPEED);
    let n = (width / WATERLINE_STEP).floor() as usize + 1;
    (0..n)
        .map(|i| {
            let x = i as f32 * WATERLINE_STEP;
            Point::new(x, base_y + (x * freq + shift).sin() * amp)
        })
        .collect()
}

pub const TENTACLE_SEGMENTS: usize = 8;
const TENTACLE_SEGMENT_TWIST: f32 = 0.7;

/// Polyline of one tentacle hanging from `anchor`.
///
/// `phase` already includes the per-tentacle offset and time term. Lateral
/// sway grows linearly towards the tip; the anchor itself never moves.
pub fn tentacle_points(anchor: Point, len: f32, phase: f32, amp: f32) -> [Point; TENTACLE_SEGMENTS] {
    let n = TENTACLE_SEGMENTS as f32;
    std::array::from_fn(|i| {
        if i == 0 {
            return anchor;
        }
        let seg = (i + 1) as f32;
        let frac = seg / n;
        Point::new(
            anchor.x + (phase + seg * TENTACLE_SEGMENT_TWIST).sin() * amp * frac,
            anchor.y + frac * len,
        )
    })
}

/// Slow drift of nebula cloud `index` at time `t`, in pixels.
pub fn nebula_drift(t: f64, index: usize) -> Point {
    let i = index as f32;
    Point::new(
        (wrap_angle(t * 0.04) + i * 1.3).sin() * 30.0,
        (wrap_angle(t * 0.03) + i).cos() * 15.0,
    )
}

/// Vertical bob of a jellyfish, added at draw time only.
pub const JELLY_BOB_AMP: f32 = 12.0;

#[inline]
pub fn jelly_bob(t: f64, period: f32, phase: f32) -> f32 {
    oscillate(t, period, phase) * JELLY_BOB_AMP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waterline_covers_full_width() {
        let pts = waterline_points(100.0, 50.0, 6.0, 0.008, 0.0);
        assert_eq!(pts.len(), 26);
        assert_eq!(pts[0].x, 0.0);
        assert_eq!(pts[25].x, 100.0);
        assert!(pts.iter().all(|p| (p.y - 50.0).abs() <= 6.0 + 1e-4));
    }

    #[test]
    fn tentacle_hangs_from_anchor() {
        let anchor = Point::new(10.0, 20.0);
        let pts = tentacle_points(anchor, 48.0, 0.0, 10.0);
        assert_eq!(pts[0], anchor);
        assert!((pts[TENTACLE_SEGMENTS - 1].y - 68.0).abs() < 1e-4);
        for w in pts.windows(2) {
            assert!(w[1].y > w[0].y);
        }
    }

    #[test]
    fn bob_is_bounded() {
        for i in 0..100 {
            assert!(jelly_bob(i as f64 * 0.37, 5.0, 1.0).abs() <= JELLY_BOB_AMP);
        }
    }
}
