// coral.rs - Branching coral and anemone shapes
//
// Branch coral is a binary tree of line segments. Each level shrinks the
// segment by BRANCH_SHRINK and forks left/right by a spread derived from
// the per-instance seed, so a given seed always yields the same tree.

use std::f32::consts::TAU;

use super::{Point, Segment};

/// Recursion depth every branch coral starts from.
pub const BRANCH_DEPTH: u32 = 5;
/// Segments shorter than this are not drawn and end the branch.
pub const MIN_BRANCH_LEN: f32 = 4.0;
pub const BRANCH_SHRINK: f32 = 0.65;

const SPREAD_BASE: f32 = 0.35;
const SPREAD_JITTER: f32 = 0.2;
const SEED_LEFT: f32 = 1.3;
const SEED_RIGHT: f32 = 0.7;

pub const ANEMONE_PETALS: usize = 8;

/// Fork angle at a given depth, between 0.35 and 0.55 radians.
#[inline]
pub fn branch_spread(seed: f32, depth: u32) -> f32 {
    let jitter = (seed * depth as f32) % SPREAD_JITTER;
    // A negative or non-finite seed must not widen the fork.
    if jitter.is_finite() {
        SPREAD_BASE + jitter.abs()
    } else {
        SPREAD_BASE
    }
}

/// Every segment of a branch coral rooted at `origin`.
///
/// Terminates after at most `depth` levels (at most `2^depth - 1` segments)
/// and never emits a segment shorter than [`MIN_BRANCH_LEN`].
pub fn branch_segments(origin: Point, len: f32, angle: f32, depth: u32, seed: f32) -> Vec<Segment> {
    let mut out = Vec::with_capacity((1usize << depth.min(16)).saturating_sub(1));
    grow(&mut out, origin, len, angle, depth, seed);
    out
}

fn grow(out: &mut Vec<Segment>, from: Point, len: f32, angle: f32, depth: u32, seed: f32) {
    // `!(len >= MIN)` also stops on NaN lengths.
    if depth == 0 || !(len >= MIN_BRANCH_LEN) {
        return;
    }
    let to = from.polar(angle, len);
    out.push(Segment { from, to });

    let spread = branch_spread(seed, depth);
    let next = len * BRANCH_SHRINK;
    grow(out, to, next, angle - spread, depth - 1, seed * SEED_LEFT);
    grow(out, to, next, angle + spread, depth - 1, seed * SEED_RIGHT);
}

/// One anemone petal: a quadratic curve from the anemone center to `tip`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Petal {
    pub control: Point,
    pub tip: Point,
}

/// Petals radiating around `center`, rotated by `sway` radians. The
/// vertical extent is squashed to half the horizontal radius.
pub fn anemone_petals(center: Point, radius: f32, sway: f32) -> [Petal; ANEMONE_PETALS] {
    std::array::from_fn(|i| {
        let angle = (i as f32 / ANEMONE_PETALS as f32) * TAU + sway;
        let bend = angle + 0.3;
        Petal {
            control: Point::new(
                center.x + bend.cos() * radius * 0.6,
                center.y + bend.sin() * radius * 0.3,
            ),
            tip: Point::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius * 0.5,
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn full_tree_has_thirty_one_segments() {
        let segs = branch_segments(Point::new(0.0, 500.0), 120.0, -FRAC_PI_2, BRANCH_DEPTH, 10.0);
        // 120 * 0.65^4 ≈ 21 px, so every level is above the minimum.
        assert_eq!(segs.len(), 31);
        assert!((segs[0].length() - 120.0).abs() < 1e-3);
        assert_eq!(segs[0].from, Point::new(0.0, 500.0));
    }

    #[test]
    fn short_trunk_stops_early() {
        // 8 -> 5.2 -> 3.38: only two levels qualify.
        let segs = branch_segments(Point::default(), 8.0, 0.0, BRANCH_DEPTH, 3.0);
        assert_eq!(segs.len(), 3);
        assert!(branch_segments(Point::default(), 3.9, 0.0, BRANCH_DEPTH, 3.0).is_empty());
    }

    #[test]
    fn same_seed_same_tree() {
        let a = branch_segments(Point::new(10.0, 10.0), 60.0, -1.0, 5, 421.7);
        let b = branch_segments(Point::new(10.0, 10.0), 60.0, -1.0, 5, 421.7);
        assert_eq!(a, b);
    }

    #[test]
    fn anemone_has_fixed_petal_count_and_rotates() {
        let center = Point::new(50.0, 50.0);
        let still = anemone_petals(center, 20.0, 0.0);
        let swayed = anemone_petals(center, 20.0, 0.1);
        assert_eq!(still.len(), ANEMONE_PETALS);
        assert!((still[0].tip.x - 70.0).abs() < 1e-4);
        assert_ne!(still[0].tip, swayed[0].tip);
    }

    proptest! {
        #[test]
        fn recursion_is_bounded_for_any_seed(
            seed in prop::num::f32::ANY,
            len in 0.0f32..2000.0,
            angle in -10.0f32..10.0,
        ) {
            let segs = branch_segments(Point::default(), len, angle, BRANCH_DEPTH, seed);
            prop_assert!(segs.len() <= (1 << BRANCH_DEPTH) - 1);
            for s in &segs {
                prop_assert!(s.length() >= MIN_BRANCH_LEN - 1e-3);
            }
        }

        #[test]
        fn spread_stays_in_band(seed in -1.0e6f32..1.0e6, depth in 1u32..=BRANCH_DEPTH) {
            let s = branch_spread(seed, depth);
            prop_assert!((0.35..=0.55).contains(&s));
        }
    }
}
