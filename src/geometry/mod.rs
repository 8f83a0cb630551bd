// geometry/ - Procedural shapes and periodic envelopes
//
// Pure functions of their arguments. No state, no randomness: the same
// inputs produce the same shapes every frame, which is what lets coral be
// regenerated from its stored seed instead of cached.

mod coral;
mod envelope;
mod wave;

pub use coral::*;
pub use envelope::*;
pub use wave::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `len` along `angle` (radians, y grows downward).
    #[inline]
    pub fn polar(self, angle: f32, len: f32) -> Point {
        Point::new(self.x + angle.cos() * len, self.y + angle.sin() * len)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    #[inline]
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }
}
