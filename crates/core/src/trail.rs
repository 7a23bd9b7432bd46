//! Fixed-length pursuit chain approximating the pointer's recent path.
//!
//! The head chases the live pointer and every following point chases its
//! predecessor, each by the same pursuit rate per frame. No real history is
//! stored: the chain's lag produces the tail.

use crate::error::EffectError;
use glam::DVec2;

/// Where the pointer is assumed to be before any move event arrives.
pub const POINTER_REST: DVec2 = DVec2::new(0.5, 0.5);

/// An ordered, fixed-length sequence of trail points. Index 0 is the head.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: Vec<DVec2>,
}

impl TrailBuffer {
    /// Creates `len` points resting at the domain centre.
    ///
    /// Returns `EffectError::InvalidTrailLength` when `len` is zero.
    pub fn new(len: usize) -> Result<Self, EffectError> {
        if len == 0 {
            return Err(EffectError::InvalidTrailLength);
        }
        Ok(Self {
            points: vec![POINTER_REST; len],
        })
    }

    /// Creates a trail from explicit points.
    ///
    /// Returns `EffectError::InvalidTrailLength` when `points` is empty.
    pub fn from_points(points: Vec<DVec2>) -> Result<Self, EffectError> {
        if points.is_empty() {
            return Err(EffectError::InvalidTrailLength);
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a trail holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// The point closest to the live pointer.
    pub fn head(&self) -> DVec2 {
        self.points[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.points.iter().copied()
    }

    /// Moves the head toward `target` and every other point toward its
    /// predecessor, by `rate` of the remaining distance.
    ///
    /// Points are updated head first, so point `i` chases the position point
    /// `i - 1` reached in this same step, not the one it held last frame.
    /// From rest, the first step moves point `i` by `rate^(i + 1)` of the
    /// jump, where a snapshot-based update would leave every follower still.
    pub fn advance(&mut self, target: DVec2, rate: f64) {
        let mut leader = target;
        for point in self.points.iter_mut() {
            *point = point.lerp(leader, rate);
            leader = *point;
        }
    }

    /// Snaps every point to `p`.
    pub fn reset(&mut self, p: DVec2) {
        self.points.fill(p);
    }
}
