//! One-dimensional exponential smoothing for the effect strength scalars.

/// A single exponential-decay step: `current + (target - current) * rate`.
///
/// `rate` is expected in (0, 1]; at 1 the value snaps to the target. The
/// result never lands on the far side of the target, even under rounding.
pub fn advance(current: f64, target: f64, rate: f64) -> f64 {
    if rate >= 1.0 {
        return target;
    }
    let next = current + (target - current) * rate;
    if (target - next) * (target - current) < 0.0 {
        target
    } else {
        next
    }
}

/// A scalar that eases toward a target by one [`advance`] step per frame.
///
/// Used for the effect intensity and the blob radius. The target is set
/// from the motion state; the value only moves when `advance` is called.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothedScalar {
    value: f64,
    target: f64,
}

impl SmoothedScalar {
    /// Creates a scalar resting at `value` (target equal to value).
    pub fn new(value: f64) -> Self {
        Self {
            value,
            target: value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// True when the value is moving up toward a larger target.
    pub fn is_rising(&self) -> bool {
        self.target > self.value
    }

    /// True once the value has reached its target exactly.
    pub fn is_settled(&self) -> bool {
        self.value == self.target
    }

    /// Advances one step toward the target and returns the new value.
    ///
    /// A settled scalar is left untouched.
    pub fn advance(&mut self, rate: f64) -> f64 {
        if !self.is_settled() {
            self.value = advance(self.value, self.target, rate);
        }
        self.value
    }

    /// Snaps to the target once within `epsilon` of it.
    ///
    /// Exponential decay only reaches its target asymptotically; hosts call
    /// this so a faded-out effect becomes exactly inert.
    pub fn snap_within(&mut self, epsilon: f64) {
        if (self.target - self.value).abs() < epsilon {
            self.value = self.target;
        }
    }

    /// Value the next `advance(rate)` would produce, without committing it.
    pub fn peek(&self, rate: f64) -> f64 {
        if self.is_settled() {
            self.value
        } else {
            advance(self.value, self.target, rate)
        }
    }
}
