//! Debounced "is the pointer moving" state.
//!
//! Every pointer move re-arms a single deadline `window` after the event.
//! The state reads as moving until the frame clock reaches that deadline.
//! Re-arming overwrites the previous deadline, so a burst of N moves
//! behaves exactly like one move at the time of the last event.

use std::time::Duration;

/// Debounce window used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Whether the pointer counts as moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Moving,
}

/// Debounced motion flag driven by an explicit deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionState {
    window: Duration,
    deadline: Option<Duration>,
    phase: MotionPhase,
}

impl MotionState {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            phase: MotionPhase::Idle,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// The pending idle deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Phase as of the last [`arm`](Self::arm) or [`poll`](Self::poll).
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Records a pointer move at `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.window));
        self.phase = MotionPhase::Moving;
    }

    /// True while `now` is before the pending deadline.
    pub fn is_moving(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Re-evaluates the phase at `now`, dropping an expired deadline.
    ///
    /// Returns the new phase.
    pub fn poll(&mut self, now: Duration) -> MotionPhase {
        if self.is_moving(now) {
            self.phase = MotionPhase::Moving;
        } else {
            if self.phase == MotionPhase::Moving {
                log::debug!("pointer idle at {:.3}s", now.as_secs_f64());
            }
            self.deadline = None;
            self.phase = MotionPhase::Idle;
        }
        self.phase
    }

    /// Drops any pending deadline and goes idle immediately.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.phase = MotionPhase::Idle;
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
