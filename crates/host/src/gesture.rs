//! Scripted pointer paths used in place of live input.

use liquid_reveal_core::{DVec2, EffectError};
use std::f64::consts::TAU;
use std::time::Duration;

/// All available gesture names.
const GESTURE_NAMES: &[&str] = &["still", "sweep", "circle", "zigzag", "tap"];

/// A pointer path over time, in UV space.
///
/// Use [`GestureKind::from_name`] for string-based construction (CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// The pointer never moves.
    Still,
    /// Left-to-right pass across the middle with a slight wave.
    Sweep,
    /// One full turn around the center.
    Circle,
    /// Left-to-right pass bouncing between two rows.
    Zigzag,
    /// A short burst of samples at the center.
    Tap,
}

impl GestureKind {
    /// Looks up a gesture by name.
    ///
    /// Returns `EffectError::UnknownGesture` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EffectError> {
        match name {
            "still" => Ok(GestureKind::Still),
            "sweep" => Ok(GestureKind::Sweep),
            "circle" => Ok(GestureKind::Circle),
            "zigzag" => Ok(GestureKind::Zigzag),
            "tap" => Ok(GestureKind::Tap),
            _ => Err(EffectError::UnknownGesture(name.to_string())),
        }
    }

    /// Returns a slice of all recognized gesture names.
    pub fn list_gestures() -> &'static [&'static str] {
        GESTURE_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureKind::Still => "still",
            GestureKind::Sweep => "sweep",
            GestureKind::Circle => "circle",
            GestureKind::Zigzag => "zigzag",
            GestureKind::Tap => "tap",
        }
    }

    /// How long the pointer keeps moving.
    pub fn duration(&self) -> Duration {
        match self {
            GestureKind::Still => Duration::ZERO,
            GestureKind::Sweep => Duration::from_millis(1200),
            GestureKind::Circle => Duration::from_millis(2000),
            GestureKind::Zigzag => Duration::from_millis(1600),
            GestureKind::Tap => Duration::from_millis(100),
        }
    }

    /// Pointer position at `t`, or `None` once the pointer has stopped.
    pub fn position(&self, t: Duration) -> Option<DVec2> {
        let total = self.duration();
        if *self == GestureKind::Still || t > total {
            return None;
        }
        let u = t.as_secs_f64() / total.as_secs_f64();
        let p = match self {
            GestureKind::Still => return None,
            GestureKind::Sweep => DVec2::new(0.1 + 0.8 * u, 0.5 + 0.05 * (TAU * u).sin()),
            GestureKind::Circle => {
                let a = TAU * u;
                DVec2::new(0.5 + 0.25 * a.cos(), 0.5 + 0.25 * a.sin())
            }
            GestureKind::Zigzag => {
                // four teeth between v = 0.3 and v = 0.7
                let tooth = 1.0 - (2.0 * (4.0 * u).fract() - 1.0).abs();
                DVec2::new(0.1 + 0.8 * u, 0.3 + 0.4 * tooth)
            }
            GestureKind::Tap => DVec2::new(0.5, 0.5),
        };
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_round_trips_every_listed_gesture() {
        for name in GestureKind::list_gestures() {
            let g = GestureKind::from_name(name).unwrap();
            assert_eq!(g.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = GestureKind::from_name("spiral");
        assert!(matches!(result, Err(EffectError::UnknownGesture(_))));
    }

    #[test]
    fn still_never_moves() {
        for ms in [0, 10, 500, 5000] {
            assert_eq!(GestureKind::Still.position(Duration::from_millis(ms)), None);
        }
    }

    #[test]
    fn gestures_stop_after_their_duration() {
        for name in GestureKind::list_gestures() {
            let g = GestureKind::from_name(name).unwrap();
            let after = g.duration() + Duration::from_millis(1);
            assert_eq!(g.position(after), None, "{name} still moving");
        }
    }

    #[test]
    fn sweep_moves_left_to_right() {
        let g = GestureKind::Sweep;
        let start = g.position(Duration::ZERO).unwrap();
        let end = g.position(g.duration()).unwrap();
        assert!((start.x - 0.1).abs() < 1e-12);
        assert!((end.x - 0.9).abs() < 1e-12);
    }

    #[test]
    fn circle_stays_on_its_ring() {
        let g = GestureKind::Circle;
        for ms in (0..=2000).step_by(125) {
            let p = g.position(Duration::from_millis(ms)).unwrap();
            let r = (p - DVec2::splat(0.5)).length();
            assert!((r - 0.25).abs() < 1e-12, "r = {r} at {ms} ms");
        }
    }

    #[test]
    fn moving_gestures_stay_inside_unit_square() {
        for name in GestureKind::list_gestures() {
            let g = GestureKind::from_name(name).unwrap();
            for ms in (0..=2000).step_by(10) {
                if let Some(p) = g.position(Duration::from_millis(ms)) {
                    assert!(
                        (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y),
                        "{name} left the square at {ms} ms: {p:?}"
                    );
                }
            }
        }
    }
}
