//! Effect configuration: tunable constants, JSON overrides and validation.
//!
//! Hosts usually start from [`EffectConfig::default`] and apply a JSON object
//! of overrides with [`EffectConfig::from_json`]. Unknown keys and wrongly
//! typed values are rejected up front so a typo never silently falls back to
//! a default. [`EffectConfig::validate`] runs when a controller is built,
//! never at frame time.

use std::time::Duration;

use crate::color::Rgba;
use crate::compositor::Compositor;
use crate::error::EffectError;
use crate::metaball::{FalloffKernel, FieldEvaluator};
use crate::noise_field::{DisplacementPolicy, NoiseField};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const DEFAULT_TRAIL_LENGTH: usize = 20;

/// Longest trail accepted by [`EffectConfig::validate`].
pub const MAX_TRAIL_LENGTH: usize = 64;
const DEFAULT_PURSUIT_RATE: f64 = 0.3;
const DEFAULT_INTENSITY_RATE: f64 = 0.1;
const DEFAULT_RADIUS_RISE_RATE: f64 = 0.1;
const DEFAULT_RADIUS_FALL_RATE: f64 = 0.1;
/// Blob radius while the pointer moves, as a fraction of the surface height.
const DEFAULT_RADIUS_TARGET: f64 = 0.12;
const DEFAULT_METABALL_THRESHOLD: f64 = 0.7;
const DEFAULT_EDGE_THICKNESS: f64 = 0.15;
const DEFAULT_REVEAL_SOFTNESS: f64 = 0.02;
const DEFAULT_DISPLACEMENT_SCALE: f64 = 0.03;
const DEFAULT_NOISE_FREQUENCY: f64 = 5.0;
const DEFAULT_NOISE_SPEED: f64 = 0.5;
const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Every tunable constant of the effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Number of points in the pursuit chain.
    pub trail_length: usize,
    /// Fraction of the remaining distance each trail point covers per frame.
    pub pursuit_rate: f64,
    /// Per-frame smoothing rate of the intensity scalar.
    pub intensity_rate: f64,
    /// Radius smoothing rate while growing toward `radius_target`.
    pub radius_rise_rate: f64,
    /// Radius smoothing rate while shrinking back to zero.
    pub radius_fall_rate: f64,
    /// Head radius while the pointer is moving.
    pub radius_target: f64,
    pub metaball_threshold: f64,
    /// Half-width of the distortion ring around the threshold.
    pub edge_thickness: f64,
    /// Half-width of the reveal transition. Zero gives a hard edge.
    pub reveal_softness: f64,
    /// Maximum ripple offset in normalized units.
    pub displacement_scale: f64,
    pub noise_frequency: f64,
    /// Time multiplier of the noise drift.
    pub noise_speed: f64,
    pub noise_seed: u32,
    pub displacement_policy: DisplacementPolicy,
    pub kernel: FalloffKernel,
    /// Quiet period after the last pointer move before the effect fades out.
    pub debounce_ms: u64,
    /// Color of frames rendered before both images are available.
    pub fallback_color: Rgba,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            trail_length: DEFAULT_TRAIL_LENGTH,
            pursuit_rate: DEFAULT_PURSUIT_RATE,
            intensity_rate: DEFAULT_INTENSITY_RATE,
            radius_rise_rate: DEFAULT_RADIUS_RISE_RATE,
            radius_fall_rate: DEFAULT_RADIUS_FALL_RATE,
            radius_target: DEFAULT_RADIUS_TARGET,
            metaball_threshold: DEFAULT_METABALL_THRESHOLD,
            edge_thickness: DEFAULT_EDGE_THICKNESS,
            reveal_softness: DEFAULT_REVEAL_SOFTNESS,
            displacement_scale: DEFAULT_DISPLACEMENT_SCALE,
            noise_frequency: DEFAULT_NOISE_FREQUENCY,
            noise_speed: DEFAULT_NOISE_SPEED,
            noise_seed: 0,
            displacement_policy: DisplacementPolicy::default(),
            kernel: FalloffKernel::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            fallback_color: Rgba::BLACK,
        }
    }
}

impl EffectConfig {
    /// Applies a JSON object of overrides on top of the defaults and validates
    /// the result.
    ///
    /// Returns `ParamNotFound` for unknown keys, `ParamTypeMismatch` for values
    /// of the wrong JSON type, and any error [`validate`](Self::validate) reports.
    pub fn from_json(params: &Value) -> Result<Self, EffectError> {
        let mut config = Self::default();
        config.apply_json(params)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides in place without validating.
    pub fn apply_json(&mut self, params: &Value) -> Result<(), EffectError> {
        let obj = params
            .as_object()
            .ok_or_else(|| mismatch("params", "object", params))?;
        for (name, value) in obj {
            let name = name.as_str();
            match name {
                "trail_length" => self.trail_length = expect_usize(name, value)?,
                "pursuit_rate" => self.pursuit_rate = expect_f64(name, value)?,
                "intensity_rate" => self.intensity_rate = expect_f64(name, value)?,
                "radius_rise_rate" => self.radius_rise_rate = expect_f64(name, value)?,
                "radius_fall_rate" => self.radius_fall_rate = expect_f64(name, value)?,
                "radius_target" => self.radius_target = expect_f64(name, value)?,
                "metaball_threshold" => self.metaball_threshold = expect_f64(name, value)?,
                "edge_thickness" => self.edge_thickness = expect_f64(name, value)?,
                "reveal_softness" => self.reveal_softness = expect_f64(name, value)?,
                "displacement_scale" => self.displacement_scale = expect_f64(name, value)?,
                "noise_frequency" => self.noise_frequency = expect_f64(name, value)?,
                "noise_speed" => self.noise_speed = expect_f64(name, value)?,
                "noise_seed" => {
                    let seed = expect_u64(name, value)?;
                    self.noise_seed = u32::try_from(seed).map_err(|_| EffectError::InvalidParam {
                        name: name.into(),
                        reason: format!("{seed} does not fit in 32 bits"),
                    })?;
                }
                "displacement_policy" => self.displacement_policy = expect_enum(name, value)?,
                "kernel" => self.kernel = expect_enum(name, value)?,
                "debounce_ms" => self.debounce_ms = expect_u64(name, value)?,
                "fallback_color" => {
                    let hex = value
                        .as_str()
                        .ok_or_else(|| mismatch(name, "string", value))?;
                    self.fallback_color = Rgba::from_hex(hex)?;
                }
                other => return Err(EffectError::ParamNotFound(other.to_string())),
            }
        }
        Ok(())
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), EffectError> {
        if self.trail_length == 0 {
            return Err(EffectError::InvalidTrailLength);
        }
        if self.trail_length > MAX_TRAIL_LENGTH {
            return Err(invalid(
                "trail_length",
                format!("{} exceeds the maximum of {MAX_TRAIL_LENGTH}", self.trail_length),
            ));
        }
        for (name, value) in [
            ("pursuit_rate", self.pursuit_rate),
            ("intensity_rate", self.intensity_rate),
            ("radius_rise_rate", self.radius_rise_rate),
            ("radius_fall_rate", self.radius_fall_rate),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(EffectError::InvalidRate {
                    name: name.into(),
                    value,
                });
            }
        }
        for (name, value) in [
            ("radius_target", self.radius_target),
            ("edge_thickness", self.edge_thickness),
            ("reveal_softness", self.reveal_softness),
            ("displacement_scale", self.displacement_scale),
            ("noise_frequency", self.noise_frequency),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(name, format!("{value} must be finite and >= 0")));
            }
        }
        if !self.noise_speed.is_finite() {
            return Err(invalid("noise_speed", "must be finite".into()));
        }
        if !(self.metaball_threshold > 0.0 && self.metaball_threshold < 1.0) {
            return Err(invalid(
                "metaball_threshold",
                format!("{} is not in (0, 1)", self.metaball_threshold),
            ));
        }
        if self.debounce_ms == 0 {
            return Err(invalid("debounce_ms", "must be at least 1 ms".into()));
        }
        Ok(())
    }

    /// The motion debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn field_evaluator(&self) -> FieldEvaluator {
        FieldEvaluator {
            threshold: self.metaball_threshold,
            edge_thickness: self.edge_thickness,
            reveal_softness: self.reveal_softness,
            kernel: self.kernel,
        }
    }

    pub fn noise_field(&self) -> NoiseField {
        NoiseField::new(
            self.noise_seed,
            self.noise_frequency,
            self.noise_speed,
            self.displacement_policy,
        )
    }

    pub fn compositor(&self) -> Compositor {
        Compositor::new(self.noise_field(), self.displacement_scale)
    }

    /// Current values as a JSON object, keyed like [`from_json`](Self::from_json).
    ///
    /// Every field serializes to a JSON number or string, so `to_value`
    /// cannot fail; the empty-object branch is unreachable.
    pub fn params(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Type, default, range and description of every parameter.
    pub fn param_schema() -> Value {
        json!({
            "trail_length": {
                "type": "integer",
                "default": DEFAULT_TRAIL_LENGTH,
                "min": 1,
                "max": MAX_TRAIL_LENGTH,
                "description": "Number of points in the pointer trail"
            },
            "pursuit_rate": {
                "type": "number",
                "default": DEFAULT_PURSUIT_RATE,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of the gap each trail point closes per frame"
            },
            "intensity_rate": {
                "type": "number",
                "default": DEFAULT_INTENSITY_RATE,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-frame smoothing rate of the effect intensity"
            },
            "radius_rise_rate": {
                "type": "number",
                "default": DEFAULT_RADIUS_RISE_RATE,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-frame smoothing rate of the radius while growing"
            },
            "radius_fall_rate": {
                "type": "number",
                "default": DEFAULT_RADIUS_FALL_RATE,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-frame smoothing rate of the radius while shrinking"
            },
            "radius_target": {
                "type": "number",
                "default": DEFAULT_RADIUS_TARGET,
                "min": 0.0,
                "max": 0.5,
                "description": "Head radius while the pointer moves, relative to surface height"
            },
            "metaball_threshold": {
                "type": "number",
                "default": DEFAULT_METABALL_THRESHOLD,
                "min": 0.0,
                "max": 1.0,
                "description": "Energy level of the blob boundary"
            },
            "edge_thickness": {
                "type": "number",
                "default": DEFAULT_EDGE_THICKNESS,
                "min": 0.0,
                "max": 0.5,
                "description": "Half-width of the ripple ring in energy units"
            },
            "reveal_softness": {
                "type": "number",
                "default": DEFAULT_REVEAL_SOFTNESS,
                "min": 0.0,
                "max": 0.5,
                "description": "Half-width of the reveal edge; 0 gives a hard edge"
            },
            "displacement_scale": {
                "type": "number",
                "default": DEFAULT_DISPLACEMENT_SCALE,
                "min": 0.0,
                "max": 0.1,
                "description": "Maximum ripple offset in normalized units"
            },
            "noise_frequency": {
                "type": "number",
                "default": DEFAULT_NOISE_FREQUENCY,
                "min": 0.0,
                "max": 50.0,
                "description": "Spatial frequency of the ripple noise"
            },
            "noise_speed": {
                "type": "number",
                "default": DEFAULT_NOISE_SPEED,
                "min": 0.0,
                "max": 5.0,
                "description": "Drift speed of the ripple noise over time"
            },
            "noise_seed": {
                "type": "integer",
                "default": 0,
                "min": 0,
                "max": u32::MAX,
                "description": "Seed of the ripple noise"
            },
            "displacement_policy": {
                "type": "string",
                "default": "shared",
                "enum": ["shared", "phase_shifted"],
                "description": "One noise sample for both axes, or two with opposite time phase"
            },
            "kernel": {
                "type": "string",
                "default": "squared_distance",
                "enum": ["distance", "squared_distance"],
                "description": "Falloff shape of each trail point"
            },
            "debounce_ms": {
                "type": "integer",
                "default": DEFAULT_DEBOUNCE_MS,
                "min": 1,
                "max": 5000,
                "description": "Quiet period before the effect fades out"
            },
            "fallback_color": {
                "type": "string",
                "default": "#000000",
                "description": "Color rendered until both images are available"
            }
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(name: &str, expected: &str, got: &Value) -> EffectError {
    EffectError::ParamTypeMismatch {
        name: name.into(),
        expected: expected.into(),
        got: json_type_name(got).into(),
    }
}

fn invalid(name: &str, reason: String) -> EffectError {
    EffectError::InvalidParam {
        name: name.into(),
        reason,
    }
}

fn expect_f64(name: &str, value: &Value) -> Result<f64, EffectError> {
    value.as_f64().ok_or_else(|| mismatch(name, "number", value))
}

fn expect_u64(name: &str, value: &Value) -> Result<u64, EffectError> {
    value
        .as_u64()
        .ok_or_else(|| mismatch(name, "unsigned integer", value))
}

fn expect_usize(name: &str, value: &Value) -> Result<usize, EffectError> {
    let v = expect_u64(name, value)?;
    usize::try_from(v).map_err(|_| invalid(name, format!("{v} is too large")))
}

fn expect_enum<T: serde::de::DeserializeOwned>(name: &str, value: &Value) -> Result<T, EffectError> {
    if !value.is_string() {
        return Err(mismatch(name, "string", value));
    }
    T::deserialize(value).map_err(|e| invalid(name, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EffectConfig::default();
        config.validate().unwrap();
        assert_eq!(config.trail_length, 20);
        assert_eq!(config.debounce(), Duration::from_millis(150));
    }

    #[test]
    fn empty_object_gives_defaults() {
        let config = EffectConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, EffectConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = EffectConfig::from_json(&json!({
            "trail_length": 32,
            "pursuit_rate": 0.5,
            "kernel": "distance",
            "displacement_policy": "phase_shifted",
            "fallback_color": "#102030",
        }))
        .unwrap();
        assert_eq!(config.trail_length, 32);
        assert_eq!(config.pursuit_rate, 0.5);
        assert_eq!(config.kernel, FalloffKernel::Distance);
        assert_eq!(config.displacement_policy, DisplacementPolicy::PhaseShifted);
        assert_eq!(config.fallback_color.to_hex(), "#102030");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = EffectConfig::from_json(&json!({"radius": 0.1})).unwrap_err();
        assert!(matches!(err, EffectError::ParamNotFound(ref k) if k == "radius"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = EffectConfig::from_json(&json!({"trail_length": "many"})).unwrap_err();
        assert!(matches!(
            err,
            EffectError::ParamTypeMismatch { ref name, ref got, .. } if name == "trail_length" && got == "string"
        ));
    }

    #[test]
    fn non_object_params_are_rejected() {
        assert!(matches!(
            EffectConfig::from_json(&json!([1, 2])),
            Err(EffectError::ParamTypeMismatch { .. })
        ));
    }

    #[test]
    fn zero_trail_length_is_a_configuration_error() {
        assert!(matches!(
            EffectConfig::from_json(&json!({"trail_length": 0})),
            Err(EffectError::InvalidTrailLength)
        ));
    }

    #[test]
    fn oversized_trail_length_is_a_configuration_error() {
        let err = EffectConfig::from_json(&json!({"trail_length": 1u64 << 62})).unwrap_err();
        assert!(
            matches!(err, EffectError::InvalidParam { ref name, .. } if name == "trail_length"),
            "got {err}"
        );
        assert!(EffectConfig::from_json(&json!({"trail_length": MAX_TRAIL_LENGTH})).is_ok());
        assert!(EffectConfig::from_json(&json!({"trail_length": MAX_TRAIL_LENGTH + 1})).is_err());
    }

    #[test]
    fn rates_outside_unit_interval_are_rejected() {
        for (key, value) in [("pursuit_rate", 0.0), ("intensity_rate", 1.5), ("radius_fall_rate", -0.1)] {
            let err = EffectConfig::from_json(&json!({ key: value })).unwrap_err();
            assert!(
                matches!(err, EffectError::InvalidRate { ref name, .. } if name == key),
                "{key} = {value} gave {err}"
            );
        }
    }

    #[test]
    fn rate_of_one_is_allowed() {
        EffectConfig::from_json(&json!({"pursuit_rate": 1.0})).unwrap();
    }

    #[test]
    fn threshold_must_be_inside_unit_interval() {
        assert!(EffectConfig::from_json(&json!({"metaball_threshold": 1.0})).is_err());
        assert!(EffectConfig::from_json(&json!({"metaball_threshold": 0.0})).is_err());
    }

    #[test]
    fn negative_radius_is_rejected() {
        assert!(matches!(
            EffectConfig::from_json(&json!({"radius_target": -0.1})),
            Err(EffectError::InvalidParam { .. })
        ));
    }

    #[test]
    fn unknown_kernel_name_is_rejected() {
        assert!(matches!(
            EffectConfig::from_json(&json!({"kernel": "gaussian"})),
            Err(EffectError::InvalidParam { .. })
        ));
    }

    #[test]
    fn oversized_seed_is_rejected() {
        assert!(EffectConfig::from_json(&json!({"noise_seed": 1_u64 << 40})).is_err());
    }

    #[test]
    fn params_round_trip_through_from_json() {
        let config = EffectConfig::from_json(&json!({"trail_length": 33, "noise_seed": 9})).unwrap();
        let again = EffectConfig::from_json(&config.params()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn schema_covers_every_param() {
        let schema = EffectConfig::param_schema();
        let params = EffectConfig::default().params();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    #[test]
    fn serde_default_fills_missing_fields() {
        let config: EffectConfig = serde_json::from_str(r#"{"trail_length": 24}"#).unwrap();
        assert_eq!(config.trail_length, 24);
        assert_eq!(config.pursuit_rate, DEFAULT_PURSUIT_RATE);
    }

    #[test]
    fn builders_follow_config() {
        let config = EffectConfig::from_json(&json!({"edge_thickness": 0.1, "noise_frequency": 3.0})).unwrap();
        assert_eq!(config.field_evaluator().edge_thickness, 0.1);
        assert_eq!(config.noise_field().frequency(), 3.0);
        assert_eq!(config.compositor().displacement_scale(), DEFAULT_DISPLACEMENT_SCALE);
    }
}
