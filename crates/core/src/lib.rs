#![deny(unsafe_code)]
//! Core of the liquid reveal effect.
//!
//! A background and an overlay image are composited per pixel. The boundary
//! between them follows a smoothed trail of recent pointer positions, merged
//! into one blob with metaball blending, and rippled along its edge by
//! procedural noise.
//!
//! Provides [`EffectController`] (per-frame state and rendering),
//! [`TrailBuffer`], [`SmoothedScalar`], [`MotionState`], [`FieldEvaluator`],
//! [`Compositor`], [`NoiseField`], the [`ImageSource`] trait with
//! [`Texture`] and [`SolidColor`], [`Framebuffer`], [`Field`] snapshots and
//! [`EffectConfig`].

pub mod color;
pub mod compositor;
pub mod config;
pub mod controller;
pub mod error;
pub mod field;
pub mod frame;
pub mod metaball;
pub mod motion;
pub mod noise_field;
pub mod smoothing;
pub mod texture;
pub mod trail;

pub use color::Rgba;
pub use compositor::Compositor;
pub use config::EffectConfig;
pub use controller::{EffectController, FrameStats};
pub use error::EffectError;
pub use field::Field;
pub use frame::Framebuffer;
pub use metaball::{FalloffKernel, FieldEvaluator, Masks};
pub use motion::{MotionPhase, MotionState};
pub use noise_field::{DisplacementPolicy, NoiseField};
pub use smoothing::SmoothedScalar;
pub use texture::{ImagePair, ImageSource, SolidColor, Texture};
pub use trail::TrailBuffer;

pub use glam::DVec2;
