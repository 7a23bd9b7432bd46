//! Per-frame driver of the effect.
//!
//! [`EffectController`] owns every piece of mutable state: the trail, the
//! two smoothed scalars, the motion debounce and the latest pointer sample.
//! The host feeds it pointer moves as they arrive and calls
//! [`on_frame`](EffectController::on_frame) once per display refresh,
//! followed by [`render`](EffectController::render). Rendering reads the
//! frame-frozen state only and shades rows in parallel.

use std::time::Duration;

use crate::color::Rgba;
use crate::compositor::Compositor;
use crate::config::EffectConfig;
use crate::error::EffectError;
use crate::field::Field;
use crate::frame::{pixel_center, Framebuffer};
use crate::metaball::{FieldEvaluator, Masks};
use crate::motion::{MotionPhase, MotionState};
use crate::smoothing::SmoothedScalar;
use crate::texture::{ImagePair, ImageSource};
use crate::trail::{TrailBuffer, POINTER_REST};
use glam::DVec2;
use rayon::prelude::*;
use std::sync::Arc;

/// Scalars closer than this to their target are snapped onto it.
const SETTLE_EPSILON: f64 = 1e-5;

/// Snapshot of the controller after a frame step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub elapsed: Duration,
    pub phase: MotionPhase,
    pub intensity: f64,
    pub radius: f64,
    pub head: DVec2,
}

/// Owns the effect state and advances it once per frame.
#[derive(Debug)]
pub struct EffectController {
    config: EffectConfig,
    evaluator: FieldEvaluator,
    compositor: Compositor,
    trail: TrailBuffer,
    intensity: SmoothedScalar,
    radius: SmoothedScalar,
    motion: MotionState,
    pointer: DVec2,
    elapsed: Duration,
    images: Option<ImagePair>,
    stopped: bool,
}

impl EffectController {
    /// Validates `config` and builds a controller at rest: trail centred,
    /// intensity and radius at zero, no images.
    pub fn new(config: EffectConfig) -> Result<Self, EffectError> {
        config.validate()?;
        let trail = TrailBuffer::new(config.trail_length)?;
        Ok(Self {
            evaluator: config.field_evaluator(),
            compositor: config.compositor(),
            motion: MotionState::new(config.debounce()),
            trail,
            intensity: SmoothedScalar::new(0.0),
            radius: SmoothedScalar::new(0.0),
            pointer: POINTER_REST,
            elapsed: Duration::ZERO,
            images: None,
            stopped: false,
            config,
        })
    }

    /// Builder form of [`set_images`](Self::set_images).
    pub fn with_images(
        mut self,
        background: Arc<dyn ImageSource>,
        overlay: Arc<dyn ImageSource>,
    ) -> Self {
        self.set_images(background, overlay);
        self
    }

    /// Supplies both images. May be called at any time; the next render uses them.
    pub fn set_images(&mut self, background: Arc<dyn ImageSource>, overlay: Arc<dyn ImageSource>) {
        self.images = Some(ImagePair::new(background, overlay));
        log::debug!("effect images ready");
    }

    /// Forgets both images; renders fall back to the inert frame.
    pub fn clear_images(&mut self) {
        self.images = None;
    }

    pub fn has_images(&self) -> bool {
        self.images.is_some()
    }

    /// Records the latest pointer position and marks the pointer as moving.
    ///
    /// Only the most recent sample before a frame is used. Non-finite points
    /// are dropped.
    pub fn on_pointer_move(&mut self, point: DVec2, at: Duration) {
        if self.stopped {
            return;
        }
        if !point.is_finite() {
            log::trace!("dropping non-finite pointer sample {point:?}");
            return;
        }
        if self.motion.phase() == MotionPhase::Idle {
            log::debug!("pointer moving at {:.3}s", at.as_secs_f64());
        }
        self.pointer = point;
        self.motion.arm(at);
    }

    /// Advances the effect to `elapsed`.
    ///
    /// Order: store the time, settle the motion phase, chase the trail toward
    /// the latest pointer sample, then ease intensity and radius toward the
    /// targets the phase selects. After [`stop`](Self::stop) this only
    /// reports the frozen state.
    pub fn on_frame(&mut self, elapsed: Duration) -> FrameStats {
        if self.stopped {
            return self.stats();
        }
        self.elapsed = elapsed;
        let moving = self.motion.poll(elapsed) == MotionPhase::Moving;

        self.trail.advance(self.pointer, self.config.pursuit_rate);

        self.intensity.set_target(if moving { 1.0 } else { 0.0 });
        self.intensity.advance(self.config.intensity_rate);
        self.intensity.snap_within(SETTLE_EPSILON);

        self.radius
            .set_target(if moving { self.config.radius_target } else { 0.0 });
        let rate = if self.radius.is_rising() {
            self.config.radius_rise_rate
        } else {
            self.config.radius_fall_rate
        };
        self.radius.advance(rate);
        self.radius.snap_within(SETTLE_EPSILON);

        let stats = self.stats();
        log::trace!(
            "frame {:.3}s intensity {:.4} radius {:.4}",
            elapsed.as_secs_f64(),
            stats.intensity,
            stats.radius
        );
        stats
    }

    /// Cancels the pending idle deadline and freezes the controller.
    ///
    /// Later pointer moves and frame steps are ignored. Rendering keeps
    /// working with the frozen state.
    pub fn stop(&mut self) {
        self.motion.cancel();
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Renders a `width * height` frame of the current state.
    pub fn render(&self, width: usize, height: usize) -> Result<Framebuffer, EffectError> {
        let mut frame = Framebuffer::filled(width, height, self.config.fallback_color)?;
        self.render_into(&mut frame);
        Ok(frame)
    }

    /// Renders into an existing frame, reusing its allocation.
    ///
    /// Without images every pixel gets the fallback color.
    pub fn render_into(&self, frame: &mut Framebuffer) {
        let Some(images) = &self.images else {
            log::debug!("images not ready, rendering fallback frame");
            frame.fill(self.config.fallback_color);
            return;
        };
        let (w, h) = (frame.width(), frame.height());
        let aspect = frame.aspect();
        frame
            .pixels_mut()
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = self.shade_with(images, pixel_center(x, y, w, h), aspect);
                }
            });
    }

    /// Final color at `p` on a surface of the given aspect ratio.
    pub fn shade(&self, p: DVec2, aspect: f64) -> Rgba {
        match &self.images {
            Some(images) => self.shade_with(images, p, aspect),
            None => self.config.fallback_color,
        }
    }

    /// Energy and masks at `p` on a surface of the given aspect ratio.
    pub fn masks(&self, p: DVec2, aspect: f64) -> Masks {
        self.evaluator.masks(
            p,
            &self.trail,
            self.radius.value(),
            self.intensity.value(),
            aspect,
        )
    }

    /// Metaball energy (ignoring intensity) sampled at every pixel centre.
    pub fn energy_field(&self, width: usize, height: usize) -> Result<Field, EffectError> {
        let aspect = width as f64 / height as f64;
        let radius = self.radius.value();
        self.sample_field(width, height, |p| {
            self.evaluator.energy_at(p, &self.trail, radius, aspect)
        })
    }

    /// Reveal and distortion masks sampled at every pixel centre.
    pub fn mask_fields(&self, width: usize, height: usize) -> Result<(Field, Field), EffectError> {
        let aspect = width as f64 / height as f64;
        let reveal = self.sample_field(width, height, |p| self.masks(p, aspect).reveal)?;
        let distortion = self.sample_field(width, height, |p| self.masks(p, aspect).distortion)?;
        Ok((reveal, distortion))
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn intensity(&self) -> f64 {
        self.intensity.value()
    }

    pub fn radius(&self) -> f64 {
        self.radius.value()
    }

    /// The pursuit target: the latest pointer sample, or the centre before any.
    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    pub fn phase(&self) -> MotionPhase {
        self.motion.phase()
    }

    /// Whether the pointer counts as moving at `now`.
    pub fn is_moving(&self, now: Duration) -> bool {
        self.motion.is_moving(now)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            elapsed: self.elapsed,
            phase: self.motion.phase(),
            intensity: self.intensity.value(),
            radius: self.radius.value(),
            head: self.trail.head(),
        }
    }

    fn shade_with(&self, images: &ImagePair, p: DVec2, aspect: f64) -> Rgba {
        let masks = self.masks(p, aspect);
        self.compositor
            .color_at(p, images, &masks, self.elapsed.as_secs_f64())
    }

    fn sample_field(
        &self,
        width: usize,
        height: usize,
        f: impl Fn(DVec2) -> f64 + Sync,
    ) -> Result<Field, EffectError> {
        let mut field = Field::new(width, height)?;
        field
            .data_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = f(pixel_center(x, y, width, height));
                }
            });
        Ok(field)
    }
}
